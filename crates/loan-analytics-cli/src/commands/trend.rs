use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use serde_json::Value;

use loan_analytics_core::{compute_trend, rolling_window_summary, PeriodGranularity};

use crate::input;

/// Arguments for trend analysis
#[derive(Args)]
pub struct TrendArgs {
    /// Path to a raw snapshot (JSON, YAML, or CSV with legacy headers)
    #[arg(long)]
    pub input: Option<String>,

    /// Bucket size for the trend
    #[arg(long, value_enum, default_value = "yearly")]
    pub granularity: GranularityArg,

    /// Trailing window size in months (monthly granularity only)
    #[arg(long, default_value_t = 12)]
    pub months: u32,

    /// Reference date (YYYY-MM-DD) anchoring the monthly window;
    /// defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

/// Arguments for trailing window summaries
#[derive(Args)]
pub struct WindowsArgs {
    /// Path to a raw snapshot (JSON, YAML, or CSV with legacy headers)
    #[arg(long)]
    pub input: Option<String>,

    /// Reference date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum GranularityArg {
    Yearly,
    Monthly,
}

pub fn run_trend(args: TrendArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = input::load_enriched_records(&args.input)?;
    let granularity = match args.granularity {
        GranularityArg::Yearly => PeriodGranularity::Yearly,
        GranularityArg::Monthly => PeriodGranularity::Monthly {
            window_months: args.months,
            as_of: resolve_as_of(args.as_of),
        },
    };
    let points = compute_trend(&records, granularity);
    Ok(serde_json::to_value(points)?)
}

pub fn run_windows(args: WindowsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = input::load_enriched_records(&args.input)?;
    let summary = rolling_window_summary(&records, resolve_as_of(args.as_of));
    Ok(serde_json::to_value(summary)?)
}

/// The engine takes an explicit reference date; defaulting to the
/// wall clock is a CLI convenience only.
fn resolve_as_of(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| chrono::Local::now().date_naive())
}
