use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use loan_analytics_core::{
    compute_portfolio_metrics, compute_segments, normalize_snapshot, SegmentSet,
};

use crate::input;

/// Arguments for portfolio-level metrics
#[derive(Args)]
pub struct PortfolioArgs {
    /// Path to a raw snapshot (JSON, YAML, or CSV with legacy headers)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for segment breakdowns
#[derive(Args)]
pub struct SegmentsArgs {
    /// Path to a raw snapshot (JSON, YAML, or CSV with legacy headers)
    #[arg(long)]
    pub input: Option<String>,

    /// Standard segment set to compute
    #[arg(long, value_enum, default_value = "holding-period")]
    pub set: SegmentSetArg,
}

/// Arguments for snapshot validation
#[derive(Args)]
pub struct CheckArgs {
    /// Path to a raw snapshot (JSON, YAML, or CSV with legacy headers)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum SegmentSetArg {
    HoldingPeriod,
    LoanSize,
    CustomerClass,
}

impl From<SegmentSetArg> for SegmentSet {
    fn from(arg: SegmentSetArg) -> Self {
        match arg {
            SegmentSetArg::HoldingPeriod => SegmentSet::HoldingPeriod,
            SegmentSetArg::LoanSize => SegmentSet::LoanSize,
            SegmentSetArg::CustomerClass => SegmentSet::CustomerClass,
        }
    }
}

pub fn run_portfolio(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = input::load_enriched_records(&args.input)?;
    let metrics = compute_portfolio_metrics(&records);
    Ok(serde_json::to_value(metrics)?)
}

pub fn run_segments(args: SegmentsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = input::load_enriched_records(&args.input)?;
    let segments = compute_segments(&records, args.set.into());
    Ok(serde_json::to_value(segments)?)
}

pub fn run_check(args: CheckArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raws = input::load_raw_records(&args.input)?;
    let report = normalize_snapshot(&raws);
    Ok(json!({
        "total": raws.len(),
        "accepted": report.records.len(),
        "zero_interest_released": report.zero_interest_released,
        "rejected": serde_json::to_value(&report.rejected)?,
    }))
}
