use clap::Args;
use serde_json::Value;

use loan_analytics_core::{
    classify_quadrants, compute_portfolio_metrics, snapshot_readings, yearly_performance,
    IndicatorReading, RecommendationEngine,
};

use crate::input;

/// Arguments for quadrant classification
#[derive(Args)]
pub struct QuadrantsArgs {
    /// Path to a raw snapshot (JSON, YAML, or CSV with legacy headers)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for recommendation generation
#[derive(Args)]
pub struct RecommendArgs {
    /// Path to a JSON array of indicator readings
    /// (name, value, optional insufficient_data)
    #[arg(long)]
    pub indicators: Option<String>,

    /// Raw snapshot to derive snapshot-computable readings from
    /// (used when --indicators is not given)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_quadrants(args: QuadrantsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = input::load_enriched_records(&args.input)?;
    let classified = classify_quadrants(&yearly_performance(&records));
    Ok(serde_json::to_value(classified)?)
}

pub fn run_recommend(args: RecommendArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let readings: Vec<IndicatorReading> = if let Some(ref path) = args.indicators {
        input::file::read_json(path)?
    } else {
        let records = input::load_enriched_records(&args.input)?;
        snapshot_readings(&compute_portfolio_metrics(&records))
    };

    let engine = RecommendationEngine::standard();
    Ok(serde_json::to_value(engine.generate(&readings))?)
}
