use napi::Result as NapiResult;
use napi_derive::napi;

use loan_analytics_core::{
    classify_quadrants, compute_portfolio_metrics, compute_segments, compute_trend,
    enrich_records, normalize_snapshot, rolling_window_summary, yearly_performance,
    EnrichedLoanRecord, IndicatorReading, PeriodGranularity, PeriodPerformance, RawLoanRecord,
    RecommendationEngine, SegmentSet,
};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse a raw snapshot and run it through the normalizer boundary.
/// Rows that fail validation are dropped; `validate_snapshot` exposes
/// the full report.
fn parse_snapshot(records_json: &str) -> NapiResult<Vec<EnrichedLoanRecord>> {
    let raws: Vec<RawLoanRecord> = serde_json::from_str(records_json).map_err(to_napi_error)?;
    Ok(enrich_records(normalize_snapshot(&raws).records))
}

// ---------------------------------------------------------------------------
// Yield metrics
// ---------------------------------------------------------------------------

#[napi]
pub fn portfolio_metrics(records_json: String) -> NapiResult<String> {
    let records = parse_snapshot(&records_json)?;
    let metrics = compute_portfolio_metrics(&records);
    serde_json::to_string(&metrics).map_err(to_napi_error)
}

#[napi]
pub fn segments(records_json: String, segment_set_json: String) -> NapiResult<String> {
    let records = parse_snapshot(&records_json)?;
    let set: SegmentSet = serde_json::from_str(&segment_set_json).map_err(to_napi_error)?;
    let segments = compute_segments(&records, set);
    serde_json::to_string(&segments).map_err(to_napi_error)
}

#[napi]
pub fn trend(records_json: String, granularity_json: String) -> NapiResult<String> {
    let records = parse_snapshot(&records_json)?;
    let granularity: PeriodGranularity =
        serde_json::from_str(&granularity_json).map_err(to_napi_error)?;
    let points = compute_trend(&records, granularity);
    serde_json::to_string(&points).map_err(to_napi_error)
}

#[napi]
pub fn rolling_windows(records_json: String, as_of: String) -> NapiResult<String> {
    let records = parse_snapshot(&records_json)?;
    let as_of: chrono::NaiveDate = as_of.parse().map_err(to_napi_error)?;
    let summary = rolling_window_summary(&records, as_of);
    serde_json::to_string(&summary).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Advisory
// ---------------------------------------------------------------------------

#[napi]
pub fn recommendations(indicators_json: String) -> NapiResult<String> {
    let readings: Vec<IndicatorReading> =
        serde_json::from_str(&indicators_json).map_err(to_napi_error)?;
    let engine = RecommendationEngine::standard();
    serde_json::to_string(&engine.generate(&readings)).map_err(to_napi_error)
}

#[napi]
pub fn quadrants(periods_json: String) -> NapiResult<String> {
    let periods: Vec<PeriodPerformance> =
        serde_json::from_str(&periods_json).map_err(to_napi_error)?;
    serde_json::to_string(&classify_quadrants(&periods)).map_err(to_napi_error)
}

#[napi]
pub fn yearly_quadrants(records_json: String) -> NapiResult<String> {
    let records = parse_snapshot(&records_json)?;
    let classified = classify_quadrants(&yearly_performance(&records));
    serde_json::to_string(&classified).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Data quality
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_snapshot(records_json: String) -> NapiResult<String> {
    let raws: Vec<RawLoanRecord> = serde_json::from_str(&records_json).map_err(to_napi_error)?;
    let report = normalize_snapshot(&raws);
    serde_json::to_string(&report).map_err(to_napi_error)
}
