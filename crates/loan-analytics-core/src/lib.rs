pub mod enrich;
pub mod error;
pub mod normalize;
pub mod types;
pub mod yields;

#[cfg(test)]
pub(crate) mod testutil;

#[cfg(feature = "advisory")]
pub mod advisory;

pub use error::AnalyticsError;
pub use types::*;

pub use enrich::{enrich_record, enrich_records};
pub use normalize::{normalize_record, normalize_snapshot, RawLoanRecord, SnapshotReport};
pub use yields::portfolio::compute_portfolio_metrics;
pub use yields::segmentation::{
    compute_custom_segments, compute_segments, Segment, SegmentPredicate, SegmentSet,
};
pub use yields::trend::{
    compute_trend, rolling_window_metrics, rolling_window_summary, PeriodGranularity,
    RollingWindowSummary, TrendPoint,
};

#[cfg(feature = "advisory")]
pub use advisory::quadrant::{
    classify_quadrants, yearly_performance, PeriodPerformance, Quadrant, QuadrantSnapshot,
};
#[cfg(feature = "advisory")]
pub use advisory::rules::{
    snapshot_readings, Comparison, IndicatorReading, IndicatorRules, Priority, Recommendation,
    RecommendationEngine, ThresholdRule,
};

/// Standard result type for all analytics operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
