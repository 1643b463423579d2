use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Days, EnrichedLoanRecord, Money, Rate};
use crate::yields::trend::{compute_trend, PeriodGranularity};

/// Relative performance class of one period against the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quadrant {
    /// At or above the median on both yield and capital
    HighPerformer,
    /// At or above median yield on below-median capital
    HighYieldLowVolume,
    /// At or above median capital at below-median yield
    StableGenerator,
    /// Below the median on both axes
    Underperformer,
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::HighPerformer => "high-performer",
            Self::HighYieldLowVolume => "high-yield-low-volume",
            Self::StableGenerator => "stable-generator",
            Self::Underperformer => "underperformer",
        };
        write!(f, "{}", s)
    }
}

/// One period's summary figures, as fed to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodPerformance {
    pub period: String,
    pub yield_pct: Rate,
    pub capital: Money,
    pub holding_days: Days,
}

/// A classified period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadrantSnapshot {
    pub period: String,
    pub yield_pct: Rate,
    pub capital: Money,
    pub holding_days: Days,
    pub quadrant: Quadrant,
}

/// Label each period relative to the median yield and median capital
/// across all periods. Ties at a median land on the "at or above"
/// side of that axis.
pub fn classify_quadrants(periods: &[PeriodPerformance]) -> Vec<QuadrantSnapshot> {
    if periods.is_empty() {
        return Vec::new();
    }

    let median_yield = median(periods.iter().map(|p| p.yield_pct).collect());
    let median_capital = median(periods.iter().map(|p| p.capital).collect());

    periods
        .iter()
        .map(|p| {
            let quadrant = match (p.yield_pct >= median_yield, p.capital >= median_capital) {
                (true, true) => Quadrant::HighPerformer,
                (true, false) => Quadrant::HighYieldLowVolume,
                (false, true) => Quadrant::StableGenerator,
                (false, false) => Quadrant::Underperformer,
            };
            QuadrantSnapshot {
                period: p.period.clone(),
                yield_pct: p.yield_pct,
                capital: p.capital,
                holding_days: p.holding_days,
                quadrant,
            }
        })
        .collect()
}

/// Per-year performance inputs derived from a record snapshot. Years
/// without enough data to yield a metric are left out.
pub fn yearly_performance(records: &[EnrichedLoanRecord]) -> Vec<PeriodPerformance> {
    compute_trend(records, PeriodGranularity::Yearly)
        .into_iter()
        .filter(|point| !point.metrics.insufficient_data)
        .map(|point| PeriodPerformance {
            period: point.period,
            yield_pct: point.metrics.portfolio_yield_pct,
            capital: point.metrics.total_capital,
            holding_days: point.metrics.weighted_average_days,
        })
        .collect()
}

fn median(mut values: Vec<Decimal>) -> Decimal {
    values.sort();
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / dec!(2)
    }
}
