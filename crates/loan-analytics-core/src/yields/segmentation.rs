use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{CustomerClass, EnrichedLoanRecord, PortfolioMetrics, Rate};
use crate::yields::portfolio::compute_portfolio_metrics;

const HUNDRED: Decimal = dec!(100);

/// Holding-period split point in days.
const SHORT_TERM_DAYS: i64 = 30;

/// Half-open principal buckets. An upper bound of `None` means
/// unbounded.
const SIZE_BUCKETS: [(&str, Decimal, Option<Decimal>); 5] = [
    ("<50k", dec!(0), Some(dec!(50000))),
    ("50k-100k", dec!(50000), Some(dec!(100000))),
    ("100k-150k", dec!(100000), Some(dec!(150000))),
    ("150k-200k", dec!(150000), Some(dec!(200000))),
    ("200k+", dec!(200000), None),
];

/// A predicate over enriched records, as used by the segmentation
/// engine.
pub type SegmentPredicate<'a> = &'a dyn Fn(&EnrichedLoanRecord) -> bool;

/// The standard comparative views over a loan set. Within one set the
/// segments are mutually exclusive and exhaustive; different sets are
/// independent views over the same records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentSet {
    /// Short (<30 days) vs long (30+ days) holding periods
    HoldingPeriod,
    /// Five fixed principal ranges
    LoanSize,
    /// Business vs private book
    CustomerClass,
}

/// A named, filtered slice of the portfolio with its own yield
/// metrics and its share of total deployed capital.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub name: String,
    pub metrics: PortfolioMetrics,
    pub count: usize,
    pub capital_share_pct: Rate,
}

/// Compute one of the standard segment sets.
pub fn compute_segments(records: &[EnrichedLoanRecord], set: SegmentSet) -> Vec<Segment> {
    match set {
        SegmentSet::HoldingPeriod => {
            let short = |r: &EnrichedLoanRecord| {
                r.holding_period_days.map_or(false, |d| d < SHORT_TERM_DAYS)
            };
            let long = |r: &EnrichedLoanRecord| {
                r.holding_period_days.map_or(false, |d| d >= SHORT_TERM_DAYS)
            };
            let pairs: [(&str, SegmentPredicate); 2] = [("short", &short), ("long", &long)];
            compute_custom_segments(records, &pairs)
        }
        SegmentSet::LoanSize => {
            let predicates: Vec<(&str, Box<dyn Fn(&EnrichedLoanRecord) -> bool>)> = SIZE_BUCKETS
                .iter()
                .map(|&(label, lower, upper)| {
                    let pred = move |r: &EnrichedLoanRecord| {
                        r.record.principal >= lower
                            && upper.map_or(true, |u| r.record.principal < u)
                    };
                    (
                        label,
                        Box::new(pred) as Box<dyn Fn(&EnrichedLoanRecord) -> bool>,
                    )
                })
                .collect();
            let pairs: Vec<(&str, SegmentPredicate)> = predicates
                .iter()
                .map(|(name, pred)| (*name, pred.as_ref()))
                .collect();
            compute_custom_segments(records, &pairs)
        }
        SegmentSet::CustomerClass => {
            let business =
                |r: &EnrichedLoanRecord| r.record.customer_class == CustomerClass::Business;
            let private =
                |r: &EnrichedLoanRecord| r.record.customer_class == CustomerClass::Private;
            let pairs: [(&str, SegmentPredicate); 2] =
                [("business", &business), ("private", &private)];
            compute_custom_segments(records, &pairs)
        }
    }
}

/// Segment a record set by arbitrary named predicates. Every named
/// segment appears in the output, in input order; segments that match
/// nothing carry `insufficient_data` metrics so callers can always
/// render the full bucket table.
pub fn compute_custom_segments(
    records: &[EnrichedLoanRecord],
    segments: &[(&str, SegmentPredicate)],
) -> Vec<Segment> {
    let total_capital = compute_portfolio_metrics(records).total_capital;

    segments
        .iter()
        .map(|(name, predicate)| {
            let subset: Vec<EnrichedLoanRecord> =
                records.iter().filter(|r| predicate(r)).cloned().collect();
            let metrics = compute_portfolio_metrics(&subset);
            let capital_share_pct = if total_capital.is_zero() {
                Decimal::ZERO
            } else {
                metrics.total_capital / total_capital * HUNDRED
            };
            Segment {
                name: (*name).to_string(),
                count: metrics.loan_count,
                capital_share_pct,
                metrics,
            }
        })
        .collect()
}
