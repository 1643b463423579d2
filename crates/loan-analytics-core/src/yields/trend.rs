use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{EnrichedLoanRecord, PortfolioMetrics, Rate};
use crate::yields::portfolio::compute_portfolio_metrics;

const HUNDRED: Decimal = dec!(100);

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// How to bucket released records along the calendar. Trend analysis
/// keys on the release date throughout; realized yield belongs to the
/// period the capital came back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodGranularity {
    /// Every calendar year present in the data, ascending.
    Yearly,
    /// The trailing `window_months` calendar months ending with the
    /// month of `as_of`. The caller supplies `as_of`; the engine
    /// never reads the clock.
    Monthly {
        window_months: u32,
        as_of: NaiveDate,
    },
}

/// One calendar bucket with its metrics and the change against the
/// previous bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub period: String,
    pub metrics: PortfolioMetrics,
    /// Period-over-period yield change in percent. Absent for the
    /// first bucket and whenever the previous bucket's yield is zero
    /// or insufficient.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_pct: Option<Rate>,
}

/// Trailing 3/6/12-month portfolio yields, each computed over the
/// union of records released in the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingWindowSummary {
    pub trailing_3m: PortfolioMetrics,
    pub trailing_6m: PortfolioMetrics,
    pub trailing_12m: PortfolioMetrics,
}

/// Bucket released records by calendar period and compute per-bucket
/// metrics plus period-over-period deltas. Periods with no releases
/// are omitted.
pub fn compute_trend(
    records: &[EnrichedLoanRecord],
    granularity: PeriodGranularity,
) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<i64, (String, Vec<EnrichedLoanRecord>)> = BTreeMap::new();

    for rec in records {
        let released = match rec.record.released_on {
            Some(d) => d,
            None => continue,
        };
        let (key, label) = match granularity {
            PeriodGranularity::Yearly => {
                (i64::from(released.year()), released.year().to_string())
            }
            PeriodGranularity::Monthly {
                window_months,
                as_of,
            } => {
                let idx = month_index(released);
                let end = month_index(as_of);
                if idx > end || end - idx >= i64::from(window_months) {
                    continue;
                }
                (idx, month_label(released))
            }
        };
        buckets
            .entry(key)
            .or_insert_with(|| (label, Vec::new()))
            .1
            .push(rec.clone());
    }

    let mut points = Vec::with_capacity(buckets.len());
    let mut previous: Option<PortfolioMetrics> = None;

    for (_, (period, bucket)) in buckets {
        let metrics = compute_portfolio_metrics(&bucket);
        let delta_pct = match &previous {
            Some(prev) if !prev.insufficient_data && !prev.portfolio_yield_pct.is_zero() => {
                Some(
                    (metrics.portfolio_yield_pct - prev.portfolio_yield_pct)
                        / prev.portfolio_yield_pct
                        * HUNDRED,
                )
            }
            _ => None,
        };
        previous = Some(metrics.clone());
        points.push(TrendPoint {
            period,
            metrics,
            delta_pct,
        });
    }

    points
}

/// Metrics over the union of records released in the trailing
/// `window_months` calendar months ending with `as_of`'s month.
///
/// Recomputed from scratch over the union; never assembled from
/// per-month yields, which would reintroduce the averaging error the
/// portfolio calculation exists to avoid.
pub fn rolling_window_metrics(
    records: &[EnrichedLoanRecord],
    window_months: u32,
    as_of: NaiveDate,
) -> PortfolioMetrics {
    let end = month_index(as_of);
    let window: Vec<EnrichedLoanRecord> = records
        .iter()
        .filter(|rec| match rec.record.released_on {
            Some(d) => {
                let idx = month_index(d);
                idx <= end && end - idx < i64::from(window_months)
            }
            None => false,
        })
        .cloned()
        .collect();
    compute_portfolio_metrics(&window)
}

/// The trailing 3/6/12-month view shown on the yield dashboard.
pub fn rolling_window_summary(
    records: &[EnrichedLoanRecord],
    as_of: NaiveDate,
) -> RollingWindowSummary {
    RollingWindowSummary {
        trailing_3m: rolling_window_metrics(records, 3, as_of),
        trailing_6m: rolling_window_metrics(records, 6, as_of),
        trailing_12m: rolling_window_metrics(records, 12, as_of),
    }
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

fn month_label(date: NaiveDate) -> String {
    format!("{} {}", MONTH_ABBREV[date.month0() as usize], date.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::released_on;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_yearly_buckets_ascending() {
        let records = vec![
            released_on("A", dec!(100000), dec!(4000), date(2024, 6, 1), 90),
            released_on("B", dec!(80000), dec!(3000), date(2023, 3, 10), 60),
            released_on("C", dec!(50000), dec!(2000), date(2024, 11, 20), 45),
        ];
        let points = compute_trend(&records, PeriodGranularity::Yearly);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].period, "2023");
        assert_eq!(points[1].period, "2024");
        assert_eq!(points[1].metrics.loan_count, 2);
    }

    #[test]
    fn test_first_period_has_no_delta() {
        let records = vec![
            released_on("A", dec!(100000), dec!(4000), date(2023, 6, 1), 90),
            released_on("B", dec!(100000), dec!(5000), date(2024, 6, 1), 90),
        ];
        let points = compute_trend(&records, PeriodGranularity::Yearly);
        assert_eq!(points[0].delta_pct, None);
        assert!(points[1].delta_pct.is_some());
    }

    #[test]
    fn test_delta_formula() {
        // Same principal and holding period, interest 4000 -> 5000
        let records = vec![
            released_on("A", dec!(100000), dec!(4000), date(2023, 6, 1), 90),
            released_on("B", dec!(100000), dec!(5000), date(2024, 6, 1), 90),
        ];
        let points = compute_trend(&records, PeriodGranularity::Yearly);
        // Yield scales linearly with interest here, so the delta is 25%
        assert_eq!(points[1].delta_pct.unwrap().round_dp(6), dec!(25));
    }

    #[test]
    fn test_delta_undefined_after_zero_yield_period() {
        let records = vec![
            released_on("A", dec!(100000), dec!(0), date(2023, 6, 1), 90),
            released_on("B", dec!(100000), dec!(5000), date(2024, 6, 1), 90),
        ];
        let points = compute_trend(&records, PeriodGranularity::Yearly);
        assert_eq!(points[0].metrics.portfolio_yield_pct, Decimal::ZERO);
        assert_eq!(points[1].delta_pct, None);
    }

    #[test]
    fn test_monthly_window_membership() {
        let as_of = date(2025, 6, 15);
        let records = vec![
            // Inside the trailing 3 months: Apr, May, Jun 2025
            released_on("A", dec!(100000), dec!(2000), date(2025, 6, 2), 30),
            released_on("B", dec!(90000), dec!(1800), date(2025, 4, 28), 30),
            // Outside
            released_on("C", dec!(80000), dec!(1500), date(2025, 3, 31), 30),
            released_on("D", dec!(70000), dec!(1200), date(2026, 1, 5), 30),
        ];
        let points = compute_trend(
            &records,
            PeriodGranularity::Monthly {
                window_months: 3,
                as_of,
            },
        );
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].period, "Apr 2025");
        assert_eq!(points[1].period, "Jun 2025");
    }

    #[test]
    fn test_month_labels_cross_year_window() {
        let as_of = date(2025, 2, 10);
        let records = vec![
            released_on("A", dec!(100000), dec!(2000), date(2024, 12, 20), 30),
            released_on("B", dec!(90000), dec!(1800), date(2025, 1, 15), 30),
        ];
        let points = compute_trend(
            &records,
            PeriodGranularity::Monthly {
                window_months: 6,
                as_of,
            },
        );
        assert_eq!(points[0].period, "Dec 2024");
        assert_eq!(points[1].period, "Jan 2025");
    }

    #[test]
    fn test_rolling_window_is_union_not_average() {
        let as_of = date(2025, 6, 30);
        // Two months with very different capital and holding periods
        let records = vec![
            released_on("A", dec!(500000), dec!(20000), date(2025, 5, 10), 300),
            released_on("B", dec!(20000), dec!(900), date(2025, 6, 10), 20),
        ];
        let union = rolling_window_metrics(&records, 3, as_of);

        let may = compute_portfolio_metrics(&records[..1]);
        let june = compute_portfolio_metrics(&records[1..]);
        let naive_mean = (may.portfolio_yield_pct + june.portfolio_yield_pct) / dec!(2);

        assert_ne!(union.portfolio_yield_pct.round_dp(6), naive_mean.round_dp(6));
        // Union capital is the plain sum
        assert_eq!(union.total_capital, dec!(520000));
    }

    #[test]
    fn test_rolling_summary_windows_nest() {
        let as_of = date(2025, 6, 30);
        let records = vec![
            released_on("A", dec!(100000), dec!(3000), date(2025, 6, 1), 60),
            released_on("B", dec!(100000), dec!(3000), date(2025, 2, 1), 60),
            released_on("C", dec!(100000), dec!(3000), date(2024, 9, 1), 60),
        ];
        let summary = rolling_window_summary(&records, as_of);
        assert_eq!(summary.trailing_3m.loan_count, 1);
        assert_eq!(summary.trailing_6m.loan_count, 2);
        assert_eq!(summary.trailing_12m.loan_count, 3);
    }

    #[test]
    fn test_active_records_ignored() {
        let mut active = released_on("A", dec!(100000), dec!(2000), date(2025, 1, 1), 30);
        active.record.released_on = None;
        active.record.released = false;
        let active = crate::enrich::enrich_record(active.record);

        let points = compute_trend(&[active], PeriodGranularity::Yearly);
        assert!(points.is_empty());
    }
}
