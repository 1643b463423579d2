use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{EnrichedLoanRecord, PortfolioMetrics};

/// Annualization base for all yield math.
const DAYS_PER_YEAR: Decimal = dec!(365);
const HUNDRED: Decimal = dec!(100);

/// Capital-and-time-weighted annualized yield over a record set.
///
/// The portfolio figure is computed from combined sums:
///
/// ```text
/// weighted_average_days = Σ(principal × days) / Σ(principal)
/// portfolio_yield_pct   = (Σ interest / Σ principal) × (365 / weighted_average_days) × 100
/// ```
///
/// This is deliberately NOT the average of per-loan annualized
/// yields; averaging individually annualized returns overweights
/// small, short loans and produces a different (wrong) number.
///
/// Records that are active, zero-day, or non-positive-principal are
/// skipped. An empty eligible set returns zeroed metrics with
/// `insufficient_data` set; no division by zero can occur.
pub fn compute_portfolio_metrics(records: &[EnrichedLoanRecord]) -> PortfolioMetrics {
    let mut total_capital = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut weighted_days = Decimal::ZERO;
    let mut loan_count = 0usize;

    for rec in records {
        let days = match rec.holding_period_days {
            Some(d) if d > 0 => Decimal::from(d),
            _ => continue,
        };
        let interest = match rec.realized_interest {
            Some(i) => i,
            None => continue,
        };
        if rec.record.principal <= Decimal::ZERO {
            continue;
        }

        total_capital += rec.record.principal;
        total_interest += interest;
        weighted_days += rec.record.principal * days;
        loan_count += 1;
    }

    if loan_count == 0 || total_capital.is_zero() {
        return PortfolioMetrics::insufficient();
    }

    let weighted_average_days = weighted_days / total_capital;
    if weighted_average_days <= Decimal::ZERO {
        return PortfolioMetrics::insufficient();
    }

    let simple_return_pct = (total_interest / total_capital) * HUNDRED;
    let portfolio_yield_pct =
        (total_interest / total_capital) * (DAYS_PER_YEAR / weighted_average_days) * HUNDRED;

    PortfolioMetrics {
        total_interest,
        total_capital,
        weighted_average_days,
        portfolio_yield_pct,
        simple_return_pct,
        loan_count,
        insufficient_data: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::enrich_record;
    use crate::testutil::released_loan;
    use rust_decimal_macros::dec;

    #[test]
    fn test_two_loan_portfolio() {
        let records = vec![
            released_loan("A", dec!(100000), dec!(13200), 365),
            released_loan("B", dec!(50000), dec!(3300), 180),
        ];
        let m = compute_portfolio_metrics(&records);

        assert_eq!(m.total_interest, dec!(16500));
        assert_eq!(m.total_capital, dec!(150000));
        // (100000*365 + 50000*180) / 150000
        assert_eq!(m.weighted_average_days.round_dp(2), dec!(303.33));
        // 11% simple return annualized over 303.33 days
        assert_eq!(m.simple_return_pct, dec!(11));
        assert_eq!(m.portfolio_yield_pct.round_dp(2), dec!(13.24));
        assert_eq!(m.loan_count, 2);
        assert!(!m.insufficient_data);
    }

    #[test]
    fn test_single_loan_annualization() {
        let records = vec![released_loan("A", dec!(100000), dec!(6600), 180)];
        let m = compute_portfolio_metrics(&records);
        // 6.6% over 180 days, annualization factor 365/180
        assert_eq!(m.portfolio_yield_pct.round_dp(2), dec!(13.38));
        assert_eq!(m.simple_return_pct, dec!(6.6));

        let per_loan = records[0].annualized_yield_pct().unwrap();
        assert_eq!(per_loan.round_dp(2), dec!(13.38));
    }

    #[test]
    fn test_union_yield_is_not_mean_of_parts() {
        let a = vec![released_loan("A", dec!(100000), dec!(13200), 365)];
        let b = vec![released_loan("B", dec!(50000), dec!(3300), 180)];
        let union: Vec<EnrichedLoanRecord> = a.iter().chain(b.iter()).cloned().collect();

        let yield_a = compute_portfolio_metrics(&a).portfolio_yield_pct;
        let yield_b = compute_portfolio_metrics(&b).portfolio_yield_pct;
        let yield_union = compute_portfolio_metrics(&union).portfolio_yield_pct;

        let naive_mean = (yield_a + yield_b) / dec!(2);
        assert_ne!(
            yield_union.round_dp(6),
            naive_mean.round_dp(6),
            "combined yield must come from combined sums, not averaged segment yields"
        );
    }

    #[test]
    fn test_zero_day_holding_excluded() {
        let records = vec![
            released_loan("A", dec!(100000), dec!(6600), 180),
            released_loan("B", dec!(50000), dec!(999), 0),
        ];
        let m = compute_portfolio_metrics(&records);
        assert_eq!(m.loan_count, 1);
        assert_eq!(m.total_capital, dec!(100000));
        assert_eq!(m.total_interest, dec!(6600));
    }

    #[test]
    fn test_active_loans_excluded() {
        let mut active = released_loan("A", dec!(80000), dec!(2000), 90);
        active.record.released = false;
        active.record.released_on = None;
        let active = enrich_record(active.record);

        let m = compute_portfolio_metrics(&[active]);
        assert!(m.insufficient_data);
    }

    #[test]
    fn test_empty_input_is_insufficient() {
        let m = compute_portfolio_metrics(&[]);
        assert!(m.insufficient_data);
        assert_eq!(m.portfolio_yield_pct, Decimal::ZERO);
        assert_eq!(m.weighted_average_days, Decimal::ZERO);
        assert_eq!(m.loan_count, 0);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let records = vec![
            released_loan("A", dec!(100000), dec!(13200), 365),
            released_loan("B", dec!(50000), dec!(3300), 180),
        ];
        let first = compute_portfolio_metrics(&records);
        let second = compute_portfolio_metrics(&records);
        assert_eq!(first, second);
    }
}
