use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages on the 0-100 scale (13.25 = 13.25%). Never as fractions.
pub type Rate = Decimal;

/// Day counts, kept as Decimal for weighted arithmetic.
pub type Days = Decimal;

/// Customer book classification. The business book covers trade
/// customers; everything else falls into the private book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerClass {
    Business,
    #[default]
    Private,
}

/// A validated loan in canonical form. Only the normalizer produces
/// these; every downstream calculation assumes the invariants hold
/// (positive principal, release date on or after disbursement).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: String,
    pub principal: Money,
    pub disbursed_on: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released_on: Option<NaiveDate>,
    pub released: bool,
    pub charged_interest: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collected_interest: Option<Money>,
    pub customer_class: CustomerClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ltv_pct: Option<Rate>,
}

/// A loan record plus the derived figures used by the yield math:
/// the holding period (release minus disbursement, when a release date
/// exists) and the realized interest (released loans only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedLoanRecord {
    #[serde(flatten)]
    pub record: LoanRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holding_period_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realized_interest: Option<Money>,
}

impl EnrichedLoanRecord {
    /// Whether this record participates in portfolio yield math.
    /// Active loans and zero-day releases are excluded.
    pub fn is_yield_eligible(&self) -> bool {
        self.record.principal > Decimal::ZERO
            && self.holding_period_days.map_or(false, |d| d > 0)
            && self.realized_interest.is_some()
    }

    /// Per-loan annualized yield, for display and outlier inspection.
    /// Never aggregated by averaging; portfolio figures come from the
    /// capital-weighted calculation instead.
    pub fn annualized_yield_pct(&self) -> Option<Rate> {
        if !self.is_yield_eligible() {
            return None;
        }
        let days = Decimal::from(self.holding_period_days?);
        let interest = self.realized_interest?;
        Some((interest / self.record.principal) * (dec!(365) / days) * dec!(100))
    }
}

/// Capital-and-time-weighted yield metrics for a record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub total_interest: Money,
    pub total_capital: Money,
    pub weighted_average_days: Days,
    pub portfolio_yield_pct: Rate,
    pub simple_return_pct: Rate,
    pub loan_count: usize,
    pub insufficient_data: bool,
}

impl PortfolioMetrics {
    /// Zeroed metrics for a set with nothing to measure. Returned, not
    /// thrown; empty buckets are a normal condition.
    pub fn insufficient() -> Self {
        PortfolioMetrics {
            total_interest: Decimal::ZERO,
            total_capital: Decimal::ZERO,
            weighted_average_days: Decimal::ZERO,
            portfolio_yield_pct: Decimal::ZERO,
            simple_return_pct: Decimal::ZERO,
            loan_count: 0,
            insufficient_data: true,
        }
    }
}
