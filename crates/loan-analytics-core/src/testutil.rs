//! Record builders shared by the module tests.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::enrich::enrich_record;
use crate::types::{CustomerClass, EnrichedLoanRecord, LoanRecord};

/// A released loan disbursed on 2024-01-01 and held for `days`.
pub(crate) fn released_loan(
    id: &str,
    principal: Decimal,
    interest: Decimal,
    days: i64,
) -> EnrichedLoanRecord {
    let disbursed = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    enrich_record(LoanRecord {
        id: id.into(),
        principal,
        disbursed_on: disbursed,
        released_on: Some(disbursed + Duration::days(days)),
        released: true,
        charged_interest: interest,
        collected_interest: None,
        customer_class: CustomerClass::Private,
        ltv_pct: None,
    })
}

/// A released loan with an explicit release date, for period
/// bucketing tests. The holding period is `days`.
pub(crate) fn released_on(
    id: &str,
    principal: Decimal,
    interest: Decimal,
    released: NaiveDate,
    days: i64,
) -> EnrichedLoanRecord {
    enrich_record(LoanRecord {
        id: id.into(),
        principal,
        disbursed_on: released - Duration::days(days),
        released_on: Some(released),
        released: true,
        charged_interest: interest,
        collected_interest: None,
        customer_class: CustomerClass::Private,
        ltv_pct: None,
    })
}
