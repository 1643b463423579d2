use rust_decimal::Decimal;

use crate::types::{EnrichedLoanRecord, LoanRecord};

/// Attach the derived yield inputs to a canonical record.
///
/// Realized interest prefers the collected amount when one was
/// recorded and is positive, falling back to the charged amount for
/// legacy rows without collection tracking. A collected amount below
/// the charged amount is kept as-is; partial collection is a real
/// outcome, not an error. Active loans get no realized interest and
/// are thereby excluded from yield analysis.
pub fn enrich_record(record: LoanRecord) -> EnrichedLoanRecord {
    let holding_period_days = record
        .released_on
        .map(|release| (release - record.disbursed_on).num_days());

    let realized_interest = if record.released {
        Some(match record.collected_interest {
            Some(collected) if collected > Decimal::ZERO => collected,
            _ => record.charged_interest,
        })
    } else {
        None
    };

    EnrichedLoanRecord {
        record,
        holding_period_days,
        realized_interest,
    }
}

pub fn enrich_records(records: Vec<LoanRecord>) -> Vec<EnrichedLoanRecord> {
    records.into_iter().map(enrich_record).collect()
}
