use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::error::AnalyticsError;
use crate::types::{CustomerClass, LoanRecord};
use crate::AnalyticsResult;

/// Token identifying the trade book in legacy exports. Matched
/// case-insensitively after trimming; everything else is Private.
const BUSINESS_CLASS_TOKEN: &str = "vyapari";

/// Date formats seen across the legacy exports, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

/// One loan row as it arrives from the data-access collaborator:
/// every field optional, numbers possibly encoded as strings, and the
/// legacy export column names accepted as aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLoanRecord {
    #[serde(default, alias = "loan_number")]
    pub id: Option<Value>,
    #[serde(default, alias = "loan_amount")]
    pub principal: Option<Value>,
    #[serde(default, alias = "date_of_disbursement")]
    pub disbursed_on: Option<String>,
    #[serde(default, alias = "date_of_release")]
    pub released_on: Option<String>,
    #[serde(default)]
    pub released: Option<Value>,
    #[serde(default, alias = "interest_amount")]
    pub charged_interest: Option<Value>,
    #[serde(default, alias = "interest_deposited_till_date")]
    pub collected_interest: Option<Value>,
    #[serde(default, alias = "customer_type")]
    pub customer_class: Option<String>,
    #[serde(default, alias = "ltv_given")]
    pub ltv_pct: Option<Value>,
}

/// Result of normalizing a whole snapshot: the rows that passed
/// validation plus remediation detail for the rows that did not.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotReport {
    pub records: Vec<LoanRecord>,
    pub rejected: Vec<RejectedRecord>,
    /// Released loans carrying no interest at all. These distort
    /// yield figures downward and usually indicate entry gaps.
    pub zero_interest_released: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RejectedRecord {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub reason: String,
}

/// Normalize a single raw row into canonical form, or reject it with
/// the violated invariant. This is the validation boundary: no invalid
/// record reaches the calculators.
pub fn normalize_record(raw: &RawLoanRecord) -> AnalyticsResult<LoanRecord> {
    let id = coerce_id(raw.id.as_ref())
        .ok_or_else(|| AnalyticsError::validation("id", "missing identifier"))?;

    let principal = coerce_decimal(raw.principal.as_ref())
        .ok_or_else(|| AnalyticsError::validation("principal", "missing or unparsable amount"))?;
    if principal <= Decimal::ZERO {
        return Err(AnalyticsError::validation(
            "principal",
            format!("must be positive, got {principal}"),
        ));
    }

    let disbursed_on = match raw.disbursed_on.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => parse_date(s).ok_or_else(|| {
            AnalyticsError::validation("disbursed_on", format!("unparsable date '{s}'"))
        })?,
        _ => {
            return Err(AnalyticsError::validation(
                "disbursed_on",
                "missing disbursement date",
            ))
        }
    };

    let released_on = match raw.released_on.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => Some(parse_date(s).ok_or_else(|| {
            AnalyticsError::validation("released_on", format!("unparsable date '{s}'"))
        })?),
        _ => None,
    };
    if let Some(release) = released_on {
        if release < disbursed_on {
            return Err(AnalyticsError::validation(
                "released_on",
                format!("release {release} precedes disbursement {disbursed_on}"),
            ));
        }
    }

    Ok(LoanRecord {
        id,
        principal,
        disbursed_on,
        released_on,
        released: coerce_released(raw.released.as_ref()),
        // Legacy rows have no charged figure; treat as zero rather
        // than rejecting the row.
        charged_interest: coerce_decimal(raw.charged_interest.as_ref()).unwrap_or(Decimal::ZERO),
        collected_interest: coerce_decimal(raw.collected_interest.as_ref()),
        customer_class: coerce_class(raw.customer_class.as_deref()),
        ltv_pct: coerce_decimal(raw.ltv_pct.as_ref()),
    })
}

/// Normalize a full snapshot, keeping valid rows and reporting the
/// rest by index so the caller can surface data-quality remediation.
pub fn normalize_snapshot(raws: &[RawLoanRecord]) -> SnapshotReport {
    let mut records = Vec::with_capacity(raws.len());
    let mut rejected = Vec::new();
    let mut zero_interest_released = 0usize;

    for (index, raw) in raws.iter().enumerate() {
        match normalize_record(raw) {
            Ok(record) => {
                if record.released
                    && record.charged_interest.is_zero()
                    && record.collected_interest.map_or(true, |c| c <= Decimal::ZERO)
                {
                    zero_interest_released += 1;
                }
                records.push(record);
            }
            Err(e) => rejected.push(RejectedRecord {
                index,
                id: coerce_id(raw.id.as_ref()),
                reason: e.to_string(),
            }),
        }
    }

    SnapshotReport {
        records,
        rejected,
        zero_interest_released,
    }
}

fn coerce_id(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Lenient numeric coercion: numbers pass through, numeric-looking
/// strings parse, anything else (including empty strings) is absent.
fn coerce_decimal(value: Option<&Value>) -> Option<Decimal> {
    match value {
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string()).ok(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Decimal::from_str(trimmed).ok()
            }
        }
        _ => None,
    }
}

/// Released flag: JSON `true` or the literal string "true" in any
/// casing. Everything else, including absence, is not released.
fn coerce_released(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn coerce_class(value: Option<&str>) -> CustomerClass {
    match value {
        Some(s) if s.trim().eq_ignore_ascii_case(BUSINESS_CLASS_TOKEN) => CustomerClass::Business,
        _ => CustomerClass::Private,
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
