pub mod file;
pub mod stdin;

use loan_analytics_core::{
    enrich_records, normalize_snapshot, EnrichedLoanRecord, RawLoanRecord,
};

/// Read raw records from `--input` or, failing that, from piped
/// stdin JSON.
pub fn load_raw_records(
    input: &Option<String>,
) -> Result<Vec<RawLoanRecord>, Box<dyn std::error::Error>> {
    if let Some(path) = input {
        file::read_records(path)
    } else if let Some(value) = stdin::read_stdin()? {
        Ok(serde_json::from_value(value)?)
    } else {
        Err("--input is required (or pipe a JSON snapshot via stdin)".into())
    }
}

/// Raw records through the normalizer boundary and enrichment.
/// Rejected rows are reported on stderr and skipped; `lpa check`
/// shows the full detail.
pub fn load_enriched_records(
    input: &Option<String>,
) -> Result<Vec<EnrichedLoanRecord>, Box<dyn std::error::Error>> {
    let raws = load_raw_records(input)?;
    let report = normalize_snapshot(&raws);
    if !report.rejected.is_empty() {
        eprintln!(
            "warning: {} record(s) failed validation and were skipped (run `lpa check` for detail)",
            report.rejected.len()
        );
    }
    Ok(enrich_records(report.records))
}
