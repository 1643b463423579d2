use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use loan_analytics_core::RawLoanRecord;

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Read a raw loan snapshot, dispatching on the file extension:
/// `.csv` uses the legacy export headers, `.yaml`/`.yml` parses as
/// YAML, anything else as JSON.
pub fn read_records(path: &str) -> Result<Vec<RawLoanRecord>, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let extension = canonical
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match extension.as_str() {
        "csv" => {
            let mut reader = csv::Reader::from_reader(contents.as_bytes());
            let mut rows = Vec::new();
            for row in reader.deserialize::<RawLoanRecord>() {
                rows.push(row.map_err(|e| {
                    format!("Failed to parse '{}': {}", canonical.display(), e)
                })?);
            }
            rows
        }
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?,
        _ => serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?,
    };

    Ok(records)
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
