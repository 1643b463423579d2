pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Hoist a nested "metrics" object into its parent so segment and
/// trend rows render as one flat table row. Parent keys win on
/// collision.
pub fn flatten_metrics(item: &Map<String, Value>) -> Map<String, Value> {
    let mut flat = Map::new();
    for (key, val) in item {
        match (key.as_str(), val) {
            ("metrics", Value::Object(inner)) => {
                for (ikey, ival) in inner {
                    if !item.contains_key(ikey.as_str()) {
                        flat.insert(ikey.clone(), ival.clone());
                    }
                }
            }
            _ => {
                flat.insert(key.clone(), val.clone());
            }
        }
    }
    flat
}
