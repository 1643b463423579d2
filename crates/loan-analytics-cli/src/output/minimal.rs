use serde_json::Value;

use super::flatten_metrics;

/// Field holding the headline figure of an object, in priority order.
const VALUE_KEYS: [&str; 5] = [
    "portfolio_yield_pct",
    "quadrant",
    "priority",
    "accepted",
    "total_capital",
];

/// Field naming a row when printing arrays.
const LABEL_KEYS: [&str; 4] = ["period", "name", "title", "indicator"];

/// Print just the key answer: the headline field of an object, or one
/// `label: value` line per array element.
pub fn print_minimal(value: &Value) {
    match value {
        Value::Object(map) => {
            let flat = flatten_metrics(map);
            for key in &VALUE_KEYS {
                if let Some(val) = flat.get(*key) {
                    if !val.is_null() {
                        println!("{}", format_minimal(val));
                        return;
                    }
                }
            }
            if let Some((key, val)) = flat.iter().next() {
                println!("{}: {}", key, format_minimal(val));
            }
        }
        Value::Array(arr) => {
            if arr.is_empty() {
                println!("(empty)");
                return;
            }
            for item in arr {
                match item {
                    Value::Object(map) => {
                        let flat = flatten_metrics(map);
                        let label = LABEL_KEYS
                            .iter()
                            .find_map(|k| flat.get(*k))
                            .map(format_minimal);
                        let headline = VALUE_KEYS
                            .iter()
                            .find_map(|k| flat.get(*k))
                            .map(format_minimal);
                        match (label, headline) {
                            (Some(l), Some(v)) => println!("{}: {}", l, v),
                            (Some(l), None) => println!("{}", l),
                            (None, Some(v)) => println!("{}", v),
                            (None, None) => println!("{}", format_minimal(item)),
                        }
                    }
                    other => println!("{}", format_minimal(other)),
                }
            }
        }
        other => println!("{}", format_minimal(other)),
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
