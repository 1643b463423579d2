use serde_json::Value;
use std::io;

use super::flatten_metrics;

/// Write output as CSV to stdout. Objects become field/value rows,
/// arrays become one record per element with nested metrics hoisted.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in map {
                let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    let rows: Vec<Value> = arr
        .iter()
        .map(|item| match item {
            Value::Object(map) => Value::Object(flatten_metrics(map)),
            other => other.clone(),
        })
        .collect();

    if let Some(Value::Object(first)) = rows.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in &rows {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in &rows {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
