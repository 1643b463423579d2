use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::flatten_metrics;

/// Format output as a table using the tabled crate. Objects render as
/// field/value pairs, arrays as one row per element with nested
/// metrics hoisted into the row.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(_) => print_object_table(value),
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_object_table(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        let table = Table::from(builder);
        println!("{}", table);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Flatten rows first so headers cover the hoisted metric fields
    let rows: Vec<Value> = arr
        .iter()
        .map(|item| match item {
            Value::Object(map) => Value::Object(flatten_metrics(map)),
            other => other.clone(),
        })
        .collect();

    if let Some(Value::Object(first)) = rows.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in &rows {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h.as_str())
                            .map(format_value)
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        let table = Table::from(builder);
        println!("{}", table);
    } else {
        for item in &rows {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
