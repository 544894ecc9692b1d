use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Render results as text tables.
///
/// Scalar fields of the result form a Field/Value table. Record arrays
/// (schedule rows, depreciation years, per-asset impacts, grade results)
/// and nested objects each get their own table after it, followed by
/// warnings and the methodology line.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_sections_or_flat(map, value);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

/// Multi-section outputs (e.g. portfolio --stress) nest one envelope per
/// section under a plain object.
fn print_sections_or_flat(map: &serde_json::Map<String, Value>, whole: &Value) {
    let mut printed = false;
    for (section, envelope) in map {
        if let Value::Object(env_map) = envelope {
            if let Some(result) = env_map.get("result") {
                if printed {
                    println!();
                }
                println!("[{}]", section);
                print_result_table(result, env_map);
                printed = true;
            }
        }
    }
    if !printed {
        print_flat_object(whole);
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    print_value_tables("", result);

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}

/// One Field/Value table for the scalars, then a labelled table per
/// nested object or record array.
fn print_value_tables(prefix: &str, value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        let mut has_scalars = false;
        for (key, val) in map {
            if !val.is_object() && !is_record_array(val) {
                builder.push_record([key.as_str(), &format_value(val)]);
                has_scalars = true;
            }
        }
        if has_scalars {
            println!("{}", Table::from(builder));
        }

        for (key, val) in map {
            let label = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            if let Value::Array(rows) = val {
                if is_record_array(val) {
                    println!("\n{}:", label);
                    print_array_table(rows);
                }
            } else if val.is_object() {
                println!("\n{}:", label);
                print_value_tables(&label, val);
            }
        }
    } else {
        println!("{}", format_value(value));
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.iter().map(String::as_str));

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn is_record_array(value: &Value) -> bool {
    matches!(value, Value::Array(arr) if matches!(arr.first(), Some(Value::Object(_))))
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
