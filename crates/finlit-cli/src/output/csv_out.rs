use serde_json::Value;
use std::io;

/// Record arrays worth exporting as CSV bodies, in priority order.
const RECORD_PATHS: [&[&str]; 6] = [
    &["rows"],
    &["schedule", "rows"],
    &["results"],
    &["depreciation_schedule"],
    &["asset_impacts"],
    &["risk_contributions"],
];

/// Write output as CSV to stdout.
///
/// Schedule-shaped results export one row per record; everything else
/// falls back to a two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                if let Some(records) = find_records(result) {
                    write_array_csv(&mut wtr, records);
                } else if let Value::Object(result_map) = result {
                    write_field_value_csv(&mut wtr, result_map);
                } else {
                    let _ = wtr.write_record([&format_csv_value(result)]);
                }
            } else {
                write_field_value_csv(&mut wtr, map);
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn find_records(result: &Value) -> Option<&Vec<Value>> {
    RECORD_PATHS.iter().find_map(|path| {
        lookup(result, path)
            .and_then(|v| v.as_array())
            .filter(|arr| !arr.is_empty())
    })
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cursor = value;
    for key in path {
        cursor = cursor.get(*key)?;
    }
    Some(cursor)
}

fn write_field_value_csv(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    map: &serde_json::Map<String, Value>,
) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
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
