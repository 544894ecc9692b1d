use serde_json::Value;

/// Pretty-printed JSON, the default format and the one the exercise
/// pages consume verbatim.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("Could not serialize output: {e}"),
    }
}
