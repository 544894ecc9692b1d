use serde_json::Value;

/// Output fields worth printing alone, most specific first.
const ANSWER_KEYS: [&str; 10] = [
    "monthly_payment",
    "total_cost_of_ownership",
    "portfolio_impact_pct",
    "sharpe_ratio",
    "var_95_pct",
    "std_dev_pct",
    "percent_correct",
    "months_saved",
    "payment",
    "reply",
];

/// Print only the headline figure (or reply) of a result.
///
/// Fixture-checking runs usually want a single number to compare, so
/// this strips the envelope and picks the best-known field, falling
/// back to the first field when nothing on the list is present.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|envelope| envelope.get("result"))
        .unwrap_or(value);

    let map = match result {
        Value::Object(map) => map,
        scalar => {
            println!("{}", render(scalar));
            return;
        }
    };

    let headline = ANSWER_KEYS
        .iter()
        .find_map(|key| map.get(*key).filter(|v| !v.is_null()));

    match headline {
        Some(val) => println!("{}", render(val)),
        None => match map.iter().next() {
            Some((key, val)) => println!("{}: {}", key, render(val)),
            None => println!("{}", render(result)),
        },
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
