use serde_json::Value;

/// Parses the "child order" text input (1 for first child, ...).
/// Blank, zero or non-numeric input yields `None` rather than a bogus number.
pub fn parse_child_order(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

/// JSON value to dispatch for a child order input; `null` clears the field.
pub fn child_order_value(input: &str) -> Value {
    parse_child_order(input)
        .map(Value::from)
        .unwrap_or(Value::Null)
}

/// Parses a "lat, lng" pair pasted from a map application.
pub fn parse_coordinates(input: &str) -> Option<(f64, f64)> {
    let (lat, lng) = input.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) {
        Some((lat, lng))
    } else {
        None
    }
}

/// JSON value to dispatch for a coordinates input; `null` clears the pin.
pub fn coordinates_value(input: &str) -> Value {
    match parse_coordinates(input) {
        Some((lat, lng)) => serde_json::json!({ "lat": lat, "lng": lng }),
        None => Value::Null,
    }
}
