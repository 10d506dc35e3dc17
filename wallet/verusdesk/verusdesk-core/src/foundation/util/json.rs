//! Loose JSON helpers for form-style input.

use serde_json::{Number, Value};

/// True for values the daemon must never see: `null`, and empty or whitespace-only strings.
///
/// `serde_json` cannot represent NaN, so non-finite numbers never reach a `Value`.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Parse a numeric-looking string into a JSON number, preferring integers.
pub fn coerce_number(raw: &str) -> Option<Number> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(Number::from(int));
    }
    let float = trimmed.parse::<f64>().ok()?;
    number_from_f64(float)
}

/// Finite floats with no fractional part are stored as integers so `100.0` serializes as `100`.
pub fn number_from_f64(value: f64) -> Option<Number> {
    if !value.is_finite() {
        return None;
    }
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        return Some(Number::from(value as i64));
    }
    Number::from_f64(value)
}

/// Coerce a loosely typed value to a number where it looks numeric; other values pass through.
pub fn coerce_numeric_value(value: Value) -> Value {
    match value {
        Value::String(s) => match coerce_number(&s) {
            Some(number) => Value::Number(number),
            None => Value::String(s),
        },
        other => other,
    }
}

pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => coerce_number(s).and_then(|n| n.as_f64()),
        _ => None,
    }
}

/// Parse free-form JSON text, handing back the raw string when it does not parse.
pub fn parse_permissive(raw: &str) -> Value {
    let trimmed = raw.trim();
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}
