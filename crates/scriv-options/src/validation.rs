#![forbid(unsafe_code)]

//! Total validation helpers.
//!
//! Every helper maps arbitrary raw input to a value in range, falling back to
//! the caller's default. None of them can fail: clamping and defaulting are
//! the whole error-handling story for user input.

use serde_json::Value;

/// Read a boolean, treating the string `"false"` as `false` (a historical
/// raw-surface quirk) and any other non-missing value by truthiness.
#[must_use]
pub fn boolean_or(value: Option<&Value>, default: bool) -> bool {
    match value {
        None | Some(Value::Null) => default,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) if s == "false" => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(_) => true,
    }
}

/// Read an integer, accepting numeric strings, clamping into
/// `minimum..=maximum`, truncating fractional input.
#[must_use]
pub fn clamped_int(value: Option<&Value>, default: i64, minimum: i64, maximum: i64) -> i64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(f) if f.is_finite() => (f as i64).clamp(minimum, maximum),
        _ => default,
    }
}

/// Read a float, accepting numeric strings.
#[must_use]
pub fn float_or(value: Option<&Value>, default: f64) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(f) if f.is_finite() => f,
        _ => default,
    }
}

/// Read a float and clamp it into `minimum..=maximum`.
#[must_use]
pub fn clamped_float(value: Option<&Value>, default: f64, minimum: f64, maximum: f64) -> f64 {
    float_or(value, default).clamp(minimum, maximum)
}

/// Read a string, defaulting on any non-string input.
#[must_use]
pub fn string_or(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => default.to_string(),
    }
}

/// Read a string restricted to an allowed set, with optional renames for
/// deprecated spellings applied before the membership check.
#[must_use]
pub fn string_set(
    value: Option<&Value>,
    default: &str,
    allowed: &[&str],
    renamed: &[(&str, &str)],
) -> String {
    let Some(Value::String(s)) = value else {
        return default.to_string();
    };
    let s = renamed
        .iter()
        .find(|(old, _)| old == s)
        .map_or(s.as_str(), |(_, new)| new);
    if allowed.contains(&s) {
        s.to_string()
    } else {
        default.to_string()
    }
}
