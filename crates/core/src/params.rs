//! Lenient readers for JSON parameter objects.
//!
//! Field kinds and placement overrides are supplied as free-form JSON
//! (`--field-params`, `--set`, recipe files). A missing key or a value of the
//! wrong type falls back to the caller's default instead of failing.

use serde_json::Value;

/// Reads a number from `params[name]`, integers included.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Reads a non-negative integer from `params[name]`.
///
/// Floats and negative numbers are treated as absent.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Reads a string from `params[name]`, or `None` when missing or not a string.
pub fn param_str<'a>(params: &'a Value, name: &str) -> Option<&'a str> {
    params.get(name).and_then(Value::as_str)
}
