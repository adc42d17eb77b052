//! Restores integer typing to metric values
//!
//! The statistics channel only yields element text, so every counter lands in
//! the snapshot as a string. Before output, any string that is a plain
//! base-10 integer literal is turned back into a JSON number. Everything else
//! is left alone, including strings that merely look numeric (`"+5"`,
//! `" 7"`, `"1.5"`).

use serde_json::{Map, Value};

use crate::stats::errors::{CacheError, Result};

/// Returns a copy of `value` with integer-like string leaves converted to numbers
pub fn coerce_integers(value: &Value) -> Value {
    match value {
        Value::String(s) => parse_integer(s).unwrap_or_else(|| value.clone()),
        Value::Array(items) => Value::Array(items.iter().map(coerce_integers).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), coerce_integers(v)))
                .collect::<Map<String, Value>>(),
        ),
        _ => value.clone(),
    }
}

/// Parses JSON text and applies `coerce_integers` to the result
pub fn decode_str(text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text).map_err(CacheError::from)?;
    Ok(coerce_integers(&value))
}

fn parse_integer(s: &str) -> Option<Value> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    if let Ok(n) = s.parse::<i64>() {
        return Some(Value::from(n));
    }

    // Byte counters can exceed i64 on long running servers
    s.parse::<u64>().ok().map(Value::from)
}
