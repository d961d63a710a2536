//! snake_case → camelCase key conversion for response bodies.
//!
//! The backend answers in snake_case while the typed models are camelCase.
//! Every parsed body goes through [`camelize`] before deserialization.

use serde_json::{Map, Value};

/// Convert one key: each `_` followed by a lowercase ASCII letter becomes
/// that letter uppercased. Anything else is copied as is.
pub fn camelize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(next) = chars.peek().copied().filter(|n| n.is_ascii_lowercase()) {
                out.push(next.to_ascii_uppercase());
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Recursively camelize every object key in `value`.
pub fn camelize(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(camelize).collect()),
        Value::Object(map) => {
            let converted: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| (camelize_key(&k), camelize(v)))
                .collect();
            Value::Object(converted)
        }
        scalar => scalar,
    }
}
