use crate::domain::Payload;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Deepest container nesting that is traversed. A container found below this
/// depth is replaced by the mask as a whole.
pub const MAX_DEPTH: usize = 64;

/// Return a copy of `payload` in which every value stored under a key listed
/// in `blacklist` is replaced by `mask`.
///
/// Keys are matched exactly and only on mappings; sequence positions are never
/// matched. A masked value is not traversed further, whatever its type.
/// Everything else keeps its shape and content, so sanitizing an already
/// sanitized payload returns it unchanged.
pub fn sanitize(payload: &Payload, blacklist: &HashSet<String>, mask: &str) -> Payload {
    sanitize_at(payload, blacklist, mask, 0)
}

fn sanitize_at(value: &Value, blacklist: &HashSet<String>, mask: &str, depth: usize) -> Value {
    match value {
        Value::Object(map) => {
            if depth >= MAX_DEPTH {
                return Value::String(mask.to_string());
            }
            let mut out = Map::with_capacity(map.len());
            for (key, inner) in map {
                let sanitized = if blacklist.contains(key) {
                    Value::String(mask.to_string())
                } else {
                    sanitize_at(inner, blacklist, mask, depth + 1)
                };
                out.insert(key.clone(), sanitized);
            }
            Value::Object(out)
        }
        Value::Array(items) => {
            if depth >= MAX_DEPTH {
                return Value::String(mask.to_string());
            }
            Value::Array(
                items
                    .iter()
                    .map(|item| sanitize_at(item, blacklist, mask, depth + 1))
                    .collect(),
            )
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => value.clone(),
    }
}
