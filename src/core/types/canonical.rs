//! Canonical JSON
//!
//! Cache keys and prompts must be byte-identical across runs, so every JSON
//! document that feeds either one goes through these helpers. Objects are
//! rebuilt with sorted keys, which holds whether or not `serde_json` keeps
//! insertion order.

use crate::utils::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};

/// Recursively rebuild every object with its keys in ascending order
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::with_capacity(entries.len());
            for (key, value) in entries {
                sorted.insert(key, sort_keys(value));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Recursively remove object members whose value is `null`
pub fn drop_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, drop_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(drop_nulls).collect()),
        other => other,
    }
}

/// Serialize to a key-sorted JSON value
pub fn to_sorted_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(sort_keys(serde_json::to_value(value)?))
}

/// Compact, key-sorted JSON bytes. This is the hashing input for cache keys.
pub fn to_canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&to_sorted_value(value)?)?)
}

/// Two-space indented, key-sorted JSON. This is what prompts embed.
pub fn to_canonical_pretty<T: Serialize + ?Sized>(value: &T, exclude_nulls: bool) -> Result<String> {
    let mut value = serde_json::to_value(value)?;
    if exclude_nulls {
        value = drop_nulls(value);
    }
    Ok(serde_json::to_string_pretty(&sort_keys(value))?)
}
