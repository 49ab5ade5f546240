use std::collections::BTreeMap;

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Produce canonical JSON bytes: object keys sorted lexicographically
/// (recursive), arrays preserve order, no extra whitespace.
///
/// Signatures and patterns hashes are defined over these bytes, so the
/// output must be byte-stable across runs and platforms.
pub fn canonical_json_bytes(value: &Value) -> Vec<u8> {
    let sorted = sort_value(value);
    serde_json::to_vec(&sorted).expect("canonical JSON serialization should not fail")
}

/// SHA-256 over the canonical JSON form of `value`, lowercase hex.
pub fn canonical_hash(value: &Value) -> String {
    sha256_hex(&canonical_json_bytes(value))
}

/// Compute SHA-256 hash of bytes, returning lowercase hex string.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn sort_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            // BTreeMap does the key ordering.
            let sorted: BTreeMap<&String, Value> =
                map.iter().map(|(k, v)| (k, sort_value(v))).collect();
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), v))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_value).collect()),
        other => other.clone(),
    }
}
