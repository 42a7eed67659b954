//! Canonical JSON serialization and evidentiary document hashing.
//!
//! Dispute evidence is anchored by a deterministic digest: the payload is
//! serialized with lexicographically sorted keys, no whitespace, and no null
//! fields, then hashed with Blake3. The same payload always produces the same
//! digest, which is what makes the append-only evidence chain auditable.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanonicalJsonError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CanonicalJsonError>;

/// Serialize a value to its canonical JSON string.
pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let json_value = serde_json::to_value(value)?;
    let canonical = canonicalize_value(json_value);
    Ok(serde_json::to_string(&canonical)?)
}

/// Blake3 digest of the canonical JSON representation.
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<[u8; 32]> {
    let canonical_json = to_canonical_json(value)?;
    Ok(*blake3::hash(canonical_json.as_bytes()).as_bytes())
}

/// Hex-encoded canonical digest, the opaque `hash(document)` used for the
/// dispute evidence chain.
pub fn document_digest<T: Serialize>(value: &T) -> Result<String> {
    Ok(hex::encode(canonical_hash(value)?))
}

fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, canonicalize_value(v)))
                .collect();

            // Map preserves insertion order, which is now sorted
            Value::Object(Map::from_iter(sorted))
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize_value).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_sorted_and_compact() {
        let value = json!({"zeta": 1, "alpha": {"nested_b": 2, "nested_a": 3}});
        let canonical = to_canonical_json(&value).unwrap();
        assert_eq!(canonical, r#"{"alpha":{"nested_a":3,"nested_b":2},"zeta":1}"#);
    }

    #[test]
    fn test_nulls_omitted() {
        let value = json!({"kept": 1, "dropped": null});
        let canonical = to_canonical_json(&value).unwrap();
        assert_eq!(canonical, r#"{"kept":1}"#);
    }

    #[test]
    fn test_digest_deterministic() {
        let a = json!({"b": 2, "a": 1});
        let b = json!({"a": 1, "b": 2});
        assert_eq!(document_digest(&a).unwrap(), document_digest(&b).unwrap());

        let c = json!({"a": 1, "b": 3});
        assert_ne!(document_digest(&a).unwrap(), document_digest(&c).unwrap());
    }

    #[test]
    fn test_digest_is_hex() {
        let digest = document_digest(&json!({"reason": "non-payment"})).unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
