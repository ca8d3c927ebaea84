//! Canonical JSON encoding for deterministic serialization.
//!
//! Every hash and signature in the system is computed over the output of
//! this module:
//! - Object keys sorted by ascending lexicographic order, at every level
//! - Compact separators, no whitespace
//! - Integers only (floats are rejected)
//! - Strings escaped the way `JSON.stringify` escapes them
//!
//! The canonical encoding is critical: it ensures that the same record
//! produces identical bytes (and thus identical hashes) on every node,
//! independent of field insertion order.

use serde::Serialize;
use serde_json::Value;

use crate::crypto::Sha256Hash;
use crate::error::CoreError;

/// Encode any serializable record to canonical JSON bytes.
pub fn canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CoreError> {
    let tree = serde_json::to_value(value).map_err(|e| CoreError::Encoding(e.to_string()))?;
    let mut buf = Vec::new();
    write_value(&mut buf, &tree)?;
    Ok(buf)
}

/// SHA-256 over the canonical encoding of a record.
///
/// This is the block identity hash, the proof-of-work guess hash, and the
/// first step of signature-message derivation.
pub fn hash_canonical<T: Serialize>(value: &T) -> Result<Sha256Hash, CoreError> {
    Ok(Sha256Hash::hash(&canonical_bytes(value)?))
}

/// Hash of the canonical empty record `{}`.
///
/// Used as the `previous_hash` of the genesis block.
pub fn empty_record_hash() -> Sha256Hash {
    // The empty map cannot fail to encode.
    hash_canonical(&serde_json::Map::new()).expect("empty record always encodes")
}

/// Recursively encode a JSON value.
fn write_value(buf: &mut Vec<u8>, value: &Value) -> Result<(), CoreError> {
    match value {
        Value::Null => buf.extend_from_slice(b"null"),
        Value::Bool(true) => buf.extend_from_slice(b"true"),
        Value::Bool(false) => buf.extend_from_slice(b"false"),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                buf.extend_from_slice(u.to_string().as_bytes());
            } else if let Some(i) = n.as_i64() {
                buf.extend_from_slice(i.to_string().as_bytes());
            } else {
                // Float formatting differs across platforms and languages;
                // preimages carry integers only.
                return Err(CoreError::Encoding(format!(
                    "non-integer number {n} in canonical payload"
                )));
            }
        }
        Value::String(s) => write_string(buf, s),
        Value::Array(items) => {
            buf.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_value(buf, item)?;
            }
            buf.push(b']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            buf.push(b'{');
            for (i, (key, val)) in entries.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_string(buf, key);
                buf.push(b':');
                write_value(buf, val)?;
            }
            buf.push(b'}');
        }
    }
    Ok(())
}

/// Encode a string with `JSON.stringify`-compatible escaping.
fn write_string(buf: &mut Vec<u8>, s: &str) {
    buf.push(b'"');
    for c in s.chars() {
        match c {
            '"' => buf.extend_from_slice(b"\\\""),
            '\\' => buf.extend_from_slice(b"\\\\"),
            '\u{0008}' => buf.extend_from_slice(b"\\b"),
            '\u{000c}' => buf.extend_from_slice(b"\\f"),
            '\n' => buf.extend_from_slice(b"\\n"),
            '\r' => buf.extend_from_slice(b"\\r"),
            '\t' => buf.extend_from_slice(b"\\t"),
            c if (c as u32) < 0x20 => {
                buf.extend_from_slice(format!("\\u{:04x}", c as u32).as_bytes());
            }
            c => {
                let mut utf8 = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            }
        }
    }
    buf.push(b'"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn keys_sorted_independent_of_insertion_order() {
        let a = json!({
            "value": 5,
            "sender_blockchain_address": "s",
            "recipient_blockchain_address": "r",
        });
        let b = json!({
            "recipient_blockchain_address": "r",
            "sender_blockchain_address": "s",
            "value": 5,
        });
        assert_eq!(canonical_bytes(&a).unwrap(), canonical_bytes(&b).unwrap());
        assert_eq!(
            canonical_bytes(&a).unwrap(),
            br#"{"recipient_blockchain_address":"r","sender_blockchain_address":"s","value":5}"#
        );
    }

    #[test]
    fn nested_objects_sorted() {
        let v = json!({"b": {"z": 1, "a": 2}, "a": [{"y": 1, "x": 2}]});
        assert_eq!(
            canonical_bytes(&v).unwrap(),
            br#"{"a":[{"x":2,"y":1}],"b":{"a":2,"z":1}}"#
        );
    }

    #[test]
    fn empty_record_encodes_to_braces() {
        let empty = serde_json::Map::new();
        assert_eq!(canonical_bytes(&empty).unwrap(), b"{}");
        assert_eq!(empty_record_hash(), Sha256Hash::hash(b"{}"));
    }

    #[test]
    fn control_characters_escaped() {
        let v = json!("a\"b\\c\n\t\u{0001}");
        let expected = "\"a\\\"b\\\\c\\n\\t\\u0001\"";
        assert_eq!(canonical_bytes(&v).unwrap(), expected.as_bytes());
    }

    #[test]
    fn floats_rejected() {
        let v = json!({"value": 1.5});
        assert!(matches!(canonical_bytes(&v), Err(CoreError::Encoding(_))));
    }

    #[test]
    fn negative_integers_supported() {
        let v = json!({"delta": -42});
        assert_eq!(canonical_bytes(&v).unwrap(), br#"{"delta":-42}"#);
    }

    proptest! {
        #[test]
        fn deterministic_for_arbitrary_strings(s in ".*", v in 0u64..u64::MAX) {
            let record = json!({"sender_blockchain_address": s, "value": v});
            let first = canonical_bytes(&record).unwrap();
            let second = canonical_bytes(&record).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn output_is_valid_json(s in ".*") {
            let record = json!({"k": s});
            let bytes = canonical_bytes(&record).unwrap();
            let parsed: Value = serde_json::from_slice(&bytes).unwrap();
            prop_assert_eq!(parsed, record);
        }
    }
}
