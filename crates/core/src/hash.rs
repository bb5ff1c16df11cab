use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::js_json;

/// Compute the content hash of a simulation payload.
///
/// SHA-256 over the compact serialization `JSON.stringify` would produce,
/// lowercase hex. Object keys are serialized in the order they were parsed,
/// so reordering keys changes the hash; number spelling (`1.0`, `1e0`, `1`)
/// does not.
pub fn content_hash(data: &Value) -> String {
    let canonical = js_json::to_vec(data)
        .unwrap_or_else(|e| panic!("serialization error computing content hash: {}", e));
    let hash = Sha256::digest(&canonical);
    format!("{:x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Value {
        serde_json::from_str(src).unwrap()
    }

    #[test]
    fn hash_is_64_lowercase_hex() {
        let h = content_hash(&serde_json::json!({"x": 1}));
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn hash_matches_known_digest() {
        // sha256("{\"x\":1}")
        assert_eq!(
            content_hash(&serde_json::json!({"x": 1})),
            "5041bf1f713df204784353e82f6a4a535931cb64f1f4b4a5aeaffcb720918b22"
        );
    }

    #[test]
    fn float_spelling_does_not_change_hash() {
        // sha256("{\"x\":1,\"y\":100}")
        let expected = format!("{:x}", Sha256::digest(br#"{"x":1,"y":100}"#));
        assert_eq!(content_hash(&parse(r#"{"x":1.0,"y":1e2}"#)), expected);
        assert_eq!(content_hash(&parse(r#"{"x":1,"y":100}"#)), expected);
    }

    #[test]
    fn key_order_changes_hash() {
        let a = parse(r#"{"a":1,"b":2}"#);
        let b = parse(r#"{"b":2,"a":1}"#);
        assert_ne!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn whitespace_in_source_does_not_matter() {
        let a = parse(r#"{"a": [1, 2]}"#);
        let b = parse(r#"{"a":[1,2]}"#);
        assert_eq!(content_hash(&a), content_hash(&b));
    }
}
