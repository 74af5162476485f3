//! Deterministic JSON emission.
//!
//! Machine-readable CLI output is emitted in JCS (RFC 8785) canonical form so
//! identical summaries serialize to identical bytes.

use anyhow::{Context, Result};
use serde::Serialize;

/// Serialize `value` as canonical JSON (sorted keys, no insignificant whitespace).
///
/// # Errors
///
/// Returns an error if the value cannot be represented as JSON.
pub fn emit_jcs<T: Serialize>(value: &T) -> Result<String> {
    let json_value =
        serde_json::to_value(value).with_context(|| "Failed to serialize value to JSON")?;
    let json_bytes = serde_json_canonicalizer::to_vec(&json_value)
        .with_context(|| "Failed to canonicalize JSON using JCS")?;
    String::from_utf8(json_bytes).with_context(|| "JCS output contained invalid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_emit_jcs_sorts_keys() {
        let value = json!({"b": 1, "a": [true, null], "c": {"z": "x", "y": 2}});
        let out = emit_jcs(&value).unwrap();
        assert_eq!(out, r#"{"a":[true,null],"b":1,"c":{"y":2,"z":"x"}}"#);
    }

    #[test]
    fn test_emit_jcs_is_stable_across_insertion_order() {
        let first = json!({"path": "README.md", "size": 10});
        let second = json!({"size": 10, "path": "README.md"});
        assert_eq!(emit_jcs(&first).unwrap(), emit_jcs(&second).unwrap());
    }
}
