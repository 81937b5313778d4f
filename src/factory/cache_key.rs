//! Deterministic cache-key generation.
//!
//! Keys digest a base name, the plain filter fields and an optional query
//! signature into one SHA-256 hex string. Mapping iteration is sorted, so
//! identical inputs always produce identical keys. Record references are
//! resolved to ids before they reach a mapping, and all text is UTF-8, so
//! no further normalization is needed here.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::types::Mapping;

/// Digest `name`, the mapping's `field=value` pairs and the query
/// signature into a stable cache key.
pub fn cache_key(name: &str, plain: Option<&Mapping>, query_signature: Option<&str>) -> String {
    let mut composite = String::from(name);

    if let Some(mapping) = plain {
        for (field, value) in mapping.iter() {
            composite.push_str(&format!("|{}={}", field, render(value)));
        }
    }

    if let Some(signature) = query_signature {
        composite.push_str(&format!("|query={}", signature));
    }

    hex::encode(Sha256::digest(composite.as_bytes()))
}

/// Bare rendering for digest input: strings without quotes, everything
/// else in JSON form.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
