//! Stable fingerprints for call data.
//!
//! A fingerprint identifies a call by its deterministic inputs only. For any
//! two calls whose deterministic fields are equal the fingerprint is equal,
//! whatever their timestamps, connection ids, generated ids or key order.
//!
//! # Example
//!
//! ```
//! use recall_core::fingerprint::fingerprint;
//! use recall_core::types::Domain;
//! use serde_json::json;
//!
//! let a = fingerprint(Domain::DbQuery, &json!({"query": "SELECT 1", "connectionId": 1})).unwrap();
//! let b = fingerprint(Domain::DbQuery, &json!({"connectionId": 2, "query": "SELECT 1"})).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.to_hex().len(), 32);
//! ```

mod canonical;
pub mod schema;

pub use canonical::{canonical_bytes, digest};
pub use schema::SchemaAdapter;

use crate::error::{RecallError, Result};
use crate::types::{Domain, Fingerprint};
use serde_json::Value;

/// Compute the fingerprint of raw call data for a domain.
///
/// # Errors
/// Returns `InvalidInput` when a structural field has the wrong shape.
pub fn fingerprint(domain: Domain, data: &Value) -> Result<Fingerprint> {
    fingerprint_with_record(domain, data).map(|(fingerprint, _)| fingerprint)
}

/// Compute the fingerprint together with the canonical record it hashes.
pub fn fingerprint_with_record(domain: Domain, data: &Value) -> Result<(Fingerprint, Value)> {
    let record = canonical_record(domain, data)?;
    let fingerprint = digest(&record)?;
    Ok((fingerprint, record))
}

/// Project call data onto the deterministic record of its domain.
pub fn canonical_record(domain: Domain, data: &Value) -> Result<Value> {
    let mut map = schema::as_object(data, "data")?;
    let spec = domain.spec();
    spec.apply_renames(&mut map);
    let adapter = schema::select(spec.adapters, &map)
        .ok_or_else(|| RecallError::invalid_input("data", "a recognised call schema"))?;
    tracing::trace!(domain = %domain, adapter = adapter.name, "Projecting call data");
    (adapter.project)(&map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn is_hex_digest(s: &str) -> bool {
        s.len() == 32 && s.chars().all(|c| c.is_ascii_hexdigit())
    }

    #[test]
    fn empty_data_has_digest_shape() {
        for domain in Domain::ALL {
            let fp = fingerprint(domain, &json!({})).unwrap();
            assert!(is_hex_digest(&fp.to_hex()));
            assert_eq!(fingerprint(domain, &Value::Null).unwrap(), fp);
        }
    }

    #[test]
    fn non_object_data_is_invalid() {
        assert!(matches!(
            fingerprint(Domain::DbQuery, &json!("SELECT 1")),
            Err(RecallError::InvalidInput { .. })
        ));
    }

    #[test]
    fn db_record_keeps_options() {
        let db = canonical_record(Domain::DbQuery, &json!({"options": {"a": 1}})).unwrap();
        assert_eq!(db["options"], json!({"a": 1}));
    }
}
