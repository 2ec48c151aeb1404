//! Canonical serialization and digesting.
//!
//! Records are serialized with RFC 8785 JSON canonicalization, so object key
//! order never reaches the digest, then hashed with MD5 for a 128-bit id.

use crate::error::{RecallError, Result};
use crate::types::Fingerprint;
use md5::{Digest, Md5};
use serde_json::Value;

/// Canonical byte form of a JSON value.
pub fn canonical_bytes(value: &Value) -> Result<Vec<u8>> {
    serde_jcs::to_vec(value).map_err(|_| RecallError::invalid_input("data", "canonical JSON"))
}

/// Digest a canonical record.
pub fn digest(record: &Value) -> Result<Fingerprint> {
    let bytes = canonical_bytes(record)?;
    let hash = Md5::digest(&bytes);
    let mut out = [0u8; 16];
    out.copy_from_slice(&hash);
    Ok(Fingerprint::from_bytes(out))
}
