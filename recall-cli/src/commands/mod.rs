//! CLI command implementations.

pub mod fingerprint;
pub mod inspect;
pub mod validate;
pub mod version;
