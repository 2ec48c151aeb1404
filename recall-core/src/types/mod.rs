//! Core types for recall.
//!
//! - `Fingerprint`: 128-bit digest identifying a call by its deterministic inputs
//! - `CallId`: join key between a call record and its outcome record
//! - `Domain`: the interception surface a call belongs to

mod domain;
mod ids;

pub use domain::Domain;
pub use ids::{CallId, Fingerprint};
