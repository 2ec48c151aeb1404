//! In-memory mock stores.
//!
//! Each domain owns a call store (fingerprint → [`CallRecord`]) and an outcome
//! store (call id → [`Outcome`](crate::outcome::Outcome)). Resolution chains
//! the two: the call record found by fingerprint names the id its outcome is
//! stored under.

mod call_store;
mod outcome_store;
mod registry;

pub use call_store::{CallRecord, CallStore};
pub use outcome_store::OutcomeStore;
pub use registry::{DomainStats, DomainStore, MockRegistry, Orphan, RegistryStats};
