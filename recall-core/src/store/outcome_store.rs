//! Call id → outcome map.

use crate::outcome::Outcome;
use crate::types::CallId;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Outcomes of one domain, keyed by call id.
#[derive(Debug, Default)]
pub struct OutcomeStore {
    outcomes: RwLock<HashMap<CallId, Outcome>>,
}

impl OutcomeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an outcome, returning the one it replaced.
    pub fn insert(&self, call_id: CallId, outcome: Outcome) -> Option<Outcome> {
        self.outcomes.write().insert(call_id, outcome)
    }

    /// Deep copy of the outcome stored for a call id.
    pub fn get(&self, call_id: &CallId) -> Option<Outcome> {
        self.outcomes.read().get(call_id).cloned()
    }

    /// Check if an outcome exists for a call id.
    pub fn contains(&self, call_id: &CallId) -> bool {
        self.outcomes.read().contains_key(call_id)
    }

    /// All call ids with an outcome.
    pub fn call_ids(&self) -> Vec<CallId> {
        self.outcomes.read().keys().cloned().collect()
    }

    /// Number of outcomes.
    pub fn len(&self) -> usize {
        self.outcomes.read().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.outcomes.read().is_empty()
    }

    /// Remove all outcomes.
    pub fn clear(&self) {
        self.outcomes.write().clear();
    }
}
