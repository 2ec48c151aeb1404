//! Fingerprint → call record map.

use crate::types::{CallId, Fingerprint};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// A loaded call, reduced to what resolution needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    /// Fingerprint the call is stored under.
    pub fingerprint: Fingerprint,
    /// Id joining the call to its outcome.
    pub call_id: CallId,
    /// Deterministic subset that was hashed.
    pub record: Value,
}

/// Call records of one domain, keyed by fingerprint.
#[derive(Debug, Default)]
pub struct CallStore {
    records: RwLock<HashMap<Fingerprint, CallRecord>>,
}

impl CallStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record, returning the one it replaced.
    pub fn insert(&self, record: CallRecord) -> Option<CallRecord> {
        self.records.write().insert(record.fingerprint, record)
    }

    /// Look up a record by fingerprint.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<CallRecord> {
        self.records.read().get(fingerprint).cloned()
    }

    /// Look up only the call id stored for a fingerprint.
    pub fn call_id(&self, fingerprint: &Fingerprint) -> Option<CallId> {
        self.records
            .read()
            .get(fingerprint)
            .map(|record| record.call_id.clone())
    }

    /// Snapshot of all records.
    pub fn records(&self) -> Vec<CallRecord> {
        self.records.read().values().cloned().collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Remove all records.
    pub fn clear(&self) {
        self.records.write().clear();
    }
}
