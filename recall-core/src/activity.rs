//! Activity log recording of passthrough calls.
//!
//! Records every call that reached a real collaborator, together with its
//! outcome, in fixture form. Writing the log out produces a file that
//! [`FixtureLoader::load_from_file`](crate::fixture::FixtureLoader::load_from_file)
//! loads back, turning one real run into fixtures for the next.

use crate::error::{RecallError, Result};
use crate::fixture::FixtureEntry;
use crate::outcome::CallFailure;
use crate::types::{CallId, Domain};
use parking_lot::RwLock;
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Recorder of fixture entries for passthrough calls.
///
/// Thread-safe and can be shared across async tasks.
///
/// # Example
///
/// ```
/// use recall_core::activity::ActivityLog;
/// use recall_core::types::Domain;
/// use serde_json::json;
///
/// let log = ActivityLog::new();
/// let id = log.record_call(Domain::DbQuery, json!({"query": "SELECT 1"}), &Ok(json!([])));
///
/// let entries = log.entries();
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[0].data["dbQueryId"], id.as_str());
/// assert!(log.to_jsonl().contains("dbResponse"));
/// ```
#[derive(Debug)]
pub struct ActivityLog {
    entries: RwLock<Vec<FixtureEntry>>,
    enabled: AtomicBool,
}

impl ActivityLog {
    /// Create an empty, enabled log.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            enabled: AtomicBool::new(true),
        }
    }

    /// Append an entry.
    pub fn record(&self, entry: FixtureEntry) {
        if self.is_enabled() {
            self.entries.write().push(entry);
        }
    }

    /// Record a settled call and its outcome.
    ///
    /// The call is stamped with a fresh call id and its creation time. Returns
    /// the id, whether or not recording is enabled.
    pub fn record_call(
        &self,
        domain: Domain,
        call_data: Value,
        result: &std::result::Result<Value, CallFailure>,
    ) -> CallId {
        let spec = domain.spec();
        let call_id = CallId::generate();
        if !self.is_enabled() {
            return call_id;
        }

        let mut data = match call_data {
            Value::Object(map) => map,
            other => {
                let mut map = serde_json::Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        data.insert(spec.id_field.to_string(), Value::String(call_id.to_string()));
        data.insert(
            spec.create_time_field.to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );

        let call = FixtureEntry::new(spec.call_kind, Value::Object(data));
        let outcome = (spec.record_outcome)(&call_id, result);
        tracing::debug!(
            domain = %domain,
            call_id = %call_id,
            kind = %outcome.kind,
            "Recorded passthrough call"
        );

        let mut entries = self.entries.write();
        entries.push(call);
        entries.push(outcome);
        call_id
    }

    /// Snapshot of all entries, in recording order.
    pub fn entries(&self) -> Vec<FixtureEntry> {
        self.entries.read().clone()
    }

    /// Entries of one fixture type.
    pub fn entries_of_kind(&self, kind: &str) -> Vec<FixtureEntry> {
        self.entries
            .read()
            .iter()
            .filter(|entry| entry.kind == kind)
            .cloned()
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Enable or disable recording.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Check if recording is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Encode all entries as JSON lines.
    pub fn to_jsonl(&self) -> String {
        self.entries
            .read()
            .iter()
            .map(|entry| entry.to_line() + "\n")
            .collect()
    }

    /// Write all entries to a JSON-lines file, replacing its contents.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_jsonl()).map_err(|e| RecallError::io(path, e))?;
        tracing::info!(path = %path.display(), entries = self.len(), "Wrote activity log");
        Ok(())
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}
