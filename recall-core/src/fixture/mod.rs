//! Fixture entries and the `{type, data}` file format.
//!
//! A fixture file holds one JSON object per line. Each names its `type`,
//! which selects both the domain and whether the entry is a call or an
//! outcome, and carries the logged `data` of that call or outcome.

mod loader;

pub use loader::{FixtureLoader, LoadOptions, LoadReport};

use crate::types::Domain;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// One line of a fixture file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureEntry {
    /// Fixture type name, such as `dbQuery` or `httpResponse`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Logged call or outcome data.
    pub data: Value,
}

impl FixtureEntry {
    /// Create an entry.
    pub fn new(kind: impl Into<String>, data: Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }

    /// Resolve the entry's type against the known domains.
    pub fn fixture_kind(&self) -> Option<FixtureKind> {
        fixture_kind(&self.kind)
    }

    /// Encode as a JSON value.
    pub fn to_value(&self) -> Value {
        json!({"type": self.kind, "data": self.data})
    }

    /// Encode as a single fixture file line, without the trailing newline.
    pub fn to_line(&self) -> String {
        self.to_value().to_string()
    }
}

/// Whether a fixture entry describes a call or its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Call data, stored under its fingerprint.
    Call,
    /// Outcome data, stored under the call id.
    Outcome,
}

/// Where a fixture type is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixtureKind {
    /// Target domain.
    pub domain: Domain,
    /// Call or outcome.
    pub record: RecordKind,
}

/// Look up the domain and record kind of a fixture type name.
pub fn fixture_kind(name: &str) -> Option<FixtureKind> {
    Domain::ALL.into_iter().find_map(|domain| {
        let spec = domain.spec();
        if spec.call_kind == name {
            Some(FixtureKind {
                domain,
                record: RecordKind::Call,
            })
        } else if spec.is_outcome_kind(name) {
            Some(FixtureKind {
                domain,
                record: RecordKind::Outcome,
            })
        } else {
            None
        }
    })
}

/// Every fixture type name, calls first within each domain.
pub fn fixture_kind_names() -> impl Iterator<Item = &'static str> {
    Domain::ALL.into_iter().flat_map(|domain| {
        let spec = domain.spec();
        std::iter::once(spec.call_kind).chain(spec.outcome_kinds.iter().copied())
    })
}
