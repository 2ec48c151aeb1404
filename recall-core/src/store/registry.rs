//! The registry owning every store.

use super::{CallRecord, CallStore, OutcomeStore};
use crate::error::Result;
use crate::fixture::{FixtureLoader, LoadOptions, LoadReport};
use crate::outcome::Outcome;
use crate::types::{CallId, Domain, Fingerprint};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Call and outcome stores of one domain.
#[derive(Debug, Default)]
pub struct DomainStore {
    /// Fingerprint → call record.
    pub calls: CallStore,
    /// Call id → outcome.
    pub outcomes: OutcomeStore,
}

/// In-memory mock data for all domains.
///
/// Shared by `Arc` between fixture loaders and interception wrappers. Every
/// store sits behind its own lock, so lookups from many tasks proceed in
/// parallel with loading.
///
/// # Example
///
/// ```
/// use recall_core::store::MockRegistry;
/// use recall_core::fixture::LoadOptions;
/// use recall_core::types::Domain;
/// use serde_json::json;
///
/// let registry = MockRegistry::shared();
/// registry
///     .load_mock(
///         &json!([
///             {"type": "dbQuery", "data": {"query": "SELECT 1", "dbQueryId": "q1"}},
///             {"type": "dbResponse", "data": {"dbQueryId": "q1", "dbResponseSuccess": true, "data": [1]}},
///         ]),
///         &LoadOptions::default(),
///     )
///     .unwrap();
///
/// let stats = registry.stats();
/// assert_eq!(stats.domain(Domain::DbQuery).calls, 1);
/// assert!(registry.orphans().is_empty());
/// ```
#[derive(Debug)]
pub struct MockRegistry {
    stores: [DomainStore; 3],
}

impl MockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            stores: std::array::from_fn(|_| DomainStore::default()),
        }
    }

    /// Create an empty registry behind an `Arc`.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Stores of one domain.
    pub fn store(&self, domain: Domain) -> &DomainStore {
        &self.stores[domain.index()]
    }

    /// Store a call record.
    pub fn insert_call(&self, domain: Domain, record: CallRecord) {
        if let Some(previous) = self.store(domain).calls.insert(record) {
            tracing::trace!(
                domain = %domain,
                fingerprint = %previous.fingerprint,
                call_id = %previous.call_id,
                "Replaced call record"
            );
        }
    }

    /// Store an outcome.
    pub fn insert_outcome(&self, domain: Domain, call_id: CallId, outcome: Outcome) {
        if self
            .store(domain)
            .outcomes
            .insert(call_id.clone(), outcome)
            .is_some()
        {
            tracing::trace!(domain = %domain, call_id = %call_id, "Replaced outcome");
        }
    }

    /// Resolve a fingerprint through its call record to a copy of the outcome.
    ///
    /// Returns `None` unless both the call record and its outcome are loaded.
    pub fn lookup(&self, domain: Domain, fingerprint: &Fingerprint) -> Option<(CallId, Outcome)> {
        let store = self.store(domain);
        let call_id = store.calls.call_id(fingerprint)?;
        let outcome = store.outcomes.get(&call_id)?;
        Some((call_id, outcome))
    }

    /// Remove every call record and outcome of every domain.
    pub fn reset(&self) {
        for store in &self.stores {
            store.calls.clear();
            store.outcomes.clear();
        }
        tracing::debug!("Mock registry reset");
    }

    /// Per-domain record counts.
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            domains: Domain::ALL
                .into_iter()
                .map(|domain| {
                    let store = self.store(domain);
                    DomainStats {
                        domain,
                        calls: store.calls.len(),
                        outcomes: store.outcomes.len(),
                    }
                })
                .collect(),
        }
    }

    /// Call records without an outcome and outcomes without a call record.
    pub fn orphans(&self) -> Vec<Orphan> {
        let mut orphans = Vec::new();
        for domain in Domain::ALL {
            let store = self.store(domain);
            let records = store.calls.records();
            let referenced: HashSet<&CallId> = records.iter().map(|r| &r.call_id).collect();

            let mut missing_outcomes: Vec<Orphan> = records
                .iter()
                .filter(|record| !store.outcomes.contains(&record.call_id))
                .map(|record| Orphan::MissingOutcome {
                    domain,
                    fingerprint: record.fingerprint,
                    call_id: record.call_id.clone(),
                })
                .collect();
            missing_outcomes.sort_by(|a, b| a.call_id().cmp(b.call_id()));
            orphans.extend(missing_outcomes);

            let mut missing_calls: Vec<CallId> = store
                .outcomes
                .call_ids()
                .into_iter()
                .filter(|id| !referenced.contains(id))
                .collect();
            missing_calls.sort();
            orphans.extend(
                missing_calls
                    .into_iter()
                    .map(|call_id| Orphan::MissingCall { domain, call_id }),
            );
        }
        orphans
    }

    /// Create a fixture loader writing into this registry.
    pub fn loader(&self, options: LoadOptions) -> FixtureLoader<'_> {
        FixtureLoader::new(self, options)
    }

    /// Load one fixture entry or an array of entries.
    pub fn load_mock(&self, data: &Value, options: &LoadOptions) -> Result<LoadReport> {
        self.loader(options.clone()).load(data)
    }

    /// Load a JSON-lines fixture file.
    pub fn load_mock_from_file(
        &self,
        path: impl AsRef<Path>,
        options: &LoadOptions,
    ) -> Result<LoadReport> {
        self.loader(options.clone()).load_from_file(path)
    }
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Record counts of one domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DomainStats {
    /// The domain.
    pub domain: Domain,
    /// Number of call records.
    pub calls: usize,
    /// Number of outcomes.
    pub outcomes: usize,
}

/// Record counts of all domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// One entry per domain, in [`Domain::ALL`] order.
    pub domains: Vec<DomainStats>,
}

impl RegistryStats {
    /// Counts of one domain.
    pub fn domain(&self, domain: Domain) -> DomainStats {
        self.domains
            .iter()
            .copied()
            .find(|stats| stats.domain == domain)
            .unwrap_or(DomainStats {
                domain,
                calls: 0,
                outcomes: 0,
            })
    }

    /// Total call records.
    pub fn total_calls(&self) -> usize {
        self.domains.iter().map(|d| d.calls).sum()
    }

    /// Total outcomes.
    pub fn total_outcomes(&self) -> usize {
        self.domains.iter().map(|d| d.outcomes).sum()
    }

    /// Check if nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.total_calls() == 0 && self.total_outcomes() == 0
    }
}

/// A record that can never take part in a replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Orphan {
    /// A call record whose outcome was never loaded.
    MissingOutcome {
        /// Domain of the record.
        domain: Domain,
        /// Fingerprint the record is stored under.
        fingerprint: Fingerprint,
        /// Id no outcome is stored for.
        call_id: CallId,
    },
    /// An outcome no call record points to.
    MissingCall {
        /// Domain of the outcome.
        domain: Domain,
        /// Id of the outcome.
        call_id: CallId,
    },
}

impl Orphan {
    /// Domain of the orphaned record.
    pub fn domain(&self) -> Domain {
        match self {
            Self::MissingOutcome { domain, .. } | Self::MissingCall { domain, .. } => *domain,
        }
    }

    /// Call id of the orphaned record.
    pub fn call_id(&self) -> &CallId {
        match self {
            Self::MissingOutcome { call_id, .. } | Self::MissingCall { call_id, .. } => call_id,
        }
    }
}

impl std::fmt::Display for Orphan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingOutcome {
                domain,
                fingerprint,
                call_id,
            } => write!(
                f,
                "{} call {} ({}) has no outcome",
                domain, call_id, fingerprint
            ),
            Self::MissingCall { domain, call_id } => {
                write!(f, "{} outcome {} has no call", domain, call_id)
            }
        }
    }
}
