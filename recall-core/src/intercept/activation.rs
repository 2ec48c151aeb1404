//! Wrapping every available collaborator at once.

use super::{Automock, CallExecutor, InterceptedCall};
use crate::activity::ActivityLog;
use crate::domains::{DbQuery, HttpRequest, ModuleCall};
use crate::error::{RecallError, Result};
use crate::store::MockRegistry;
use crate::types::Domain;
use std::sync::Arc;

/// Builder wrapping whichever collaborators a host has.
///
/// # Example
///
/// ```
/// use recall_core::prelude::*;
/// use serde_json::json;
///
/// let db = executor_fn(|_q: DbQuery| async { Ok(json!([])) });
/// let active = Activation::new(MockRegistry::shared())
///     .db_queries(db)
///     .activate()
///     .unwrap();
/// assert_eq!(active.wrapped_domains(), vec![Domain::DbQuery]);
///
/// let err = Activation::new(MockRegistry::shared()).activate().unwrap_err();
/// assert_eq!(err.code(), "E401");
/// ```
pub struct Activation {
    registry: Arc<MockRegistry>,
    module_calls: Option<Arc<dyn CallExecutor<ModuleCall>>>,
    db_queries: Option<Arc<dyn CallExecutor<DbQuery>>>,
    http_requests: Option<Arc<dyn CallExecutor<HttpRequest>>>,
    recorder: Option<Arc<ActivityLog>>,
    require_mocks: bool,
}

impl Activation {
    /// Start an activation against a registry.
    pub fn new(registry: Arc<MockRegistry>) -> Self {
        Self {
            registry,
            module_calls: None,
            db_queries: None,
            http_requests: None,
            recorder: None,
            require_mocks: false,
        }
    }

    /// Wrap the module call dispatcher.
    pub fn module_calls(mut self, executor: Arc<dyn CallExecutor<ModuleCall>>) -> Self {
        self.module_calls = Some(executor);
        self
    }

    /// Wrap the database client.
    pub fn db_queries(mut self, executor: Arc<dyn CallExecutor<DbQuery>>) -> Self {
        self.db_queries = Some(executor);
        self
    }

    /// Wrap the HTTP client.
    pub fn http_requests(mut self, executor: Arc<dyn CallExecutor<HttpRequest>>) -> Self {
        self.http_requests = Some(executor);
        self
    }

    /// Record passthrough calls of every wrapper.
    pub fn with_recorder(mut self, recorder: Arc<ActivityLog>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Make every wrapper strict.
    pub fn require_mocks(mut self, require: bool) -> Self {
        self.require_mocks = require;
        self
    }

    /// Wrap every collaborator given.
    ///
    /// # Errors
    /// `NoMockableLibraries` when no collaborator was given.
    pub fn activate(self) -> Result<ActiveMocks> {
        let active = ActiveMocks {
            module_calls: self.module_calls.clone().map(|inner| self.wrapper(inner)),
            db_queries: self.db_queries.clone().map(|inner| self.wrapper(inner)),
            http_requests: self.http_requests.clone().map(|inner| self.wrapper(inner)),
            registry: Arc::clone(&self.registry),
        };
        let domains = active.wrapped_domains();
        if domains.is_empty() {
            return Err(RecallError::NoMockableLibraries);
        }
        tracing::info!(
            domains = ?domains,
            strict = self.require_mocks,
            recording = self.recorder.is_some(),
            "Automock activated"
        );
        Ok(active)
    }

    fn wrapper<C: InterceptedCall>(&self, inner: Arc<dyn CallExecutor<C>>) -> Automock<C> {
        let wrapper =
            Automock::wrap(inner, Arc::clone(&self.registry)).require_mocks(self.require_mocks);
        match &self.recorder {
            Some(recorder) => wrapper.with_recorder(Arc::clone(recorder)),
            None => wrapper,
        }
    }
}

/// The wrappers produced by an [`Activation`].
#[derive(Debug, Clone)]
pub struct ActiveMocks {
    /// Wrapped module call dispatcher.
    pub module_calls: Option<Automock<ModuleCall>>,
    /// Wrapped database client.
    pub db_queries: Option<Automock<DbQuery>>,
    /// Wrapped HTTP client.
    pub http_requests: Option<Automock<HttpRequest>>,
    registry: Arc<MockRegistry>,
}

impl ActiveMocks {
    /// Domains that have a wrapper.
    pub fn wrapped_domains(&self) -> Vec<Domain> {
        [
            (Domain::ModuleCall, self.module_calls.is_some()),
            (Domain::DbQuery, self.db_queries.is_some()),
            (Domain::HttpRequest, self.http_requests.is_some()),
        ]
        .into_iter()
        .filter_map(|(domain, wrapped)| wrapped.then_some(domain))
        .collect()
    }

    /// The registry shared by all wrappers.
    pub fn registry(&self) -> &Arc<MockRegistry> {
        &self.registry
    }

    /// Clear all loaded mock data; the wrappers stay in place.
    pub fn reset(&self) {
        self.registry.reset();
    }
}
