//! Interception of calls to real collaborators.
//!
//! A collaborator (module dispatcher, database client or HTTP client) is an
//! [`CallExecutor`] for its call type. [`Automock`] decorates one: each call
//! is resolved against a [`MockRegistry`] and either answered from a recorded
//! outcome, rejected in strict mode, or forwarded to the wrapped executor.
//!
//! # Example
//!
//! ```
//! use recall_core::prelude::*;
//! use serde_json::json;
//!
//! # tokio_test_block(async {
//! let registry = MockRegistry::shared();
//! registry
//!     .load_mock(
//!         &json!([
//!             {"type": "moduleCall", "data": {"moduleName": "Foo", "methodName": "bar", "moduleCallId": "m1"}},
//!             {"type": "moduleCallResolve", "data": {"moduleCallId": "m1", "resolved": true, "moduleCallResolveData": 42}},
//!         ]),
//!         &LoadOptions::default(),
//!     )
//!     .unwrap();
//!
//! let real = executor_fn(|_call: ModuleCall| async { Ok(json!("real")) });
//! let mocked = Automock::wrap(real, registry);
//! assert_eq!(mocked.execute(ModuleCall::new("Foo", "bar")).await.unwrap(), json!(42));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod activation;
mod resolve;

pub use activation::{Activation, ActiveMocks};
pub use resolve::{Resolution, resolve};

use crate::activity::ActivityLog;
use crate::error::Result;
use crate::outcome::CallError;
use crate::session::Session;
use crate::store::MockRegistry;
use crate::types::Domain;
use serde_json::Value;
use std::future::{Future, ready};
use std::pin::Pin;
use std::sync::Arc;

/// A call of one interception domain.
pub trait InterceptedCall: Send + 'static {
    /// The domain the call belongs to.
    const DOMAIN: Domain;

    /// The call's session.
    fn session(&self) -> &Session;

    /// Mutable access to the call's session.
    fn session_mut(&mut self) -> &mut Session;

    /// The call in the shape its fixture entries are logged in.
    fn call_data(&self) -> Value;

    /// Short human-readable description, such as `query: SELECT 1`.
    fn target(&self) -> String;
}

/// Result of an intercepted call.
pub type CallResult = std::result::Result<Value, CallError>;

/// Future returned by call executors.
pub type CallFuture<'a> = Pin<Box<dyn Future<Output = CallResult> + Send + 'a>>;

/// Something that performs calls of type `C`.
pub trait CallExecutor<C>: Send + Sync {
    /// Perform the call.
    fn execute(&self, call: C) -> CallFuture<'_>;
}

/// Executor backed by an async closure.
pub struct FnExecutor<F> {
    f: F,
}

impl<C, F, Fut> CallExecutor<C> for FnExecutor<F>
where
    C: Send + 'static,
    F: Fn(C) -> Fut + Send + Sync,
    Fut: Future<Output = CallResult> + Send + 'static,
{
    fn execute(&self, call: C) -> CallFuture<'_> {
        Box::pin((self.f)(call))
    }
}

/// Wrap an async closure as a shared executor.
pub fn executor_fn<C, F, Fut>(f: F) -> Arc<dyn CallExecutor<C>>
where
    C: Send + 'static,
    F: Fn(C) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CallResult> + Send + 'static,
{
    Arc::new(FnExecutor { f })
}

/// Mocking decorator around a real executor.
pub struct Automock<C> {
    inner: Arc<dyn CallExecutor<C>>,
    registry: Arc<MockRegistry>,
    recorder: Option<Arc<ActivityLog>>,
    require_mocks: bool,
}

impl<C: InterceptedCall> Automock<C> {
    /// Wrap an executor, resolving against `registry`.
    pub fn wrap(inner: Arc<dyn CallExecutor<C>>, registry: Arc<MockRegistry>) -> Self {
        tracing::trace!(domain = %C::DOMAIN, "Wrapping executor");
        Self {
            inner,
            registry,
            recorder: None,
            require_mocks: false,
        }
    }

    /// Record passthrough calls into an activity log.
    pub fn with_recorder(mut self, recorder: Arc<ActivityLog>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Fail calls without a recorded outcome, whatever their session says.
    pub fn require_mocks(mut self, require: bool) -> Self {
        self.require_mocks = require;
        self
    }

    /// The registry calls are resolved against.
    pub fn registry(&self) -> &Arc<MockRegistry> {
        &self.registry
    }

    /// The wrapped executor.
    pub fn inner(&self) -> &Arc<dyn CallExecutor<C>> {
        &self.inner
    }

    /// Decide how a call would be served, without performing it.
    pub fn resolve(&self, call: &mut C) -> Result<Resolution> {
        resolve(&self.registry, call, self.require_mocks)
    }

    fn passthrough(&self, mut call: C, record: bool) -> CallFuture<'_> {
        let recording = self
            .recorder
            .as_ref()
            .filter(|log| record && log.is_enabled())
            .map(|log| (Arc::clone(log), call.call_data()));
        if C::DOMAIN.spec().forward_skip_marker {
            call.session_mut().automock = Some(false);
        }

        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let result = inner.execute(call).await;
            if let Some((log, call_data)) = recording {
                match &result {
                    Ok(value) => {
                        log.record_call(C::DOMAIN, call_data, &Ok(value.clone()));
                    }
                    Err(CallError::Failed(failure)) => {
                        log.record_call(C::DOMAIN, call_data, &Err(failure.clone()));
                    }
                    Err(CallError::Recall(_)) => {}
                }
            }
            result
        })
    }
}

impl<C: InterceptedCall> CallExecutor<C> for Automock<C> {
    fn execute(&self, mut call: C) -> CallFuture<'_> {
        match self.resolve(&mut call) {
            Ok(Resolution::Replay { result, .. }) => {
                Box::pin(ready(result.map_err(CallError::from)))
            }
            Ok(Resolution::Passthrough { fingerprint }) => {
                self.passthrough(call, fingerprint.is_some())
            }
            Err(err) => Box::pin(ready(Err(CallError::from(err)))),
        }
    }
}

impl<C> Clone for Automock<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            registry: Arc::clone(&self.registry),
            recorder: self.recorder.clone(),
            require_mocks: self.require_mocks,
        }
    }
}

impl<C> std::fmt::Debug for Automock<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Automock")
            .field("recording", &self.recorder.is_some())
            .field("require_mocks", &self.require_mocks)
            .finish_non_exhaustive()
    }
}
