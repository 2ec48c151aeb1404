//! Recall Core Library
//!
//! Deterministic record/replay of calls that cross a process boundary:
//! inter-module calls, database queries and outbound HTTP requests.
//!
//! # Overview
//!
//! Every intercepted call is reduced to its deterministic inputs and hashed
//! into a [`Fingerprint`]. Fixture files captured from a real run map
//! fingerprints to call records and call records to outcomes. When both are
//! loaded the recorded outcome is replayed instead of making the real call.
//!
//! # Key Components
//!
//! - **Fingerprint**: canonical-JSON MD5 of a call's deterministic fields
//! - **Store**: per-domain call and outcome maps behind a [`MockRegistry`]
//! - **Fixture**: the `{type, data}` JSON-lines format and its loader
//! - **Intercept**: the [`Automock`] decorator around real executors
//! - **Activity**: recording passthrough calls back into fixture form
//!
//! # Example
//!
//! ```
//! use recall_core::prelude::*;
//! use serde_json::json;
//!
//! let registry = MockRegistry::shared();
//! registry
//!     .load_mock(
//!         &json!({"type": "dbQuery", "data": {"query": "SELECT 1", "dbQueryId": "q1"}}),
//!         &LoadOptions::default(),
//!     )
//!     .unwrap();
//!
//! let mut query = DbQuery::new("SELECT 1");
//! let wrapper = Automock::wrap(executor_fn(|_q: DbQuery| async { Ok(json!([])) }), registry);
//! // No outcome is loaded for q1 yet, so the call would pass through.
//! assert!(!wrapper.resolve(&mut query).unwrap().is_replay());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod activity;
pub mod config;
pub mod domains;
pub mod error;
pub mod fingerprint;
pub mod fixture;
pub mod intercept;
pub mod outcome;
pub mod prelude;
pub mod session;
pub mod store;
pub mod types;

// Re-export key types at crate root for convenience
pub use activity::ActivityLog;
pub use config::RecallConfig;
pub use error::{RecallError, Result};
pub use fingerprint::fingerprint;
pub use fixture::{FixtureEntry, FixtureLoader, LoadOptions, LoadReport};
pub use intercept::{Activation, ActiveMocks, Automock, CallExecutor};
pub use outcome::{CallError, CallFailure, Outcome};
pub use session::Session;
pub use store::MockRegistry;
pub use types::{CallId, Domain, Fingerprint};
