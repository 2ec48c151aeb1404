//! Prelude for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! # Example
//!
//! ```
//! use recall_core::prelude::*;
//! ```

// Core types
pub use crate::types::{CallId, Domain, Fingerprint};

// Error handling
pub use crate::error::{RecallError, Result};
pub use crate::outcome::{CallError, CallFailure, Outcome};

// Calls
pub use crate::domains::{DbQuery, HttpRequest, HttpResponse, ModuleCall};
pub use crate::session::Session;

// Interception
pub use crate::intercept::{
    Activation, ActiveMocks, Automock, CallExecutor, CallFuture, CallResult, InterceptedCall,
    Resolution, executor_fn,
};

// Mock data
pub use crate::activity::ActivityLog;
pub use crate::config::RecallConfig;
pub use crate::fingerprint::fingerprint;
pub use crate::fixture::{FixtureEntry, FixtureLoader, LoadOptions, LoadReport};
pub use crate::store::{MockRegistry, Orphan, RegistryStats};
