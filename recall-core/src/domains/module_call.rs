//! Inter-module method calls.

use super::{DomainSpec, FieldRename, field, success_flag};
use crate::error::{RecallError, Result};
use crate::fingerprint::schema::{self, SchemaAdapter};
use crate::fixture::FixtureEntry;
use crate::intercept::InterceptedCall;
use crate::outcome::{CallFailure, Outcome};
use crate::session::Session;
use crate::types::{CallId, Domain};
use serde_json::{Map, Value, json};

/// Configuration of the module call domain.
pub static SPEC: DomainSpec = DomainSpec {
    domain: Domain::ModuleCall,
    call_kind: "moduleCall",
    outcome_kinds: &["moduleCallResolve"],
    id_field: "moduleCallId",
    create_time_field: "moduleCallCreateTime",
    renames: &[FieldRename {
        from: "functionName",
        to: "methodName",
    }],
    adapters: &[SchemaAdapter {
        name: "module_call",
        matches: schema::always,
        project,
    }],
    metadata_key: None,
    forward_skip_marker: false,
    shape_outcome,
    record_outcome,
};

/// Deterministic subset: method and module names, every argument except the
/// session, and the session's request id, session id and stack.
fn project(data: &Map<String, Value>) -> Result<Value> {
    let mut args = schema::object_field(data, "args")?;
    let session = schema::object_field(&args, "session")
        .map_err(|_| RecallError::invalid_input("args.session", "object"))?;
    let stack = schema::array_field(&session, "stack")
        .map_err(|_| RecallError::invalid_input("args.session.stack", "array"))?;

    let mut stable_session = schema::pick(&session, &["requestId", "sessionId"]);
    stable_session.insert("stack".to_string(), Value::Array(stack));
    args.insert("session".to_string(), Value::Object(stable_session));

    let mut record = schema::pick(data, &["methodName", "moduleName"]);
    record.insert("args".to_string(), Value::Object(args));
    Ok(Value::Object(record))
}

fn shape_outcome(_kind: &str, data: &Map<String, Value>) -> Result<Outcome> {
    let payload = field(data, "moduleCallResolveData");
    if success_flag(data, "resolved")? {
        Ok(Outcome::success(payload))
    } else {
        Ok(Outcome::Failure(CallFailure::from_payload(&payload)))
    }
}

fn record_outcome(
    call_id: &CallId,
    result: &std::result::Result<Value, CallFailure>,
) -> FixtureEntry {
    let (resolved, payload) = match result {
        Ok(value) => (true, value.clone()),
        Err(failure) => (false, failure.to_payload()),
    };
    FixtureEntry::new(
        "moduleCallResolve",
        json!({
            "moduleCallId": call_id,
            "resolved": resolved,
            "moduleCallResolveData": payload,
        }),
    )
}

/// A call to `Module.method(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleCall {
    /// Name of the module owning the method.
    pub module_name: String,
    /// Name of the method.
    pub method_name: String,
    /// Call arguments, excluding the session.
    pub args: Map<String, Value>,
    /// Call context.
    pub session: Session,
}

impl ModuleCall {
    /// Create a call with no arguments.
    pub fn new(module_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            method_name: method_name.into(),
            args: Map::new(),
            session: Session::default(),
        }
    }

    /// Add an argument.
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Set the session.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// `Module.method` signature.
    pub fn signature(&self) -> String {
        format!("{}.{}", self.module_name, self.method_name)
    }
}

impl InterceptedCall for ModuleCall {
    const DOMAIN: Domain = Domain::ModuleCall;

    fn session(&self) -> &Session {
        &self.session
    }

    fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    fn call_data(&self) -> Value {
        let mut args = self.args.clone();
        args.insert("session".to_string(), self.session.to_value());
        json!({
            "moduleName": self.module_name,
            "methodName": self.method_name,
            "args": args,
        })
    }

    fn target(&self) -> String {
        format!("method: {}", self.signature())
    }
}
