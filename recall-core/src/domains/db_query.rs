//! Database queries.

use super::{DomainSpec, field, success_flag};
use crate::error::Result;
use crate::fingerprint::schema::{self, SchemaAdapter};
use crate::fixture::FixtureEntry;
use crate::intercept::InterceptedCall;
use crate::outcome::{CallFailure, Outcome};
use crate::session::Session;
use crate::types::{CallId, Domain};
use serde_json::{Map, Value, json};

/// Configuration of the database query domain.
pub static SPEC: DomainSpec = DomainSpec {
    domain: Domain::DbQuery,
    call_kind: "dbQuery",
    outcome_kinds: &["dbResponse"],
    id_field: "dbQueryId",
    create_time_field: "dbQueryCreateTime",
    renames: &[],
    adapters: &[
        SchemaAdapter {
            name: "db_query_legacy",
            matches: schema::is_legacy_module_call_keyed,
            project: project_legacy,
        },
        SchemaAdapter {
            name: "db_query",
            matches: schema::always,
            project,
        },
    ],
    metadata_key: Some("info"),
    forward_skip_marker: false,
    shape_outcome,
    record_outcome,
};

fn project(data: &Map<String, Value>) -> Result<Value> {
    let mut record = schema::pick(data, &["query", "requestId", "moduleCallSignature"]);
    insert_statement(&mut record, data)?;
    record.insert(
        "stack".to_string(),
        Value::Array(schema::array_field(data, "stack")?),
    );
    Ok(Value::Object(record))
}

fn project_legacy(data: &Map<String, Value>) -> Result<Value> {
    let mut record = schema::pick(data, &["query", "requestId", "moduleCallId"]);
    insert_statement(&mut record, data)?;
    Ok(Value::Object(record))
}

fn insert_statement(record: &mut Map<String, Value>, data: &Map<String, Value>) -> Result<()> {
    record.insert("params".to_string(), schema::params_field(data, "params")?);
    record.insert(
        "options".to_string(),
        Value::Object(schema::object_field(data, "options")?),
    );
    Ok(())
}

fn shape_outcome(_kind: &str, data: &Map<String, Value>) -> Result<Outcome> {
    let payload = field(data, "data");
    if success_flag(data, "dbResponseSuccess")? {
        Ok(Outcome::Success {
            payload,
            metadata: data.get("info").filter(|info| !info.is_null()).cloned(),
        })
    } else {
        Ok(Outcome::Failure(CallFailure::from_payload(&payload)))
    }
}

fn record_outcome(
    call_id: &CallId,
    result: &std::result::Result<Value, CallFailure>,
) -> FixtureEntry {
    let mut data = Map::new();
    data.insert("dbQueryId".to_string(), json!(call_id));
    match result {
        Ok(value) => {
            let mut payload = value.clone();
            let info = payload.as_object_mut().and_then(|map| map.remove("info"));
            data.insert("dbResponseSuccess".to_string(), json!(true));
            data.insert("data".to_string(), payload);
            if let Some(info) = info {
                data.insert("info".to_string(), info);
            }
        }
        Err(failure) => {
            data.insert("dbResponseSuccess".to_string(), json!(false));
            data.insert("data".to_string(), failure.to_payload());
        }
    }
    FixtureEntry::new("dbResponse", Value::Object(data))
}

/// A database query with bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DbQuery {
    /// Query text.
    pub query: String,
    /// Bound parameters, named (object) or positional (array).
    pub params: Value,
    /// Query options.
    pub options: Map<String, Value>,
    /// Call context.
    pub session: Session,
}

impl DbQuery {
    /// Create a query without parameters.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: Value::Object(Map::new()),
            options: Map::new(),
            session: Session::default(),
        }
    }

    /// Set the bound parameters.
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    /// Set a query option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Set the session.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }
}

impl InterceptedCall for DbQuery {
    const DOMAIN: Domain = Domain::DbQuery;

    fn session(&self) -> &Session {
        &self.session
    }

    fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    fn call_data(&self) -> Value {
        let mut data = Map::new();
        data.insert("query".to_string(), json!(self.query));
        data.insert("params".to_string(), self.params.clone());
        data.insert("options".to_string(), Value::Object(self.options.clone()));
        insert_session_context(&mut data, &self.session);
        Value::Object(data)
    }

    fn target(&self) -> String {
        format!("query: {}", self.query)
    }
}

/// Copy the session fields that query-like domains key on.
pub(crate) fn insert_session_context(data: &mut Map<String, Value>, session: &Session) {
    if let Some(request_id) = &session.request_id {
        data.insert("requestId".to_string(), json!(request_id));
    }
    if let Some(signature) = &session.module_call_signature {
        data.insert("moduleCallSignature".to_string(), json!(signature));
    }
    if let Some(stack) = &session.stack {
        data.insert("stack".to_string(), Value::Array(stack.clone()));
    }
    if let Some(module_call_id) = &session.module_call_id {
        data.insert("moduleCallId".to_string(), json!(module_call_id));
    }
}
