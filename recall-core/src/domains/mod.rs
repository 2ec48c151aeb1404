//! Per-domain configuration of the replay engine.
//!
//! Module calls, database queries and HTTP requests share one implementation
//! of fingerprinting, storage, loading and resolution. What differs between
//! them lives in a static [`DomainSpec`]: fixture type names, the id field
//! joining calls to outcomes, schema adapters, legacy field renames, and the
//! functions converting between outcome fixtures and [`Outcome`] values.

pub mod db_query;
pub mod http_request;
pub mod module_call;

pub use db_query::DbQuery;
pub use http_request::{HttpRequest, HttpResponse};
pub use module_call::ModuleCall;

use crate::error::Result;
use crate::fingerprint::SchemaAdapter;
use crate::fixture::FixtureEntry;
use crate::outcome::{CallFailure, Outcome};
use crate::types::{CallId, Domain};
use serde_json::{Map, Value};

/// Rewrites an older field name to the current one before fingerprinting.
#[derive(Debug, Clone, Copy)]
pub struct FieldRename {
    /// Old field name.
    pub from: &'static str,
    /// Current field name.
    pub to: &'static str,
}

/// Converts an outcome fixture of the given type into an [`Outcome`].
pub type ShapeOutcomeFn = fn(&str, &Map<String, Value>) -> Result<Outcome>;

/// Converts a settled real call into an outcome fixture entry.
pub type RecordOutcomeFn = fn(&CallId, &std::result::Result<Value, CallFailure>) -> FixtureEntry;

/// Static configuration of one interception domain.
#[derive(Debug)]
pub struct DomainSpec {
    /// The domain this configures.
    pub domain: Domain,
    /// Fixture type of call entries.
    pub call_kind: &'static str,
    /// Fixture types of outcome entries.
    pub outcome_kinds: &'static [&'static str],
    /// Field carrying the call id in both call and outcome data.
    pub id_field: &'static str,
    /// Field stamped with the creation time of recorded calls.
    pub create_time_field: &'static str,
    /// Legacy renames applied to call data before fingerprinting.
    pub renames: &'static [FieldRename],
    /// Schema adapters, tried in order.
    pub adapters: &'static [SchemaAdapter],
    /// Key under which success metadata is re-attached to the payload.
    pub metadata_key: Option<&'static str>,
    /// Mark forwarded passthrough calls so the collaborator's own nested
    /// calls are not mocked again.
    pub forward_skip_marker: bool,
    /// Outcome fixture → [`Outcome`].
    pub shape_outcome: ShapeOutcomeFn,
    /// Settled call → outcome fixture.
    pub record_outcome: RecordOutcomeFn,
}

impl DomainSpec {
    /// Rewrite legacy field names in call data.
    pub fn apply_renames(&self, data: &mut Map<String, Value>) {
        for rename in self.renames {
            match data.remove(rename.from) {
                Some(Value::Null) | None => {}
                Some(value) => {
                    data.insert(rename.to.to_string(), value);
                }
            }
        }
    }

    /// Read the call id embedded in call or outcome data.
    pub fn call_id(&self, data: &Map<String, Value>) -> Option<CallId> {
        match data.get(self.id_field)? {
            Value::String(s) if !s.is_empty() => Some(CallId::from(s.as_str())),
            Value::Number(n) => Some(CallId::from(n.to_string())),
            _ => None,
        }
    }

    /// Whether a fixture type names an outcome of this domain.
    pub fn is_outcome_kind(&self, kind: &str) -> bool {
        self.outcome_kinds.contains(&kind)
    }

    /// Turn a stored outcome into the value or failure a caller receives.
    pub fn render(&self, outcome: Outcome) -> std::result::Result<Value, CallFailure> {
        match outcome {
            Outcome::Success {
                mut payload,
                metadata,
            } => {
                if let (Some(key), Some(metadata)) = (self.metadata_key, metadata) {
                    match payload.as_object_mut() {
                        Some(map) => {
                            map.insert(key.to_string(), metadata);
                        }
                        None => tracing::debug!(
                            domain = %self.domain,
                            metadata_key = key,
                            "Dropping metadata of non-object payload"
                        ),
                    }
                }
                Ok(payload)
            }
            Outcome::Failure(failure) => Err(failure),
        }
    }
}

/// Read a field or `null`.
pub(crate) fn field(data: &Map<String, Value>, key: &str) -> Value {
    data.get(key).cloned().unwrap_or(Value::Null)
}

/// Read an optional boolean success flag; absent means failure.
pub(crate) fn success_flag(data: &Map<String, Value>, key: &str) -> Result<bool> {
    match data.get(key) {
        Some(Value::Bool(flag)) => Ok(*flag),
        None | Some(Value::Null) => Ok(false),
        Some(_) => Err(crate::error::RecallError::invalid_mock_data(format!(
            "'{}' must be a boolean",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn renames_legacy_method_name() {
        let mut data = map(json!({"functionName": "foo", "moduleName": "Foo"}));
        Domain::ModuleCall.spec().apply_renames(&mut data);
        assert_eq!(Value::Object(data), json!({"methodName": "foo", "moduleName": "Foo"}));
    }

    #[test]
    fn call_id_accepts_strings_and_numbers() {
        let spec = Domain::DbQuery.spec();
        assert_eq!(
            spec.call_id(&map(json!({"dbQueryId": "abc"}))),
            Some(CallId::from("abc"))
        );
        assert_eq!(
            spec.call_id(&map(json!({"dbQueryId": 12}))),
            Some(CallId::from("12"))
        );
        assert_eq!(spec.call_id(&map(json!({"dbQueryId": ""}))), None);
        assert_eq!(spec.call_id(&map(json!({}))), None);
    }

    #[test]
    fn render_attaches_metadata_to_objects() {
        let spec = Domain::DbQuery.spec();
        let outcome = Outcome::Success {
            payload: json!({"rows": [{"time": 1}]}),
            metadata: Some(json!({"numRows": "1"})),
        };
        assert_eq!(
            spec.render(outcome).unwrap(),
            json!({"rows": [{"time": 1}], "info": {"numRows": "1"}})
        );
    }

    #[test]
    fn render_rejects_failures() {
        let spec = Domain::ModuleCall.spec();
        let err = spec
            .render(Outcome::Failure(CallFailure::new("nope")))
            .unwrap_err();
        assert_eq!(err.message, "nope");
    }
}
