//! Schema adapters that project raw call data onto its deterministic subset.
//!
//! A domain lists its adapters in the order they are tried; the first whose
//! `matches` predicate accepts the data projects it. Each adapter produces the
//! canonical record shape that gets hashed.

use crate::error::{RecallError, Result};
use serde_json::{Map, Value};

/// One accepted shape of a domain's call data.
#[derive(Debug, Clone, Copy)]
pub struct SchemaAdapter {
    /// Adapter name, used in logs.
    pub name: &'static str,
    /// Whether this adapter handles the given data.
    pub matches: fn(&Map<String, Value>) -> bool,
    /// Project the data onto its canonical deterministic record.
    pub project: fn(&Map<String, Value>) -> Result<Value>,
}

/// Accepts any data; used as the last adapter of a domain.
pub fn always(_: &Map<String, Value>) -> bool {
    true
}

/// Old fixtures keyed on the enclosing `moduleCallId` instead of the call
/// signature and stack.
///
/// Such records differing only in `moduleCallId` get different fingerprints.
pub fn is_legacy_module_call_keyed(data: &Map<String, Value>) -> bool {
    present(data, "moduleCallId")
        && !present(data, "moduleCallSignature")
        && !present(data, "stack")
}

/// Whether a field is set to something other than `null`.
pub fn present(data: &Map<String, Value>, field: &str) -> bool {
    data.get(field).is_some_and(|v| !v.is_null())
}

/// Interpret a whole call descriptor as an object; `null` means empty.
pub fn as_object(data: &Value, field: &str) -> Result<Map<String, Value>> {
    match data {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map.clone()),
        _ => Err(RecallError::invalid_input(field, "object")),
    }
}

/// Read an optional object field, defaulting to `{}`.
pub fn object_field(data: &Map<String, Value>, field: &str) -> Result<Map<String, Value>> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(_) => Err(RecallError::invalid_input(field, "object")),
    }
}

/// Read an optional array field, defaulting to `[]`.
pub fn array_field(data: &Map<String, Value>, field: &str) -> Result<Vec<Value>> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(_) => Err(RecallError::invalid_input(field, "array")),
    }
}

/// Read query parameters, which may be named (object) or positional (array).
pub fn params_field(data: &Map<String, Value>, field: &str) -> Result<Value> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(Value::Object(Map::new())),
        Some(v @ (Value::Object(_) | Value::Array(_))) => Ok(v.clone()),
        Some(_) => Err(RecallError::invalid_input(field, "object or array")),
    }
}

/// Copy the listed fields that are present and not `null`.
pub fn pick(data: &Map<String, Value>, fields: &[&str]) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|&field| match data.get(field) {
            Some(Value::Null) | None => None,
            Some(v) => Some((field.to_string(), v.clone())),
        })
        .collect()
}

/// Select the first adapter that accepts the data.
pub fn select<'a>(
    adapters: &'a [SchemaAdapter],
    data: &Map<String, Value>,
) -> Option<&'a SchemaAdapter> {
    adapters.iter().find(|adapter| (adapter.matches)(data))
}
