//! Recorded outcomes and call-level failures.

use crate::error::RecallError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// The recorded result of one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The call resolved.
    Success {
        /// Response payload.
        payload: Value,
        /// Metadata envelope stored next to the payload (database `info`).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Value>,
    },
    /// The call failed.
    Failure(CallFailure),
}

impl Outcome {
    /// Successful outcome without metadata.
    pub fn success(payload: Value) -> Self {
        Self::Success {
            payload,
            metadata: None,
        }
    }

    /// Check if the outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Error descriptor of a failed call, real or replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct CallFailure {
    /// Human-readable message.
    pub message: String,
    /// Collaborator-specific error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Value>,
    /// Whether the failure is an expected operational error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_operational: Option<bool>,
    /// The raw error payload as recorded, `null` when built locally.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl CallFailure {
    /// Create a failure with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            is_operational: None,
            data: Value::Null,
        }
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Value>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the operational flag.
    pub fn operational(mut self, is_operational: bool) -> Self {
        self.is_operational = Some(is_operational);
        self
    }

    /// Build a failure from a recorded error payload.
    ///
    /// Objects contribute `message`, `code` and `isOperational`; any other
    /// value becomes the message.
    pub fn from_payload(payload: &Value) -> Self {
        let message = match payload {
            Value::Object(map) => map
                .get("message")
                .map(value_to_message)
                .unwrap_or_default(),
            other => value_to_message(other),
        };
        Self {
            message,
            code: payload.get("code").filter(|c| !c.is_null()).cloned(),
            is_operational: payload.get("isOperational").and_then(Value::as_bool),
            data: payload.clone(),
        }
    }

    /// The error payload to persist for this failure.
    pub fn to_payload(&self) -> Value {
        if !self.data.is_null() {
            return self.data.clone();
        }
        let mut map = Map::new();
        map.insert("message".to_string(), json!(self.message));
        if let Some(code) = &self.code {
            map.insert("code".to_string(), code.clone());
        }
        if let Some(is_operational) = self.is_operational {
            map.insert("isOperational".to_string(), json!(is_operational));
        }
        Value::Object(map)
    }
}

fn value_to_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Error returned by an intercepted call.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// The call failed, either for real or as a replayed recorded failure.
    #[error(transparent)]
    Failed(#[from] CallFailure),
    /// The interception layer itself refused the call.
    #[error(transparent)]
    Recall(#[from] RecallError),
}

impl CallError {
    /// The call failure, if this is one.
    pub fn as_failure(&self) -> Option<&CallFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            Self::Recall(_) => None,
        }
    }

    /// The interception error, if this is one.
    pub fn as_recall(&self) -> Option<&RecallError> {
        match self {
            Self::Recall(err) => Some(err),
            Self::Failed(_) => None,
        }
    }
}
