//! Caller-supplied call context.
//!
//! A session travels with every intercepted call. A few of its fields are
//! deterministic and feed the fingerprint (`requestId`, `sessionId`, `stack`,
//! `moduleCallSignature`); the rest are flags that steer resolution.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Call context attached to an intercepted call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Identifier of the request that caused the call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Identifier of the user session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Identifier of the enclosing module call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_call_id: Option<String>,
    /// `Module.method` signature of the enclosing module call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_call_signature: Option<String>,
    /// Snapshot of the module call stack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<Value>>,
    /// Fail instead of passing through when no mock matches.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub require_automock: bool,
    /// `Some(false)` exempts the next call from mocking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automock: Option<bool>,
    /// Any other context the host attaches.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request ID.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Set the session ID.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Set the enclosing module call ID.
    pub fn with_module_call_id(mut self, module_call_id: impl Into<String>) -> Self {
        self.module_call_id = Some(module_call_id.into());
        self
    }

    /// Set the enclosing module call signature.
    pub fn with_module_call_signature(mut self, signature: impl Into<String>) -> Self {
        self.module_call_signature = Some(signature.into());
        self
    }

    /// Set the call stack snapshot.
    pub fn with_stack<I, S>(mut self, stack: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Value>,
    {
        self.stack = Some(stack.into_iter().map(Into::into).collect());
        self
    }

    /// Require a recorded outcome for every call made with this session.
    pub fn require_automock(mut self) -> Self {
        self.require_automock = true;
        self
    }

    /// Exempt the next intercepted call from mocking.
    pub fn skip_next_mock(mut self) -> Self {
        self.automock = Some(false);
        self
    }

    /// Attach an extra context value.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Consume the one-shot skip marker.
    ///
    /// Returns `true` if the marker was set; it is cleared either way so later
    /// calls sharing this session are mocked again.
    pub fn take_skip_marker(&mut self) -> bool {
        if self.automock == Some(false) {
            self.automock = None;
            true
        } else {
            false
        }
    }

    /// Serialize into a JSON object.
    pub fn to_value(&self) -> Value {
        // Plain strings and JSON values only; serialization cannot fail.
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn skip_marker_is_consumed_once() {
        let mut session = Session::new().skip_next_mock();
        assert!(session.take_skip_marker());
        assert!(!session.take_skip_marker());
        assert_eq!(session.automock, None);
    }

    #[test]
    fn automock_true_is_not_a_skip_marker() {
        let mut session = Session {
            automock: Some(true),
            ..Session::default()
        };
        assert!(!session.take_skip_marker());
        assert_eq!(session.automock, Some(true));
    }

    #[test]
    fn serializes_camel_case_and_skips_empty() {
        let session = Session::new()
            .with_request_id("req-1")
            .with_module_call_signature("Foo.bar")
            .with_stack(["Foo.bar"])
            .with_extra("connectionId", 7);
        let value = session.to_value();
        assert_eq!(
            value,
            json!({
                "requestId": "req-1",
                "moduleCallSignature": "Foo.bar",
                "stack": ["Foo.bar"],
                "connectionId": 7,
            })
        );
    }

    #[test]
    fn deserializes_flags() {
        let session: Session =
            serde_json::from_value(json!({"requireAutomock": true, "automock": false})).unwrap();
        assert!(session.require_automock);
        assert_eq!(session.automock, Some(false));
        assert!(session.extra.is_empty());
    }
}
