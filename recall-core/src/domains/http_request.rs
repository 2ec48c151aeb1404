//! Outbound HTTP requests.

use super::db_query::insert_session_context;
use super::{DomainSpec, field};
use crate::error::{RecallError, Result};
use crate::fingerprint::schema::{self, SchemaAdapter};
use crate::fixture::FixtureEntry;
use crate::intercept::InterceptedCall;
use crate::outcome::{CallFailure, Outcome};
use crate::session::Session;
use crate::types::{CallId, Domain};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

const RESPONSE: &str = "httpResponse";
const REQUEST_ERROR: &str = "httpRequestError";

/// Configuration of the HTTP request domain.
pub static SPEC: DomainSpec = DomainSpec {
    domain: Domain::HttpRequest,
    call_kind: "httpRequest",
    outcome_kinds: &[RESPONSE, REQUEST_ERROR],
    id_field: "httpRequestId",
    create_time_field: "httpRequestCreateTime",
    renames: &[],
    adapters: &[
        SchemaAdapter {
            name: "http_request_legacy",
            matches: schema::is_legacy_module_call_keyed,
            project: project_legacy,
        },
        SchemaAdapter {
            name: "http_request",
            matches: schema::always,
            project,
        },
    ],
    metadata_key: None,
    forward_skip_marker: true,
    shape_outcome,
    record_outcome,
};

fn project(data: &Map<String, Value>) -> Result<Value> {
    let mut record = schema::pick(data, &["requestId", "moduleCallSignature"]);
    record.insert(
        "options".to_string(),
        Value::Object(schema::object_field(data, "options")?),
    );
    record.insert(
        "stack".to_string(),
        Value::Array(schema::array_field(data, "stack")?),
    );
    Ok(Value::Object(record))
}

fn project_legacy(data: &Map<String, Value>) -> Result<Value> {
    let mut record = schema::pick(data, &["requestId", "moduleCallId"]);
    record.insert(
        "options".to_string(),
        Value::Object(schema::object_field(data, "options")?),
    );
    Ok(Value::Object(record))
}

fn shape_outcome(kind: &str, data: &Map<String, Value>) -> Result<Outcome> {
    match kind {
        RESPONSE => {
            let status_code = match data.get("httpResponseStatusCode") {
                None | Some(Value::Null) => 0,
                Some(Value::Number(n)) => n
                    .as_u64()
                    .and_then(|n| u16::try_from(n).ok())
                    .ok_or_else(|| {
                        RecallError::invalid_mock_data("'httpResponseStatusCode' out of range")
                    })?,
                Some(_) => {
                    return Err(RecallError::invalid_mock_data(
                        "'httpResponseStatusCode' must be a number",
                    ));
                }
            };
            let response = HttpResponse {
                status_code,
                raw_headers: field(data, "httpResponseHeader"),
                body: field(data, "httpResponseBody"),
            };
            Ok(Outcome::success(response.to_value()))
        }
        _ => Ok(Outcome::Failure(CallFailure::from_payload(&field(
            data,
            "httpRequestError",
        )))),
    }
}

// Responses and request errors share one outcome store, so a fixture holding
// both for one request id replays whichever was loaded last.
fn record_outcome(
    call_id: &CallId,
    result: &std::result::Result<Value, CallFailure>,
) -> FixtureEntry {
    match result {
        Ok(value) => {
            let response = HttpResponse::from_value(value);
            FixtureEntry::new(
                RESPONSE,
                json!({
                    "httpRequestId": call_id,
                    "httpResponseBody": response.body,
                    "httpResponseHeader": response.raw_headers,
                    "httpResponseStatusCode": response.status_code,
                }),
            )
        }
        Err(failure) => FixtureEntry::new(
            REQUEST_ERROR,
            json!({
                "httpRequestId": call_id,
                "httpRequestError": failure.message,
            }),
        ),
    }
}

/// A response as returned to the caller of an HTTP request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    /// HTTP status code.
    #[serde(default)]
    pub status_code: u16,
    /// Header names and values, as the client reported them.
    #[serde(default)]
    pub raw_headers: Value,
    /// Response body.
    #[serde(default)]
    pub body: Value,
}

impl HttpResponse {
    /// Create a response with a status code and body.
    pub fn new(status_code: u16, body: impl Into<Value>) -> Self {
        Self {
            status_code,
            raw_headers: Value::Array(Vec::new()),
            body: body.into(),
        }
    }

    /// Set the raw headers as alternating names and values.
    pub fn with_raw_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.raw_headers = headers
            .into_iter()
            .map(|h| Value::String(h.into()))
            .collect();
        self
    }

    /// Encode as the value a caller receives.
    pub fn to_value(&self) -> Value {
        json!({
            "body": self.body,
            "rawHeaders": self.raw_headers,
            "statusCode": self.status_code,
        })
    }

    /// Decode a caller-facing value, tolerating missing fields.
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_else(|_| Self {
            body: value.clone(),
            ..Self::default()
        })
    }
}

/// An HTTP request described by client options such as `method` and `uri`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Client options.
    pub options: Map<String, Value>,
    /// Call context.
    pub session: Session,
}

impl HttpRequest {
    /// Create a request with the given method and URI.
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        let mut options = Map::new();
        options.insert("method".to_string(), Value::String(method.into()));
        options.insert("uri".to_string(), Value::String(uri.into()));
        Self {
            options,
            session: Session::default(),
        }
    }

    /// Create a `GET` request.
    pub fn get(uri: impl Into<String>) -> Self {
        Self::new("GET", uri)
    }

    /// Create a `POST` request.
    pub fn post(uri: impl Into<String>) -> Self {
        Self::new("POST", uri)
    }

    /// Create a request from raw client options.
    pub fn from_options(options: Map<String, Value>) -> Self {
        Self {
            options,
            session: Session::default(),
        }
    }

    /// Set a client option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Set the session.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    fn option_str(&self, key: &str) -> &str {
        self.options.get(key).and_then(Value::as_str).unwrap_or("")
    }
}

impl InterceptedCall for HttpRequest {
    const DOMAIN: Domain = Domain::HttpRequest;

    fn session(&self) -> &Session {
        &self.session
    }

    fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    fn call_data(&self) -> Value {
        let mut data = Map::new();
        data.insert("options".to_string(), Value::Object(self.options.clone()));
        insert_session_context(&mut data, &self.session);
        Value::Object(data)
    }

    fn target(&self) -> String {
        format!(
            "http: {} {}",
            self.option_str("method"),
            self.option_str("uri")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::fingerprint;

    fn fp(data: Value) -> String {
        fingerprint(Domain::HttpRequest, &data).unwrap().to_hex()
    }

    #[test]
    fn options_and_context_change_the_fingerprint() {
        let base = fp(json!({"options": {"uri": "http://a"}}));
        assert_ne!(base, fp(json!({"options": {"uri": "http://b"}})));
        assert_ne!(base, fp(json!({"options": {"uri": "http://a"}, "requestId": "R"})));
        assert_ne!(base, fp(json!({"options": {"uri": "http://a"}, "stack": ["A.b"]})));
        assert_ne!(
            base,
            fp(json!({"options": {"uri": "http://a"}, "moduleCallSignature": "A.b"}))
        );
        assert_eq!(
            base,
            fp(json!({"options": {"uri": "http://a"}, "httpRequestCreateTime": "2017-01-01"}))
        );
    }

    #[test]
    fn legacy_requests_key_on_enclosing_call_id() {
        let legacy = |module_call_id: &str| {
            json!({
                "options": {"uri": "http://a"},
                "requestId": "r",
                "moduleCallId": module_call_id,
            })
        };
        assert_ne!(fp(legacy("A")), fp(legacy("B")));

        let mut stamped = legacy("A");
        stamped["httpRequestCreateTime"] = json!("2017-01-01 10:00:00");
        stamped["httpRequestId"] = json!("h1");
        assert_eq!(fp(stamped), fp(legacy("A")));
    }

    #[test]
    fn live_legacy_request_matches_its_logged_form() {
        let call = HttpRequest::get("http://a").with_session(
            Session::new()
                .with_request_id("r")
                .with_module_call_id("m1"),
        );
        let logged = json!({
            "options": {"method": "GET", "uri": "http://a"},
            "requestId": "r",
            "moduleCallId": "m1",
            "httpRequestId": "h1",
            "httpRequestCreateTime": "2017-01-01 10:00:00",
        });
        assert_eq!(fp(call.call_data()), fp(logged));
    }

    #[test]
    fn response_is_replayed_in_client_shape() {
        let data = json!({
            "httpRequestId": "h1",
            "httpResponseBody": "ok",
            "httpResponseHeader": ["Content-Type", "text/plain"],
            "httpResponseStatusCode": 200,
        });
        let outcome = shape_outcome(RESPONSE, data.as_object().unwrap()).unwrap();
        assert_eq!(
            SPEC.render(outcome).unwrap(),
            json!({"body": "ok", "rawHeaders": ["Content-Type", "text/plain"], "statusCode": 200})
        );
    }

    #[test]
    fn request_error_becomes_failure() {
        let data = json!({"httpRequestId": "h1", "httpRequestError": "ECONNREFUSED"});
        let outcome = shape_outcome(REQUEST_ERROR, data.as_object().unwrap()).unwrap();
        assert_eq!(SPEC.render(outcome).unwrap_err().message, "ECONNREFUSED");
    }

    #[test]
    fn bad_status_code_is_invalid_mock_data() {
        let data = json!({"httpRequestId": "h1", "httpResponseStatusCode": "200"});
        assert!(matches!(
            shape_outcome(RESPONSE, data.as_object().unwrap()),
            Err(RecallError::InvalidMockData { .. })
        ));
    }

    #[test]
    fn recorded_response_uses_fixture_fields() {
        let response = HttpResponse::new(201, json!({"id": 4})).with_raw_headers(["X-A", "1"]);
        let entry = record_outcome(&CallId::from("h1"), &Ok(response.to_value()));
        assert_eq!(entry.kind, RESPONSE);
        assert_eq!(entry.data["httpResponseStatusCode"], json!(201));
        assert_eq!(entry.data["httpResponseHeader"], json!(["X-A", "1"]));
        assert_eq!(entry.data["httpResponseBody"], json!({"id": 4}));
    }

    #[test]
    fn target_names_method_and_uri() {
        assert_eq!(
            HttpRequest::get("http://example.com").target(),
            "http: GET http://example.com"
        );
    }
}
