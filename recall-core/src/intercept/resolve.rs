//! Replay / passthrough / strict-failure decision for one call.

use super::InterceptedCall;
use crate::error::{RecallError, Result};
use crate::fingerprint::fingerprint;
use crate::outcome::CallFailure;
use crate::store::MockRegistry;
use crate::types::{CallId, Fingerprint};
use serde_json::Value;

/// How a call is to be served.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A recorded outcome matched; serve this copy of it.
    Replay {
        /// Fingerprint of the call.
        fingerprint: Fingerprint,
        /// Id of the matched call record.
        call_id: CallId,
        /// The recorded value or failure.
        result: std::result::Result<Value, CallFailure>,
    },
    /// Hand the call to the real collaborator.
    Passthrough {
        /// Fingerprint of the call, unless it was exempted before hashing.
        fingerprint: Option<Fingerprint>,
    },
}

impl Resolution {
    /// Check if the call is served from a recording.
    pub fn is_replay(&self) -> bool {
        matches!(self, Self::Replay { .. })
    }

    /// Check if the call was exempted by its session's skip marker.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Passthrough { fingerprint: None })
    }
}

/// Decide how to serve a call.
///
/// Consumes the session's one-shot skip marker. Strict mode applies when the
/// session requires mocks or `require_mocks` is set.
///
/// # Errors
/// `InvalidInput` when the call data cannot be fingerprinted, `MissingMock`
/// when strict mode applies and no recorded outcome matched.
pub fn resolve<C: InterceptedCall>(
    registry: &MockRegistry,
    call: &mut C,
    require_mocks: bool,
) -> Result<Resolution> {
    let domain = C::DOMAIN;
    if call.session_mut().take_skip_marker() {
        tracing::debug!(domain = %domain, "Automock skipped for call");
        return Ok(Resolution::Passthrough { fingerprint: None });
    }

    let call_data = call.call_data();
    let fingerprint = fingerprint(domain, &call_data)?;

    if let Some((call_id, outcome)) = registry.lookup(domain, &fingerprint) {
        tracing::debug!(
            domain = %domain,
            fingerprint = %fingerprint,
            call_id = %call_id,
            "Replaying recorded outcome"
        );
        return Ok(Resolution::Replay {
            fingerprint,
            call_id,
            result: domain.spec().render(outcome),
        });
    }

    if require_mocks || call.session().require_automock {
        tracing::debug!(domain = %domain, fingerprint = %fingerprint, "Missing required mock");
        return Err(RecallError::MissingMock {
            domain,
            target: call.target(),
            call_data,
            fingerprint,
        });
    }

    tracing::debug!(domain = %domain, fingerprint = %fingerprint, "No mock, passing through");
    Ok(Resolution::Passthrough {
        fingerprint: Some(fingerprint),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::DbQuery;
    use crate::fixture::LoadOptions;
    use crate::session::Session;
    use crate::types::Domain;
    use serde_json::json;

    fn registry_with_select_one() -> MockRegistry {
        let registry = MockRegistry::new();
        registry
            .load_mock(
                &json!([
                    {"type": "dbQuery", "data": {"query": "SELECT 1", "dbQueryId": "q1"}},
                    {"type": "dbResponse", "data": {"dbQueryId": "q1", "dbResponseSuccess": true, "data": [{"1": 1}]}},
                ]),
                &LoadOptions::default(),
            )
            .unwrap();
        registry
    }

    #[test]
    fn replays_when_both_records_exist() {
        let registry = registry_with_select_one();
        let mut call = DbQuery::new("SELECT 1");
        let resolution = resolve(&registry, &mut call, false).unwrap();
        match resolution {
            Resolution::Replay {
                call_id, result, ..
            } => {
                assert_eq!(call_id.as_str(), "q1");
                assert_eq!(result.unwrap(), json!([{"1": 1}]));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn skip_marker_is_consumed_before_lookup() {
        let registry = registry_with_select_one();
        let mut call = DbQuery::new("SELECT 1").with_session(Session::new().skip_next_mock());
        assert!(resolve(&registry, &mut call, true).unwrap().is_skipped());
        assert_eq!(call.session.automock, None);
        assert!(resolve(&registry, &mut call, true).unwrap().is_replay());
    }

    #[test]
    fn strict_miss_carries_call_data() {
        let registry = MockRegistry::new();
        let mut call = DbQuery::new("SELECT 2").with_session(Session::new().require_automock());
        let err = resolve(&registry, &mut call, false).unwrap_err();
        match err {
            RecallError::MissingMock {
                domain,
                target,
                call_data,
                fingerprint,
            } => {
                assert_eq!(domain, Domain::DbQuery);
                assert_eq!(target, "query: SELECT 2");
                assert_eq!(call_data["query"], "SELECT 2");
                assert_eq!(
                    fingerprint,
                    crate::fingerprint::fingerprint(Domain::DbQuery, &call_data).unwrap()
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn permissive_miss_passes_through() {
        let registry = MockRegistry::new();
        let mut call = DbQuery::new("SELECT 2");
        let resolution = resolve(&registry, &mut call, false).unwrap();
        assert!(matches!(resolution, Resolution::Passthrough { fingerprint: Some(_) }));
    }
}
