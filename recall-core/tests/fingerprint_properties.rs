//! Property tests for fingerprint stability and sensitivity.

use proptest::prelude::*;
use recall_core::fingerprint::fingerprint;
use recall_core::types::Domain;
use serde_json::{Map, Value, json};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 _-]{0,12}".prop_map(Value::from),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn params() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z]{1,6}", json_value(), 0..5)
        .prop_map(|m| m.into_iter().collect())
}

/// Rebuild an object with its keys in reverse insertion order.
fn reversed(map: &Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<(String, Value)> =
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    entries.reverse();
    entries.into_iter().collect()
}

proptest! {
    #[test]
    fn digest_is_32_lowercase_hex(query in "[ -~]{0,40}", params in params()) {
        let fp = fingerprint(Domain::DbQuery, &json!({"query": query, "params": params})).unwrap();
        let hex = fp.to_hex();
        prop_assert_eq!(hex.len(), 32);
        prop_assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn key_order_does_not_matter(query in "[ -~]{0,40}", params in params()) {
        let a = json!({"query": query, "params": params, "requestId": "r"});
        let b = json!({"requestId": "r", "params": reversed(&params), "query": query});
        prop_assert_eq!(
            fingerprint(Domain::DbQuery, &a).unwrap(),
            fingerprint(Domain::DbQuery, &b).unwrap()
        );
    }

    #[test]
    fn volatile_fields_do_not_matter(
        args in params(),
        connection in any::<u32>(),
        created in "[0-9: -]{0,26}",
        id in "[a-f0-9]{32}",
    ) {
        let mut with_session = args.clone();
        let session = json!({"requestId": "r", "connectionId": connection});
        with_session.insert("session".into(), session);
        let plain = json!({"moduleName": "Foo", "methodName": "bar", "args": with_session});

        let mut noisy = plain.clone();
        noisy["moduleCallId"] = json!(id);
        noisy["moduleCallCreateTime"] = json!(created);
        noisy["args"]["session"]["connectionId"] = json!(connection.wrapping_add(1));

        prop_assert_eq!(
            fingerprint(Domain::ModuleCall, &plain).unwrap(),
            fingerprint(Domain::ModuleCall, &noisy).unwrap()
        );
    }

    #[test]
    fn differing_query_changes_digest(a in "[ -~]{1,40}", b in "[ -~]{1,40}") {
        prop_assume!(a != b);
        prop_assert_ne!(
            fingerprint(Domain::DbQuery, &json!({"query": a})).unwrap(),
            fingerprint(Domain::DbQuery, &json!({"query": b})).unwrap()
        );
    }

    #[test]
    fn differing_uri_changes_digest(a in "[a-z]{1,12}", b in "[a-z]{1,12}") {
        prop_assume!(a != b);
        let fp = |host: &str| {
            fingerprint(
                Domain::HttpRequest,
                &json!({"options": {"uri": format!("http://{host}")}, "stack": []}),
            )
            .unwrap()
        };
        prop_assert_ne!(fp(&a), fp(&b));
    }
}

#[test]
fn empty_object_digest_is_stable() {
    for domain in Domain::ALL {
        let empty = fingerprint(domain, &json!({})).unwrap();
        assert_eq!(fingerprint(domain, &Value::Null).unwrap(), empty);
        assert_eq!(empty.to_hex().len(), 32);
    }
}
