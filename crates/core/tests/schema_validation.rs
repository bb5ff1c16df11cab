//! Exercises the submission contract the HTTP layer relies on: every
//! required field, every type rule, and the hash over the accepted payload.

use duel_core::{content_hash, validate_submission, ValidationError, SIMULATION_SCHEMA};
use serde_json::{json, Value};

fn valid_body() -> Value {
    json!({
        "id": "s1",
        "user_id": "u1",
        "env_id": "e1",
        "data": {"x": 1},
        "result": 3.5,
        "summary": "ok"
    })
}

#[test]
fn each_missing_field_is_named() {
    for spec in SIMULATION_SCHEMA {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove(spec.name);
        let err = validate_submission(&body).unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: spec.name });
        assert_eq!(
            err.to_string(),
            format!("Missing required field: {}", spec.name)
        );
    }
}

#[test]
fn first_missing_field_wins() {
    let body = json!({"id": "s1", "data": {}});
    assert_eq!(
        validate_submission(&body).unwrap_err().to_string(),
        "Missing required field: user_id"
    );
}

#[test]
fn identifiers_must_be_strings() {
    for field in ["id", "user_id", "env_id"] {
        let mut body = valid_body();
        body[field] = json!(1);
        assert_eq!(
            validate_submission(&body).unwrap_err().to_string(),
            format!("{field} must be a string")
        );
    }
}

#[test]
fn result_must_be_a_number() {
    for bad in [json!("3.5"), json!(null), json!(true), json!([3.5])] {
        let mut body = valid_body();
        body["result"] = bad;
        assert_eq!(
            validate_submission(&body).unwrap_err().to_string(),
            "result must be a number"
        );
    }
}

#[test]
fn data_and_summary_accept_any_type() {
    let mut body = valid_body();
    body["data"] = json!([1, "two", null]);
    body["summary"] = json!({"lines": 3});
    let sub = validate_submission(&body).unwrap();
    assert_eq!(sub.summary, json!({"lines": 3}));
}

#[test]
fn extra_fields_are_ignored() {
    let mut body = valid_body();
    body["data_hash"] = json!("caller-supplied");
    let sub = validate_submission(&body).unwrap();
    assert_eq!(sub.id, "s1");
}

#[test]
fn hash_follows_submitted_key_order() {
    let body: Value = serde_json::from_str(
        r#"{"id":"s1","user_id":"u1","env_id":"e1","data":{"z":1,"a":{"y":2,"b":3}},"result":0,"summary":""}"#,
    )
    .unwrap();
    let sub = validate_submission(&body).unwrap();
    assert_eq!(sub.data.to_string(), r#"{"z":1,"a":{"y":2,"b":3}}"#);
    assert_eq!(content_hash(&sub.data).len(), 64);
}
