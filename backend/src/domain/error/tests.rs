//! Tests for domain error construction and wire serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::invalid_operation("Cannot follow yourself"), ErrorCode::InvalidOperation)]
#[case(Error::unauthenticated("login required"), ErrorCode::Unauthenticated)]
#[case(Error::not_found("User not found"), ErrorCode::NotFound)]
#[case(Error::conflict("Already following this user"), ErrorCode::Conflict)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::invalid_request("bad").try_with_trace_id("  ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn trace_id_is_absent_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("fixture is a valid UUID");
    let error = TraceId::scope(trace_id, async { Error::conflict("dup") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_message_under_error_key(expected_trace_id: String) {
    let error = Error::invalid_operation("Not following this user")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "targetId": "abc" }));

    let value = serde_json::to_value(&error).expect("serialise error");

    assert_eq!(
        value,
        json!({
            "error": "Not following this user",
            "code": "invalid_operation",
            "traceId": expected_trace_id,
            "details": { "targetId": "abc" },
        })
    );
}

#[rstest]
fn omits_absent_optional_fields() {
    let value = serde_json::to_value(Error::not_found("User not found")).expect("serialise");

    assert_eq!(value, json!({ "error": "User not found", "code": "not_found" }));
}

#[rstest]
#[case(json!({ "error": "  ", "code": "conflict" }), ErrorValidationError::EmptyMessage)]
#[case(
    json!({ "error": "dup", "code": "conflict", "traceId": "" }),
    ErrorValidationError::EmptyTraceId
)]
fn deserialisation_enforces_invariants(
    #[case] payload: serde_json::Value,
    #[case] expected: ErrorValidationError,
) {
    let err = serde_json::from_value::<Error>(payload).expect_err("invalid payload");
    assert!(err.to_string().contains(&expected.to_string()));
}

#[rstest]
#[tokio::test]
async fn deserialisation_does_not_adopt_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("fixture is a valid UUID");
    let payload = json!({ "error": "dup", "code": "conflict" });

    let error = TraceId::scope(trace_id, async move {
        serde_json::from_value::<Error>(payload).expect("valid payload")
    })
    .await;

    assert!(error.trace_id().is_none());
}
