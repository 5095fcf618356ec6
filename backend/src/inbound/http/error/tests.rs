//! Tests for HTTP error mapping.

use super::*;
use crate::domain::Error;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn conflict_case(expected_trace_id: String) -> Error {
    Error::conflict("slot already taken").with_trace_id(expected_trace_id)
}

#[fixture]
fn invalid_request_case(expected_trace_id: String) -> Error {
    Error::invalid_request("bad")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"field": "email"}))
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("token expired"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn envelope_of(error: Error, expected_trace_id: Option<&str>) -> (StatusCode, Value) {
    let response = ResponseError::error_response(&error);
    let status = response.status();

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id is valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("error envelope is JSON");
    (status, body)
}

#[rstest]
#[actix_web::test]
async fn error_responses_use_the_failure_envelope(
    #[from(conflict_case)] conflict: Error,
    #[from(invalid_request_case)] invalid_request: Error,
) {
    let (status, body) = envelope_of(conflict, Some(TRACE_ID)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("slot already taken"));
    assert_eq!(body["error"]["code"], json!("conflict"));
    assert_eq!(body["error"]["traceId"], json!(TRACE_ID));

    let (status, body) = envelope_of(invalid_request, Some(TRACE_ID)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"], json!({"field": "email"}));
    let payload: Error = serde_json::from_value(body["error"].clone()).expect("error payload");
    assert_eq!(payload.message(), "bad");
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let (status, body) = envelope_of(Error::not_found("doctor 7 not found"), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].get("traceId").is_none());
}

#[given("a forbidden error code")]
fn a_forbidden_error_code() -> ErrorCode {
    ErrorCode::Forbidden
}

#[when("the adapter maps the code to an HTTP status")]
fn the_adapter_maps_the_code_to_http_status(code: ErrorCode) -> StatusCode {
    super::status_for(code)
}

#[then("the status is 403 Forbidden")]
fn the_status_is_403_forbidden(status: StatusCode) {
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[rstest]
fn forbidden_maps_to_403() {
    let code = a_forbidden_error_code();
    let status = the_adapter_maps_the_code_to_http_status(code);
    the_status_is_403_forbidden(status);
}

#[given("an internal error carrying database details")]
fn an_internal_error_carrying_database_details() -> Error {
    Error::internal("relation \"users\" does not exist")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"sql": "SELECT 1"}))
}

#[when("the adapter redacts the client payload")]
fn the_adapter_redacts_the_client_payload(error: Error) -> Error {
    super::redact_if_internal(&error)
}

#[then("clients see only the generic message and the trace id")]
fn clients_see_only_the_generic_message(redacted: Error) {
    assert_eq!(redacted.message(), "Internal server error");
    assert_eq!(redacted.trace_id(), Some(TRACE_ID));
    assert!(redacted.details().is_none());
}

#[rstest]
fn internal_errors_are_redacted() {
    let error = an_internal_error_carrying_database_details();
    let redacted = the_adapter_redacts_the_client_payload(error);
    clients_see_only_the_generic_message(redacted);
}

#[rstest]
fn client_errors_are_never_redacted() {
    let error = Error::conflict("email already registered");
    assert_eq!(super::redact_if_internal(&error), error);
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    use actix_web::error;

    let actix_err = error::ErrorBadRequest("boom");
    let err: Error = actix_err.into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.trace_id(), None);
}
