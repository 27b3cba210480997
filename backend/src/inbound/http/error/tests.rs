//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::rstest;
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

async fn body_of(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let value = serde_json::from_slice(&bytes).expect("JSON body");
    (status, header, value)
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_available("sold out"), StatusCode::BAD_REQUEST)]
#[case(Error::invalid_state("already checked in"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no token"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("in use"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), expected);
}

#[rstest]
#[actix_web::test]
async fn failure_envelope_carries_code_details_and_trace() {
    let error = Error::invalid_state("already checked in")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"status": "checked-in", "operation": "check-in"}));

    let (status, header, body) = body_of(&error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(body["success"], json!(0));
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["message"], json!("already checked in"));
    assert_eq!(body["code"], json!("invalid_state"));
    assert_eq!(body["traceId"], json!(TRACE_ID));
    assert_eq!(body["details"]["status"], json!("checked-in"));
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("connection string leaked")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"secret": "x"}));

    let (status, header, body) = body_of(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(body["message"], json!(REDACTED_MESSAGE));
    assert_eq!(body["traceId"], json!(TRACE_ID));
    assert!(body.get("details").is_none());
}

#[rstest]
#[actix_web::test]
async fn errors_without_trace_omit_header_and_field() {
    let (_, header, body) = body_of(&Error::not_found("booking not found")).await;

    assert!(header.is_none());
    assert!(body.get("traceId").is_none());
    assert_eq!(body["code"], json!("not_found"));
}

#[rstest]
fn actix_errors_become_internal() {
    let actix_error = actix_web::error::ErrorBadGateway("upstream");
    let error = Error::from(actix_error);
    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), REDACTED_MESSAGE);
}
