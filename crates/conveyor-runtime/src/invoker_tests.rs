//! Tests for invocation response classification

use super::*;
use crate::error::InvokeError;

// ============================================================================
// classify_response Tests
// ============================================================================

#[test]
fn test_classify_well_formed_success() {
    let payload = br#"{"statement_id": "abc-123", "status": "stored"}"#;
    let outcome = classify_response(None, payload);

    match outcome {
        InvokeOutcome::Success(value) => {
            assert_eq!(value["statement_id"], "abc-123");
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[test]
fn test_classify_empty_payload_success() {
    let outcome = classify_response(None, b"");
    assert!(outcome.is_success());
}

#[test]
fn test_classify_nested_error_message_is_failure() {
    // The worker wraps its real error document in a serialized string
    let payload = br#"{"errorMessage": "{\"code\": 500, \"msg\": \"ingest rejected\"}"}"#;
    let outcome = classify_response(None, payload);

    match outcome {
        InvokeOutcome::Failure(InvokeError::FunctionError { message }) => {
            assert!(message.contains("ingest rejected"), "got: {}", message);
        }
        other => panic!("expected function error, got {:?}", other),
    }
}

#[test]
fn test_classify_plain_string_error_message_is_failure() {
    // Abrupt terminations (timeout, out of memory) carry a bare string
    let payload = br#"{"errorMessage": "Task timed out after 3.00 seconds"}"#;
    let outcome = classify_response(None, payload);

    match outcome {
        InvokeOutcome::Failure(InvokeError::FunctionError { message }) => {
            assert!(message.contains("Task timed out"));
        }
        other => panic!("expected function error, got {:?}", other),
    }
}

#[test]
fn test_classify_function_error_marker_is_failure() {
    let payload = br#"{"result": "partial"}"#;
    let outcome = classify_response(Some("Unhandled"), payload);

    match outcome {
        InvokeOutcome::Failure(InvokeError::FunctionError { message }) => {
            assert!(message.contains("Unhandled"));
        }
        other => panic!("expected function error, got {:?}", other),
    }
}

#[test]
fn test_classify_function_error_marker_with_empty_payload() {
    let outcome = classify_response(Some("Unhandled"), b"");
    assert!(!outcome.is_success());
}

#[test]
fn test_classify_unparseable_payload_is_failure() {
    let outcome = classify_response(None, b"<<not json>>");

    match outcome {
        InvokeOutcome::Failure(InvokeError::MalformedResponse { .. }) => {}
        other => panic!("expected malformed response, got {:?}", other),
    }
}

#[test]
fn test_classify_error_message_takes_precedence_over_body() {
    // A response can be syntactically valid and still report failure
    let payload = br#"{"errorMessage": "worker failed", "partial": true}"#;
    assert!(!classify_response(None, payload).is_success());
}
