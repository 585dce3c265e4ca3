//! Tests for message types

use super::*;

// ============================================================================
// QueueName Tests
// ============================================================================

#[test]
fn test_queue_name_accepts_valid_names() {
    assert!(QueueName::new("orders").is_ok());
    assert!(QueueName::new("orders-dead-letter").is_ok());
    assert!(QueueName::new("orders_v2").is_ok());
    assert!(QueueName::new("Q1").is_ok());
}

#[test]
fn test_queue_name_rejects_empty_and_too_long() {
    assert!(QueueName::new("").is_err());
    assert!(QueueName::new("q".repeat(261)).is_err());
    assert!(QueueName::new("q".repeat(260)).is_ok());
}

#[test]
fn test_queue_name_rejects_invalid_characters() {
    assert!(QueueName::new("orders queue").is_err());
    assert!(QueueName::new("orders/queue").is_err());
    assert!(QueueName::new("orders.queue").is_err());
}

#[test]
fn test_queue_name_rejects_hyphen_placement() {
    assert!(QueueName::new("-orders").is_err());
    assert!(QueueName::new("orders-").is_err());
    assert!(QueueName::new("orders--dlq").is_err());
}

#[test]
fn test_queue_name_from_str_round_trip() {
    let name: QueueName = "orders".parse().unwrap();
    assert_eq!(name.as_str(), "orders");
    assert_eq!(name.to_string(), "orders");
}

// ============================================================================
// ReceiptHandle Tests
// ============================================================================

#[test]
fn test_receipt_handle_expiry() {
    let future = Utc::now() + chrono::Duration::seconds(30);
    let handle = ReceiptHandle::new("abc".to_string(), future);
    assert!(!handle.is_expired());
    assert_eq!(handle.handle(), "abc");

    let past = Utc::now() - chrono::Duration::seconds(1);
    let expired = ReceiptHandle::new("def".to_string(), past);
    assert!(expired.is_expired());
}

// ============================================================================
// ReceivedMessage Tests
// ============================================================================

#[test]
fn test_received_message_max_receive_count() {
    let message = ReceivedMessage {
        message_id: MessageId::new("m-1"),
        body: bytes::Bytes::from_static(b"{}"),
        receipt_handle: ReceiptHandle::new(
            "r-1".to_string(),
            Utc::now() + chrono::Duration::seconds(10),
        ),
        receive_count: 3,
    };

    assert!(!message.has_exceeded_max_receive_count(3));
    assert!(message.has_exceeded_max_receive_count(2));
}
