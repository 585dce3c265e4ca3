//! Tests for the dead-letter router

use super::*;
use async_trait::async_trait;
use bytes::Bytes;
use conveyor_runtime::{ReceiptHandle, ReceiveParameters};
use std::sync::Mutex;

/// Queue double recording sends
struct RecordingQueue {
    sends: Mutex<Vec<(QueueName, Bytes)>>,
    fail_sends: bool,
}

impl RecordingQueue {
    fn new(fail_sends: bool) -> Self {
        Self {
            sends: Mutex::new(Vec::new()),
            fail_sends,
        }
    }
}

#[async_trait]
impl QueueClient for RecordingQueue {
    async fn receive_messages(
        &self,
        _params: &ReceiveParameters,
    ) -> Result<Vec<ReceivedMessage>, QueueError> {
        Ok(vec![])
    }

    async fn delete_message(&self, _receipt: &ReceiptHandle) -> Result<(), QueueError> {
        Ok(())
    }

    async fn send_message(
        &self,
        queue: &QueueName,
        body: Bytes,
    ) -> Result<MessageId, QueueError> {
        self.sends.lock().unwrap().push((queue.clone(), body));

        if self.fail_sends {
            Err(QueueError::ConnectionFailed {
                message: "send refused".to_string(),
            })
        } else {
            Ok(MessageId::new("dlq-message-1"))
        }
    }
}

fn sample_message() -> ReceivedMessage {
    ReceivedMessage {
        message_id: MessageId::new("m-1"),
        body: Bytes::from_static(br#"{"data": [{"verb": "failed"}]}"#),
        receipt_handle: ReceiptHandle::new(
            "r-1".to_string(),
            chrono::Utc::now() + chrono::Duration::seconds(60),
        ),
        receive_count: 2,
    }
}

#[tokio::test]
async fn test_route_sends_original_body_verbatim() {
    let queue = Arc::new(RecordingQueue::new(false));
    let target = QueueName::new("statements-dead-letter").unwrap();
    let router = DeadLetterRouter::new(Arc::clone(&queue) as Arc<dyn QueueClient>, target.clone());

    let message = sample_message();
    let id = router.route(&message).await.unwrap();
    assert_eq!(id, MessageId::new("dlq-message-1"));

    let sends = queue.sends.lock().unwrap();
    assert_eq!(sends.len(), 1);
    assert_eq!(sends[0].0, target);
    assert_eq!(sends[0].1, message.body);
}

#[tokio::test]
async fn test_route_failure_is_reported_upward() {
    let queue = Arc::new(RecordingQueue::new(true));
    let router = DeadLetterRouter::new(
        Arc::clone(&queue) as Arc<dyn QueueClient>,
        QueueName::new("statements-dead-letter").unwrap(),
    );

    let err = router.route(&sample_message()).await.unwrap_err();
    assert!(err.is_transient());

    // The attempt was made; there is no retry or escalation inside the router
    assert_eq!(queue.sends.lock().unwrap().len(), 1);
}
