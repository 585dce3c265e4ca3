//! The queue client trait consumed by the polling engine.

use crate::error::QueueError;
use crate::message::{MessageId, QueueName, ReceiptHandle, ReceivedMessage};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// Maximum number of messages a single receive may request
pub const MAX_RECEIVE_BATCH: usize = 10;

/// Parameters for a single receive call
#[derive(Debug, Clone)]
pub struct ReceiveParameters {
    /// Maximum number of messages to return (capped at [`MAX_RECEIVE_BATCH`])
    pub max_messages: usize,
    /// How long received messages stay hidden from other consumers
    pub visibility_timeout: Duration,
    /// How long the call may block waiting for messages (long poll)
    pub wait_time: Duration,
}

impl Default for ReceiveParameters {
    fn default() -> Self {
        Self {
            max_messages: MAX_RECEIVE_BATCH,
            visibility_timeout: Duration::from_secs(10),
            wait_time: Duration::from_secs(5),
        }
    }
}

/// Interface to a durable, at-least-once message queue.
///
/// Implementations are bound to one primary queue for receive/delete;
/// `send_message` can target any queue so failed messages can be re-enqueued
/// onto a secondary queue.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Receive a batch of messages from the primary queue.
    ///
    /// Blocks up to `params.wait_time` and returns at most
    /// `params.max_messages` messages. An empty queue yields `Ok(vec![])`,
    /// never an error; `Err` is reserved for transport or service failures.
    async fn receive_messages(
        &self,
        params: &ReceiveParameters,
    ) -> Result<Vec<ReceivedMessage>, QueueError>;

    /// Delete one delivery of a message from the primary queue.
    ///
    /// Deleting with an expired or already-used receipt reports an error;
    /// callers treat that as non-fatal since the delete is effectively
    /// idempotent from the queue's point of view.
    async fn delete_message(&self, receipt: &ReceiptHandle) -> Result<(), QueueError>;

    /// Send a message body to the named queue
    async fn send_message(&self, queue: &QueueName, body: Bytes)
        -> Result<MessageId, QueueError>;
}
