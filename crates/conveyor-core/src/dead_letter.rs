//! Re-enqueueing unrecoverable messages onto a secondary queue.

use conveyor_runtime::{MessageId, QueueClient, QueueError, QueueName, ReceivedMessage};
use std::sync::Arc;
use tracing::{error, info};

/// Routes messages that exhausted normal processing to the dead-letter queue.
///
/// On success the message is failed-but-recorded and the source delivery is
/// abandoned (it expires via visibility timeout). On failure there is no
/// further escalation: the message still persists in the source queue, so
/// degrading to redelivery-after-expiry is an accepted at-least-once
/// tradeoff rather than loss.
pub struct DeadLetterRouter {
    client: Arc<dyn QueueClient>,
    queue: QueueName,
}

impl DeadLetterRouter {
    /// Create a router targeting the named queue
    pub fn new(client: Arc<dyn QueueClient>, queue: QueueName) -> Self {
        Self { client, queue }
    }

    /// Get the target queue name
    pub fn queue(&self) -> &QueueName {
        &self.queue
    }

    /// Re-enqueue one message onto the dead-letter queue.
    ///
    /// The body goes out verbatim so a dead-lettered message can be redriven
    /// through the same decode path later.
    pub async fn route(&self, message: &ReceivedMessage) -> Result<MessageId, QueueError> {
        match self
            .client
            .send_message(&self.queue, message.body.clone())
            .await
        {
            Ok(dead_letter_id) => {
                info!(
                    message_id = %message.message_id,
                    dead_letter_queue = %self.queue,
                    "Message routed to dead-letter queue"
                );
                Ok(dead_letter_id)
            }
            Err(err) => {
                error!(
                    message_id = %message.message_id,
                    dead_letter_queue = %self.queue,
                    error = %err,
                    "Dead-letter enqueue failed"
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "dead_letter_tests.rs"]
mod tests;
