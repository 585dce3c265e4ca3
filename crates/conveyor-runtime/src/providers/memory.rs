//! In-memory queue client for testing and local development.
//!
//! A fully functional single-process queue with the semantics the engine
//! depends on: visibility timeouts, receive-count tracking, receipt renewal
//! per delivery, and sends targeting arbitrary (auto-created) queues so the
//! dead-letter path can be exercised end to end.

use crate::error::QueueError;
use crate::message::{MessageId, QueueName, ReceiptHandle, ReceivedMessage};
use crate::queue::{QueueClient, ReceiveParameters, MAX_RECEIVE_BATCH};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

// ============================================================================
// Internal Storage Structures
// ============================================================================

/// Thread-safe storage for all queues
#[derive(Default)]
struct QueueStorage {
    queues: HashMap<QueueName, MemoryQueue>,
}

impl QueueStorage {
    fn queue_mut(&mut self, name: &QueueName) -> &mut MemoryQueue {
        self.queues.entry(name.clone()).or_default()
    }
}

/// State of a single queue
#[derive(Default)]
struct MemoryQueue {
    /// Messages available for delivery (FIFO order)
    ready: VecDeque<StoredMessage>,
    /// Deliveries hidden behind a visibility timeout, keyed by receipt handle
    in_flight: HashMap<String, InFlightMessage>,
}

impl MemoryQueue {
    /// Return expired in-flight deliveries to the ready queue
    fn reclaim_expired(&mut self, now: DateTime<Utc>) {
        let expired: Vec<String> = self
            .in_flight
            .iter()
            .filter(|(_, entry)| now >= entry.visible_again_at)
            .map(|(handle, _)| handle.clone())
            .collect();

        for handle in expired {
            if let Some(entry) = self.in_flight.remove(&handle) {
                self.ready.push_back(entry.message);
            }
        }
    }
}

/// A message stored in a queue
#[derive(Clone)]
struct StoredMessage {
    message_id: MessageId,
    body: Bytes,
    receive_count: u32,
}

/// A delivery currently hidden from other receives
struct InFlightMessage {
    message: StoredMessage,
    visible_again_at: DateTime<Utc>,
}

// ============================================================================
// InMemoryQueueClient
// ============================================================================

/// In-memory queue client bound to one primary queue
#[derive(Clone)]
pub struct InMemoryQueueClient {
    primary: QueueName,
    storage: Arc<Mutex<QueueStorage>>,
}

impl InMemoryQueueClient {
    /// Create a client with an empty primary queue
    pub fn new(primary: QueueName) -> Self {
        Self {
            primary,
            storage: Arc::new(Mutex::new(QueueStorage::default())),
        }
    }

    /// Enqueue a message directly, bypassing the client trait (test seeding)
    pub fn seed_message(&self, queue: &QueueName, body: Bytes) -> MessageId {
        let message_id = MessageId::random();
        let mut storage = self.storage.lock().expect("queue storage lock poisoned");
        storage.queue_mut(queue).ready.push_back(StoredMessage {
            message_id: message_id.clone(),
            body,
            receive_count: 0,
        });
        message_id
    }

    /// Number of messages ready for delivery in the named queue
    pub fn ready_len(&self, queue: &QueueName) -> usize {
        let mut storage = self.storage.lock().expect("queue storage lock poisoned");
        storage.queue_mut(queue).ready.len()
    }

    /// Number of deliveries currently hidden behind a visibility timeout
    pub fn in_flight_len(&self, queue: &QueueName) -> usize {
        let mut storage = self.storage.lock().expect("queue storage lock poisoned");
        storage.queue_mut(queue).in_flight.len()
    }

    /// Take every ready message body out of the named queue (test inspection)
    pub fn drain_queue(&self, queue: &QueueName) -> Vec<Bytes> {
        let mut storage = self.storage.lock().expect("queue storage lock poisoned");
        storage
            .queue_mut(queue)
            .ready
            .drain(..)
            .map(|stored| stored.body)
            .collect()
    }

    fn take_ready(&self, params: &ReceiveParameters) -> Vec<ReceivedMessage> {
        let now = Utc::now();
        let visible_again_at = now
            + chrono::Duration::from_std(params.visibility_timeout)
                .unwrap_or_else(|_| chrono::Duration::seconds(30));

        let mut storage = self.storage.lock().expect("queue storage lock poisoned");
        let queue = storage.queue_mut(&self.primary);
        queue.reclaim_expired(now);

        let max_messages = params.max_messages.min(MAX_RECEIVE_BATCH);
        let mut batch = Vec::new();

        while batch.len() < max_messages {
            let Some(mut stored) = queue.ready.pop_front() else {
                break;
            };

            stored.receive_count += 1;
            let handle = uuid::Uuid::new_v4().to_string();

            batch.push(ReceivedMessage {
                message_id: stored.message_id.clone(),
                body: stored.body.clone(),
                receipt_handle: ReceiptHandle::new(handle.clone(), visible_again_at),
                receive_count: stored.receive_count,
            });

            queue.in_flight.insert(
                handle,
                InFlightMessage {
                    message: stored,
                    visible_again_at,
                },
            );
        }

        batch
    }
}

#[async_trait]
impl QueueClient for InMemoryQueueClient {
    async fn receive_messages(
        &self,
        params: &ReceiveParameters,
    ) -> Result<Vec<ReceivedMessage>, QueueError> {
        let batch = self.take_ready(params);
        if !batch.is_empty() || params.wait_time.is_zero() {
            return Ok(batch);
        }

        // Emulate long polling: wait out the full window, then look once more
        tokio::time::sleep(params.wait_time).await;
        Ok(self.take_ready(params))
    }

    async fn delete_message(&self, receipt: &ReceiptHandle) -> Result<(), QueueError> {
        let now = Utc::now();
        let mut storage = self.storage.lock().expect("queue storage lock poisoned");
        let queue = storage.queue_mut(&self.primary);

        let valid = queue
            .in_flight
            .get(receipt.handle())
            .map(|entry| now < entry.visible_again_at)
            .unwrap_or(false);

        if !valid {
            // Expired deliveries are left for reclaim_expired; the receipt no
            // longer authorizes a delete either way.
            return Err(QueueError::MessageNotFound {
                receipt: receipt.handle().to_string(),
            });
        }

        queue.in_flight.remove(receipt.handle());
        Ok(())
    }

    async fn send_message(
        &self,
        queue: &QueueName,
        body: Bytes,
    ) -> Result<MessageId, QueueError> {
        Ok(self.seed_message(queue, body))
    }
}
