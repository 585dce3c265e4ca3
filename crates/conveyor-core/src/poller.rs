//! The per-lane poll-dispatch-acknowledge state machine.
//!
//! One lane cycles through `Idle → Receiving → {Sleeping | Dispatching →
//! Draining → Sleeping} → Idle` forever; there is no terminal state. Within
//! a batch every message's invoke-then-settle sequence runs concurrently,
//! and the lane joins on all of them before choosing its next delay, so
//! in-flight work per lane is bounded by the batch cap.
//!
//! No error may halt the loop: every handled condition resolves to
//! "schedule the next cycle after a delay". Shutdown is an external
//! process-level concern.

use crate::backoff::CycleOutcome;
use crate::config::PollerSettings;
use crate::dead_letter::DeadLetterRouter;
use crate::envelope::extract_invocation_payload;
use crate::metrics::PollerMetrics;
use crate::pool::LaneId;
use conveyor_runtime::{InvokeOutcome, QueueClient, QueueError, ReceivedMessage, WorkerInvoker};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

// ============================================================================
// Cycle Result Types
// ============================================================================

/// Result of one receive call
#[derive(Debug)]
pub enum PollResult {
    /// The queue had nothing to deliver
    Empty,
    /// An ordered batch of at most the configured cap
    Batch(Vec<ReceivedMessage>),
    /// The receive failed at the transport or service level
    TransientError(QueueError),
}

/// Terminal record for one delivery of one message.
///
/// Every received message resolves to exactly one disposition per cycle,
/// before the lane's next cycle is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDisposition {
    /// Processed and removed from the source queue
    Deleted,
    /// Processed but the delete failed; the message redelivers after its
    /// visibility timeout and the worker must tolerate the duplicate
    DeleteFailed,
    /// Unprocessable; re-enqueued onto the dead-letter queue
    DeadLettered,
    /// Unprocessable and the dead-letter enqueue failed too; left
    /// unacknowledged to redeliver after its visibility timeout
    Unrecovered,
}

// ============================================================================
// Poller
// ============================================================================

/// A single polling lane
pub struct Poller {
    lane: LaneId,
    queue: Arc<dyn QueueClient>,
    invoker: Arc<dyn WorkerInvoker>,
    dead_letter: Arc<DeadLetterRouter>,
    metrics: Arc<dyn PollerMetrics>,
    settings: PollerSettings,
}

impl Poller {
    /// Create a lane over the given adapters
    pub fn new(
        lane: LaneId,
        queue: Arc<dyn QueueClient>,
        invoker: Arc<dyn WorkerInvoker>,
        dead_letter: Arc<DeadLetterRouter>,
        metrics: Arc<dyn PollerMetrics>,
        settings: PollerSettings,
    ) -> Self {
        Self {
            lane,
            queue,
            invoker,
            dead_letter,
            metrics,
            settings,
        }
    }

    /// Run the lane loop indefinitely
    pub async fn run(self) {
        info!(lane = %self.lane, "Polling lane started");

        loop {
            let outcome = self.cycle().await;
            let delay = self.settings.delays.delay_for(outcome);

            debug!(
                lane = %self.lane,
                outcome = ?outcome,
                delay_ms = delay.as_millis() as u64,
                "Cycle complete"
            );

            tokio::time::sleep(delay).await;
        }
    }

    /// One receive → dispatch → fan-in pass
    async fn cycle(&self) -> CycleOutcome {
        match self.receive().await {
            PollResult::Empty => {
                debug!(lane = %self.lane, "No messages received");
                CycleOutcome::Empty
            }

            PollResult::TransientError(err) => {
                warn!(lane = %self.lane, error = %err, "Receive failed; retrying after delay");
                self.metrics.record_receive_error();
                CycleOutcome::ReceiveError
            }

            PollResult::Batch(batch) => {
                let batch_size = batch.len();
                self.metrics.record_batch(batch_size);
                info!(lane = %self.lane, count = batch_size, "Received message batch");

                // Fan-out over the batch, fan-in before the cycle ends: the
                // lane does not advance until every message has a terminal
                // disposition.
                let dispositions =
                    join_all(batch.into_iter().map(|message| self.settle_message(message))).await;

                let deleted = count(&dispositions, MessageDisposition::Deleted);
                let delete_failures = count(&dispositions, MessageDisposition::DeleteFailed);
                let dead_lettered = count(&dispositions, MessageDisposition::DeadLettered);
                let unrecovered = count(&dispositions, MessageDisposition::Unrecovered);

                info!(
                    lane = %self.lane,
                    count = batch_size,
                    deleted,
                    delete_failures,
                    dead_lettered,
                    unrecovered,
                    "Batch drained"
                );

                CycleOutcome::Drained {
                    clean: delete_failures == 0 && unrecovered == 0,
                }
            }
        }
    }

    /// Receive a batch, folding the result into a [`PollResult`]
    async fn receive(&self) -> PollResult {
        match self.queue.receive_messages(&self.settings.receive).await {
            Ok(batch) if batch.is_empty() => PollResult::Empty,
            Ok(batch) => PollResult::Batch(batch),
            Err(err) => PollResult::TransientError(err),
        }
    }

    /// Drive one message to its terminal disposition
    async fn settle_message(&self, message: ReceivedMessage) -> MessageDisposition {
        let payload = match extract_invocation_payload(&message.body) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    lane = %self.lane,
                    message_id = %message.message_id,
                    error = %err,
                    "Message envelope could not be decoded; dead-lettering"
                );
                return self.dead_letter_message(&message).await;
            }
        };

        debug!(lane = %self.lane, message_id = %message.message_id, "Invoking worker");

        match self.invoker.invoke(payload).await {
            InvokeOutcome::Success(_) => {
                self.metrics.record_invocation(true);
                debug!(
                    lane = %self.lane,
                    message_id = %message.message_id,
                    receive_count = message.receive_count,
                    "Worker invocation succeeded"
                );
                self.delete_processed(&message).await
            }

            InvokeOutcome::Failure(err) => {
                self.metrics.record_invocation(false);
                warn!(
                    lane = %self.lane,
                    message_id = %message.message_id,
                    error = %err,
                    "Worker invocation failed; dead-lettering"
                );
                self.dead_letter_message(&message).await
            }
        }
    }

    /// Delete a successfully processed message.
    ///
    /// A failed delete is never retried by re-invoking the worker — the
    /// processing already happened. The message redelivers after its
    /// visibility timeout, which the worker must tolerate.
    async fn delete_processed(&self, message: &ReceivedMessage) -> MessageDisposition {
        match self.queue.delete_message(&message.receipt_handle).await {
            Ok(()) => {
                self.metrics.record_deleted();
                debug!(
                    lane = %self.lane,
                    message_id = %message.message_id,
                    "Message deleted"
                );
                MessageDisposition::Deleted
            }
            Err(err) => {
                self.metrics.record_delete_failure();
                warn!(
                    lane = %self.lane,
                    message_id = %message.message_id,
                    error = %err,
                    "Processed message could not be deleted; it will redeliver after visibility expiry"
                );
                MessageDisposition::DeleteFailed
            }
        }
    }

    /// Route an unprocessable message to the dead-letter queue
    async fn dead_letter_message(&self, message: &ReceivedMessage) -> MessageDisposition {
        match self.dead_letter.route(message).await {
            Ok(_) => {
                self.metrics.record_dead_lettered();
                MessageDisposition::DeadLettered
            }
            Err(_) => {
                // The router already logged the failure; record that the
                // message is unacknowledged and relies on redelivery.
                self.metrics.record_unrecovered();
                warn!(
                    lane = %self.lane,
                    message_id = %message.message_id,
                    "Message left unrecovered; awaiting visibility-timeout redelivery"
                );
                MessageDisposition::Unrecovered
            }
        }
    }
}

fn count(dispositions: &[MessageDisposition], wanted: MessageDisposition) -> usize {
    dispositions.iter().filter(|d| **d == wanted).count()
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
