//! # Conveyor Core
//!
//! The poll-dispatch-acknowledge engine: a pool of independent polling lanes
//! that drain a durable queue through a remote worker, guaranteeing every
//! received message ends in exactly one terminal disposition — deleted on
//! success, dead-lettered on unrecoverable failure, or left unacknowledged
//! to redeliver after its visibility timeout.
//!
//! ## Architecture
//!
//! - Business logic depends only on the adapter traits in `conveyor-runtime`
//! - Each lane is a single sequential flow of non-blocking operations
//! - Lanes share no mutable per-message state; cross-lane mutual exclusion
//!   on a message is the queue's visibility timeout, not an in-process lock
//! - A supervisor holds the lane count constant for the process lifetime
//!
//! ## Delivery semantics
//!
//! The engine is at-least-once. No per-invocation timeout is imposed beyond
//! what the remote call itself enforces, so a slow invocation can outlast
//! the message's visibility timeout and the same message can be delivered
//! to another lane while the first is still working. The invoked processing
//! logic must therefore be idempotent.
//!
//! ## Module Organization
//!
//! - [`envelope`] - Producer envelope decoding
//! - [`backoff`] - Cycle outcome to inter-cycle delay mapping
//! - [`dead_letter`] - Re-enqueueing unrecoverable messages
//! - [`poller`] - The per-lane state machine
//! - [`pool`] - Lane supervision
//! - [`metrics`] - Advisory processing counters
//! - [`config`] - Engine configuration and validation

// Module declarations
pub mod backoff;
pub mod config;
pub mod dead_letter;
pub mod envelope;
pub mod metrics;
pub mod poller;
pub mod pool;

// Re-export commonly used types at crate root for convenience
pub use backoff::{CycleOutcome, DelayPolicy};
pub use config::{ConfigError, EngineConfig, PollerSettings};
pub use dead_letter::DeadLetterRouter;
pub use envelope::{extract_invocation_payload, EnvelopeError, MessageEnvelope};
pub use metrics::{AtomicMetrics, MetricsSnapshot, NoOpMetrics, PollerMetrics};
pub use poller::{MessageDisposition, PollResult, Poller};
pub use pool::{LaneId, PollerPool, PoolError};
