//! Advisory processing counters.
//!
//! Counters exist for observability only and are never authoritative:
//! control flow in the engine depends exclusively on queue and invocation
//! results. Recording must never fail or block a lane.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counter sink for engine events.
///
/// All methods take `&self` so an `Arc<dyn PollerMetrics>` can be shared
/// across lanes. Implementations must be thread-safe and infallible.
pub trait PollerMetrics: Send + Sync {
    /// A batch of `size` messages was received
    fn record_batch(&self, size: usize);

    /// A worker invocation completed
    fn record_invocation(&self, success: bool);

    /// A processed message was deleted from the source queue
    fn record_deleted(&self);

    /// A processed message could not be deleted
    fn record_delete_failure(&self);

    /// A failed message was re-enqueued onto the dead-letter queue
    fn record_dead_lettered(&self);

    /// A failed message could not be dead-lettered either
    fn record_unrecovered(&self);

    /// A receive call failed
    fn record_receive_error(&self);

    /// The pool replaced a terminated lane
    fn record_lane_restart(&self);
}

/// Metrics sink that discards everything (tests, default wiring)
pub struct NoOpMetrics;

impl PollerMetrics for NoOpMetrics {
    fn record_batch(&self, _size: usize) {}
    fn record_invocation(&self, _success: bool) {}
    fn record_deleted(&self) {}
    fn record_delete_failure(&self) {}
    fn record_dead_lettered(&self) {}
    fn record_unrecovered(&self) {}
    fn record_receive_error(&self) {}
    fn record_lane_restart(&self) {}
}

/// Process-wide counters with explicit read semantics.
///
/// Lanes increment through the trait; readers take a [`snapshot`] for a
/// consistent-enough point-in-time view. Individual counters are updated
/// atomically but a snapshot is not a cross-counter transaction.
///
/// [`snapshot`]: AtomicMetrics::snapshot
#[derive(Default)]
pub struct AtomicMetrics {
    received: AtomicU64,
    invocations: AtomicU64,
    invocation_failures: AtomicU64,
    deleted: AtomicU64,
    delete_failures: AtomicU64,
    dead_lettered: AtomicU64,
    unrecovered: AtomicU64,
    receive_errors: AtomicU64,
    lane_restarts: AtomicU64,
}

impl AtomicMetrics {
    /// Create a zeroed counter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Read all counters at once
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            invocations: self.invocations.load(Ordering::Relaxed),
            invocation_failures: self.invocation_failures.load(Ordering::Relaxed),
            deleted: self.deleted.load(Ordering::Relaxed),
            delete_failures: self.delete_failures.load(Ordering::Relaxed),
            dead_lettered: self.dead_lettered.load(Ordering::Relaxed),
            unrecovered: self.unrecovered.load(Ordering::Relaxed),
            receive_errors: self.receive_errors.load(Ordering::Relaxed),
            lane_restarts: self.lane_restarts.load(Ordering::Relaxed),
        }
    }
}

impl PollerMetrics for AtomicMetrics {
    fn record_batch(&self, size: usize) {
        self.received.fetch_add(size as u64, Ordering::Relaxed);
    }

    fn record_invocation(&self, success: bool) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.invocation_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_deleted(&self) {
        self.deleted.fetch_add(1, Ordering::Relaxed);
    }

    fn record_delete_failure(&self) {
        self.delete_failures.fetch_add(1, Ordering::Relaxed);
    }

    fn record_dead_lettered(&self) {
        self.dead_lettered.fetch_add(1, Ordering::Relaxed);
    }

    fn record_unrecovered(&self) {
        self.unrecovered.fetch_add(1, Ordering::Relaxed);
    }

    fn record_receive_error(&self) {
        self.receive_errors.fetch_add(1, Ordering::Relaxed);
    }

    fn record_lane_restart(&self) {
        self.lane_restarts.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time view of an [`AtomicMetrics`] counter set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub received: u64,
    pub invocations: u64,
    pub invocation_failures: u64,
    pub deleted: u64,
    pub delete_failures: u64,
    pub dead_lettered: u64,
    pub unrecovered: u64,
    pub receive_errors: u64,
    pub lane_restarts: u64,
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
