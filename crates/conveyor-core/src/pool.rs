//! Lane supervision.
//!
//! The pool owns N independent lanes for the process lifetime. Lanes run
//! forever by design, so a completed lane task is always unexpected; the
//! supervisor replaces it immediately with a fresh lane identity, holding
//! steady-state concurrency at N. Terminated lanes are never resurrected in
//! place.
//!
//! Lanes share no mutable per-message state. Mutual exclusion across lanes
//! on a given message is delegated entirely to the queue's visibility
//! timeout, never to an in-process lock.

use crate::config::PollerSettings;
use crate::dead_letter::DeadLetterRouter;
use crate::metrics::PollerMetrics;
use crate::poller::Poller;
use conveyor_runtime::{QueueClient, WorkerInvoker};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Identity of one polling lane.
///
/// Replacement lanes always get a fresh id; an id is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LaneId(u64);

impl LaneId {
    /// Create a lane id
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the numeric value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for LaneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lane-{}", self.0)
    }
}

/// Errors that end pool supervision
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Poller pool has no live lanes and could not spawn replacements")]
    AllLanesLost,
}

type LaneFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type LaneFactory = Box<dyn Fn(LaneId) -> LaneFuture + Send + Sync>;

/// Supervisor owning a fixed-size set of polling lanes
pub struct PollerPool {
    concurrency: u32,
    next_lane: u64,
    factory: LaneFactory,
    metrics: Arc<dyn PollerMetrics>,
}

impl PollerPool {
    /// Create a pool over an arbitrary lane factory.
    ///
    /// The factory seam exists so supervision is testable with synthetic
    /// lane bodies; production wiring goes through [`PollerPool::for_engine`].
    pub fn new(
        concurrency: u32,
        metrics: Arc<dyn PollerMetrics>,
        factory: impl Fn(LaneId) -> LaneFuture + Send + Sync + 'static,
    ) -> Self {
        Self {
            concurrency,
            next_lane: 0,
            factory: Box::new(factory),
            metrics,
        }
    }

    /// Create a pool whose lanes run the poller state machine
    pub fn for_engine(
        concurrency: u32,
        settings: PollerSettings,
        queue: Arc<dyn QueueClient>,
        invoker: Arc<dyn WorkerInvoker>,
        dead_letter: Arc<DeadLetterRouter>,
        metrics: Arc<dyn PollerMetrics>,
    ) -> Self {
        let lane_metrics = Arc::clone(&metrics);

        Self::new(concurrency, metrics, move |lane| {
            let poller = Poller::new(
                lane,
                Arc::clone(&queue),
                Arc::clone(&invoker),
                Arc::clone(&dead_letter),
                Arc::clone(&lane_metrics),
                settings.clone(),
            );
            Box::pin(poller.run())
        })
    }

    /// Run supervision for the process lifetime.
    ///
    /// Returns only in the degenerate case where no lane is left and no
    /// replacement could be spawned; callers treat the return value as a
    /// fatal condition.
    pub async fn run(mut self) -> PoolError {
        let mut lanes = JoinSet::new();
        for _ in 0..self.concurrency {
            self.spawn_lane(&mut lanes);
        }

        info!(concurrency = self.concurrency, "Poller pool started");

        // A lane completing its future is always unexpected. Spawn the
        // replacement before the next join so concurrency never decays for
        // more than one scheduling tick.
        while let Some(result) = lanes.join_next().await {
            match result {
                Ok(()) => {
                    warn!("Polling lane exited unexpectedly; starting replacement");
                }
                Err(err) if err.is_panic() => {
                    error!(error = %err, "Polling lane panicked; starting replacement");
                }
                Err(err) => {
                    warn!(error = %err, "Polling lane was cancelled; starting replacement");
                }
            }

            self.metrics.record_lane_restart();
            self.spawn_lane(&mut lanes);
        }

        error!("Poller pool has no lanes left");
        PoolError::AllLanesLost
    }

    fn spawn_lane(&mut self, lanes: &mut JoinSet<()>) {
        let lane = LaneId::new(self.next_lane);
        self.next_lane += 1;

        info!(lane = %lane, "Starting polling lane");
        lanes.spawn((self.factory)(lane));
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
