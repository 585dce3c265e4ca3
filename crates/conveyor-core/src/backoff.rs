//! Maps a cycle outcome to the delay before the lane's next poll.

use serde::Deserialize;
use std::time::Duration;

/// Outcome of one poll cycle, as seen by the backoff scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The receive returned no messages
    Empty,
    /// A batch was dispatched and every message reached a terminal
    /// disposition; `clean` is false when any message is relying on
    /// visibility-timeout expiry (failed delete or failed dead-letter)
    Drained { clean: bool },
    /// The receive itself failed
    ReceiveError,
}

/// Per-outcome delay constants for the inter-cycle sleep.
///
/// An empty queue backs the lane off a long way, a drained batch re-polls
/// almost immediately to keep throughput up, and any infrastructure-level
/// error waits a middle distance before retrying.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DelayPolicy {
    /// Delay after an empty receive, milliseconds
    pub empty_delay_ms: u64,

    /// Delay after a fully drained batch, milliseconds
    pub drained_delay_ms: u64,

    /// Delay after an infrastructure-level error, milliseconds
    pub error_delay_ms: u64,
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self {
            empty_delay_ms: 20_000,
            drained_delay_ms: 100,
            error_delay_ms: 10_000,
        }
    }
}

impl DelayPolicy {
    /// Pick the delay before the next cycle for this outcome
    pub fn delay_for(&self, outcome: CycleOutcome) -> Duration {
        let millis = match outcome {
            CycleOutcome::Empty => self.empty_delay_ms,
            CycleOutcome::Drained { clean: true } => self.drained_delay_ms,
            CycleOutcome::Drained { clean: false } => self.error_delay_ms,
            CycleOutcome::ReceiveError => self.error_delay_ms,
        };

        Duration::from_millis(millis)
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
