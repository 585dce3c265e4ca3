//! Engine configuration and validation.

use crate::backoff::DelayPolicy;
use conveyor_runtime::queue::MAX_RECEIVE_BATCH;
use conveyor_runtime::{QueueName, ReceiveParameters};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// SQS caps long-poll waits at 20 seconds
const MAX_WAIT_TIME_SECS: u32 = 20;

/// Complete configuration surface of the engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// URL of the primary queue to drain
    pub queue_url: String,

    /// Name of the queue receiving unrecoverable messages
    pub dead_letter_queue: String,

    /// Identifier of the worker invocation target
    pub function_name: String,

    /// Number of independent polling lanes
    pub concurrency: u32,

    /// Seconds received messages stay hidden from other consumers
    pub visibility_timeout_secs: u32,

    /// Long-poll wait per receive call, seconds
    pub wait_time_secs: u32,

    /// Messages per receive call
    pub max_batch_size: usize,

    /// Per-outcome inter-cycle delay constants
    pub delays: DelayPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            queue_url: String::new(),
            dead_letter_queue: String::new(),
            function_name: String::new(),
            concurrency: 4,
            visibility_timeout_secs: 10,
            wait_time_secs: 5,
            max_batch_size: MAX_RECEIVE_BATCH,
            delays: DelayPolicy::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}")]
    Missing { key: String },

    #[error("Invalid configuration for {key}: {message}")]
    Invalid { key: String, message: String },
}

impl EngineConfig {
    /// Validate the deserialized configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_url.is_empty() {
            return Err(ConfigError::Missing {
                key: "queue_url".to_string(),
            });
        }

        url::Url::parse(&self.queue_url).map_err(|err| ConfigError::Invalid {
            key: "queue_url".to_string(),
            message: err.to_string(),
        })?;

        if self.dead_letter_queue.is_empty() {
            return Err(ConfigError::Missing {
                key: "dead_letter_queue".to_string(),
            });
        }

        self.dead_letter_queue_name()?;

        if self.function_name.is_empty() {
            return Err(ConfigError::Missing {
                key: "function_name".to_string(),
            });
        }

        if self.concurrency == 0 {
            return Err(ConfigError::Invalid {
                key: "concurrency".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if self.max_batch_size == 0 || self.max_batch_size > MAX_RECEIVE_BATCH {
            return Err(ConfigError::Invalid {
                key: "max_batch_size".to_string(),
                message: format!("must be 1-{}", MAX_RECEIVE_BATCH),
            });
        }

        if self.wait_time_secs > MAX_WAIT_TIME_SECS {
            return Err(ConfigError::Invalid {
                key: "wait_time_secs".to_string(),
                message: format!("long-poll wait is capped at {} seconds", MAX_WAIT_TIME_SECS),
            });
        }

        Ok(())
    }

    /// Get the validated dead-letter queue name
    pub fn dead_letter_queue_name(&self) -> Result<QueueName, ConfigError> {
        QueueName::new(self.dead_letter_queue.clone()).map_err(|err| ConfigError::Invalid {
            key: "dead_letter_queue".to_string(),
            message: err.to_string(),
        })
    }

    /// Receive-call parameters derived from this configuration
    pub fn receive_parameters(&self) -> ReceiveParameters {
        ReceiveParameters {
            max_messages: self.max_batch_size,
            visibility_timeout: Duration::from_secs(u64::from(self.visibility_timeout_secs)),
            wait_time: Duration::from_secs(u64::from(self.wait_time_secs)),
        }
    }

    /// Per-lane settings derived from this configuration
    pub fn poller_settings(&self) -> PollerSettings {
        PollerSettings {
            receive: self.receive_parameters(),
            delays: self.delays.clone(),
        }
    }
}

/// The subset of configuration a single lane needs
#[derive(Debug, Clone)]
pub struct PollerSettings {
    /// Parameters for each receive call
    pub receive: ReceiveParameters,

    /// Per-outcome inter-cycle delays
    pub delays: DelayPolicy,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            receive: ReceiveParameters::default(),
            delays: DelayPolicy::default(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
