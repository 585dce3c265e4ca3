//! Error types for queue and worker-invocation operations.

use thiserror::Error;

/// Comprehensive error type for all queue operations
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Queue not found: {queue_name}")]
    QueueNotFound { queue_name: String },

    #[error("Message not found or receipt expired: {receipt}")]
    MessageNotFound { receipt: String },

    #[error("Operation timed out")]
    Timeout,

    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Batch size {size} exceeds maximum {max_size}")]
    BatchTooLarge { size: usize, max_size: usize },

    #[error("Queue service error: {code} - {message}")]
    ServiceError { code: String, message: String },
}

impl QueueError {
    /// Check if error is transient and worth a delayed retry
    pub fn is_transient(&self) -> bool {
        match self {
            Self::QueueNotFound { .. } => false,
            Self::MessageNotFound { .. } => false,
            Self::Timeout => true,
            Self::ConnectionFailed { .. } => true,
            Self::AuthenticationFailed { .. } => false,
            Self::BatchTooLarge { .. } => false,
            // Most queue service errors clear on their own
            Self::ServiceError { .. } => true,
        }
    }
}

/// Errors raised by a worker invocation.
///
/// Transport failures and function-reported failures are distinct variants,
/// but the polling engine treats every variant as a failed invocation.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("Invocation transport failed: {message}")]
    Transport { message: String },

    #[error("Worker reported an error: {message}")]
    FunctionError { message: String },

    #[error("Worker response could not be decoded: {message}")]
    MalformedResponse { message: String },
}

/// Validation errors for domain identifiers
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    Required { field: String },

    #[error("Invalid format for {field}: {message}")]
    InvalidFormat { field: String, message: String },

    #[error("Value out of range for {field}: {message}")]
    OutOfRange { field: String, message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
