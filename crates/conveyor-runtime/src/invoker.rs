//! Worker invocation trait and the AWS Lambda implementation.
//!
//! The polling engine hands each message payload to a [`WorkerInvoker`] and
//! routes the message on the returned [`InvokeOutcome`]. A worker failure
//! surfaces in two distinct shapes, both of which classify as `Failure`:
//!
//! - a transport-level failure of the invocation call itself, and
//! - a transport-successful response whose payload encodes an
//!   application-level error (an `errorMessage` field, possibly wrapping a
//!   serialized error document that needs a secondary decode).
//!
//! [`classify_response`] implements the response-side rules as a pure
//! function so they stay testable without a live backend.

use crate::error::InvokeError;
use async_trait::async_trait;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

/// Per-message result of a worker invocation
#[derive(Debug)]
pub enum InvokeOutcome {
    /// The worker processed the payload; carries its decoded response
    Success(Value),
    /// The worker could not process the payload
    Failure(InvokeError),
}

impl InvokeOutcome {
    /// Check if the invocation succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Interface to the remote processing step.
///
/// The processing logic behind this trait must be idempotent: at-least-once
/// delivery means the same message can be handed to it more than once, for
/// example when an invocation outlasts the message's visibility timeout.
#[async_trait]
pub trait WorkerInvoker: Send + Sync {
    /// Synchronously invoke the worker with one message payload
    async fn invoke(&self, payload: Bytes) -> InvokeOutcome;
}

/// Classify a transport-successful invocation response.
///
/// `function_error` is the invocation-level error marker; `payload` is the
/// raw response body. A payload that is not valid JSON is a failure. A JSON
/// payload carrying an `errorMessage` field is a failure even when the
/// surrounding response is well-formed; the field usually wraps the real
/// error document in a serialized string, so it is decoded a second time to
/// recover the cause. Abrupt worker terminations (timeouts, memory
/// exhaustion) put a plain string there instead, which is reported as-is.
pub fn classify_response(function_error: Option<&str>, payload: &[u8]) -> InvokeOutcome {
    if payload.is_empty() {
        return match function_error {
            Some(marker) => InvokeOutcome::Failure(InvokeError::FunctionError {
                message: format!("invocation marked failed: {}", marker),
            }),
            None => InvokeOutcome::Success(Value::Null),
        };
    }

    let value: Value = match serde_json::from_slice(payload) {
        Ok(value) => value,
        Err(err) => {
            return InvokeOutcome::Failure(InvokeError::MalformedResponse {
                message: err.to_string(),
            })
        }
    };

    if let Some(error_message) = value.get("errorMessage") {
        let message = match error_message {
            Value::String(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(inner) => inner.to_string(),
                Err(_) => raw.clone(),
            },
            other => other.to_string(),
        };
        return InvokeOutcome::Failure(InvokeError::FunctionError { message });
    }

    if let Some(marker) = function_error {
        return InvokeOutcome::Failure(InvokeError::FunctionError {
            message: format!("invocation marked failed: {}", marker),
        });
    }

    InvokeOutcome::Success(value)
}

/// Worker invoker backed by a single AWS Lambda function
pub struct LambdaInvoker {
    client: aws_sdk_lambda::Client,
    function_name: String,
}

impl LambdaInvoker {
    /// Create an invoker bound to one function name
    pub fn new(client: aws_sdk_lambda::Client, function_name: impl Into<String>) -> Self {
        Self {
            client,
            function_name: function_name.into(),
        }
    }

    /// Get the bound function name
    pub fn function_name(&self) -> &str {
        &self.function_name
    }
}

#[async_trait]
impl WorkerInvoker for LambdaInvoker {
    async fn invoke(&self, payload: Bytes) -> InvokeOutcome {
        debug!(function = %self.function_name, "Invoking worker");

        let result = self
            .client
            .invoke()
            .function_name(&self.function_name)
            .invocation_type(InvocationType::RequestResponse)
            .payload(Blob::new(payload.to_vec()))
            .send()
            .await;

        match result {
            Ok(output) => {
                let body = output
                    .payload()
                    .map(|blob| blob.as_ref().to_vec())
                    .unwrap_or_default();
                classify_response(output.function_error(), &body)
            }
            Err(err) => InvokeOutcome::Failure(InvokeError::Transport {
                message: format!("{}", DisplayErrorContext(&err)),
            }),
        }
    }
}

#[cfg(test)]
#[path = "invoker_tests.rs"]
mod tests;
