//! Decoding of the producer's message envelope.
//!
//! Queue message bodies are serialized envelopes wrapping a payload array;
//! the worker is invoked with the serialized form of the array's first
//! element. A body that fails to decode is unprocessable and takes the
//! dead-letter path.

use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;

/// Envelope the producer wraps around every enqueued payload
#[derive(Debug, Deserialize)]
pub struct MessageEnvelope {
    /// Payload array; the first element is the invocation input
    pub data: Vec<serde_json::Value>,
}

/// Errors decoding a message body into an invocation payload
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("Message body is not a valid envelope: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Envelope payload array is empty")]
    EmptyPayload,
}

/// Extract the invocation input from a message body
pub fn extract_invocation_payload(body: &[u8]) -> Result<Bytes, EnvelopeError> {
    let envelope: MessageEnvelope = serde_json::from_slice(body)?;

    let first = envelope
        .data
        .into_iter()
        .next()
        .ok_or(EnvelopeError::EmptyPayload)?;

    Ok(Bytes::from(serde_json::to_vec(&first)?))
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
