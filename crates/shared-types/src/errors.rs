//! # Error Types
//!
//! Errors raised while building or reading wire envelopes.

use thiserror::Error;

/// Errors that can occur when encoding or decoding envelopes and payloads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// JSON could not be produced or parsed.
    #[error("Malformed JSON: {0}")]
    Json(String),

    /// The node answered with a non-zero result code.
    #[error("Request failed: {kind} returned result code {result}")]
    RequestFailed { kind: String, result: u8 },

    /// The response type does not answer the request that was sent.
    #[error("Unexpected response type: expected {expected}, got {actual}")]
    UnexpectedType { expected: String, actual: String },

    /// No payload decoder is registered for this type name.
    #[error("Unknown payload type: {0}")]
    UnknownType(String),
}

impl From<serde_json::Error> for EnvelopeError {
    fn from(err: serde_json::Error) -> Self {
        EnvelopeError::Json(err.to_string())
    }
}
