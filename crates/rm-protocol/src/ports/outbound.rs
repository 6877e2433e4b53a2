//! # Outbound Ports (Driven Ports / SPI)
//!
//! Collaborators this crate depends on but does not implement itself: the
//! request/response transport to a node and local private key storage.

use serde_json::Value;
use shared_types::{RequestEnvelope, ResponseEnvelope};
use thiserror::Error;
use zeroize::Zeroizing;

/// Error from transport operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The connection closed before the response arrived
    #[error("Connection closed")]
    ConnectionClosed,

    /// The request could not be written
    #[error("Send failed: {0}")]
    Send(String),

    /// A response was routed to the wrong requester
    #[error("Correlation id mismatch: expected {expected}, got {actual}")]
    CridMismatch { expected: String, actual: String },
}

/// Error from key storage operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyStoreError {
    /// The store cannot be read or written
    #[error("Key store unavailable: {0}")]
    Unavailable(String),

    /// The stored material is not a usable key
    #[error("Stored key is corrupted: {0}")]
    Corrupted(String),
}

/// Request/response channel to a node.
///
/// Implementations send the envelope and resolve with the response carrying
/// the same correlation id. Notifications are not returned here.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and wait for its response.
    ///
    /// # Errors
    /// * `TransportError::ConnectionClosed` - Connection lost while waiting
    /// * `TransportError::Send` - Request could not be written
    /// * `TransportError::CridMismatch` - Response answers another request
    async fn send_request(
        &self,
        request: RequestEnvelope<Value>,
    ) -> Result<ResponseEnvelope, TransportError>;
}

/// Local storage for the wallet's private key.
#[async_trait::async_trait]
pub trait KeyStore: Send + Sync {
    /// Load the stored 32-byte private key, if any.
    async fn load_private_key(&self) -> Result<Option<Zeroizing<[u8; 32]>>, KeyStoreError>;

    /// Persist a 32-byte private key, replacing any previous one.
    async fn save_private_key(&self, key: &[u8; 32]) -> Result<(), KeyStoreError>;
}
