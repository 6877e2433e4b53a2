//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Private key bytes are not a valid secp256k1 scalar (zero or >= n)
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Public key bytes are not a valid SEC1 point
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid signature length
    #[error("Invalid signature length: expected {expected}, got {actual}")]
    InvalidSignatureLength {
        /// Expected signature length in bytes
        expected: usize,
        /// Actual signature length in bytes
        actual: usize,
    },

    /// Signature scalars are out of range
    #[error("Invalid signature")]
    InvalidSignature,

    /// The overflow flag byte does not describe the encoded scalars
    #[error("Signature flag mismatch: expected {expected:#04x}, got {actual:#04x}")]
    SignatureFlagMismatch {
        /// Flags implied by r and s
        expected: u8,
        /// Flag byte found on the wire
        actual: u8,
    },

    /// A scalar needed 33 bytes (explicit sign byte), which the 65-byte
    /// encoding cannot carry
    #[error("Scalar overflow: 33-byte big-endian representation")]
    ScalarOverflow,

    /// A scalar longer than 33 bytes
    #[error("Invalid scalar length: {0} bytes")]
    InvalidScalarLength(usize),

    /// The prehash signer rejected its input
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Binary-to-text decoding failed
    #[error("Invalid base64: {0}")]
    InvalidBase64(String),
}
