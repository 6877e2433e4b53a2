//! # Hashing
//!
//! Keccak-256 for transaction and secret hashes, address derivation.
//! Double SHA-256 for digests of free-form text.

use crate::CryptoError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::Sha256;
use sha3::{Digest, Keccak256};
use std::fmt;

/// Hash output size in bytes.
pub const HASH_SIZE: usize = 32;

/// 256-bit hash output.
///
/// Rendered as standard base64 wherever it crosses a text boundary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hash256([u8; HASH_SIZE]);

impl Hash256 {
    /// Wrap raw hash bytes.
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parse a hash from a byte slice of exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; HASH_SIZE] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: HASH_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self(bytes))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Standard base64 rendering.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    /// Parse from standard base64.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let decoded = STANDARD
            .decode(encoded)
            .map_err(|e| CryptoError::InvalidBase64(e.to_string()))?;
        Self::from_slice(&decoded)
    }
}

impl From<[u8; HASH_SIZE]> for Hash256 {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_base64())
    }
}

/// Keccak-256 (legacy padding, not NIST SHA3-256).
pub fn keccak256(data: &[u8]) -> Hash256 {
    keccak256_many(&[data])
}

/// Keccak-256 over several inputs, as if concatenated.
pub fn keccak256_many(inputs: &[&[u8]]) -> Hash256 {
    let mut hasher = Keccak256::new();
    for input in inputs {
        hasher.update(input);
    }
    Hash256(hasher.finalize().into())
}

/// Single SHA-256.
pub fn sha256(data: &[u8]) -> Hash256 {
    Hash256(Sha256::digest(data).into())
}

/// Double SHA-256, `sha256(sha256(data))`.
pub fn double_sha256(data: &[u8]) -> Hash256 {
    sha256(sha256(data).as_bytes())
}
