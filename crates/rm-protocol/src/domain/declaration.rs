//! # Declarations
//!
//! Statements attached to a transaction. Only secret revelations have a
//! binary layout today; the other kinds are recognised but refuse to
//! serialize.

use crate::domain::bytestream::{ByteStream, ByteStreamer};
use crate::domain::errors::{ProtocolError, StreamError};
use shared_crypto::{keccak256, Hash256};
use std::fmt;

/// Secret size in bytes.
pub const SECRET_SIZE: usize = 32;

/// Declaration kind, as written in the kind byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DeclarationType {
    MultiSignature = 0x0,
    HashLock = 0x1,
    Secret = 0x2,
    TimeLock = 0x3,
    VendingMachine = 0x4,
    LimitOrder = 0x5,
    DelegatedAccount = 0x6,
}

impl DeclarationType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for DeclarationType {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0x0 => Ok(DeclarationType::MultiSignature),
            0x1 => Ok(DeclarationType::HashLock),
            0x2 => Ok(DeclarationType::Secret),
            0x3 => Ok(DeclarationType::TimeLock),
            0x4 => Ok(DeclarationType::VendingMachine),
            0x5 => Ok(DeclarationType::LimitOrder),
            0x6 => Ok(DeclarationType::DelegatedAccount),
            other => Err(ProtocolError::UnknownDeclaration(other)),
        }
    }
}

/// A revealed secret and its keccak-256 hash.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SecretRevelation {
    secret: [u8; SECRET_SIZE],
    hash: Hash256,
}

impl SecretRevelation {
    pub fn new(secret: [u8; SECRET_SIZE]) -> Self {
        Self {
            hash: keccak256(&secret),
            secret,
        }
    }

    /// Build from exactly 32 bytes.
    pub fn from_slice(secret: &[u8]) -> Result<Self, ProtocolError> {
        let secret: [u8; SECRET_SIZE] = secret.try_into().map_err(|_| {
            ProtocolError::InvalidSecret(format!(
                "expected {SECRET_SIZE} bytes, got {}",
                secret.len()
            ))
        })?;
        Ok(Self::new(secret))
    }

    /// Build from standard base64.
    pub fn from_base64(encoded: &str) -> Result<Self, ProtocolError> {
        let hash = Hash256::from_base64(encoded)
            .map_err(|e| ProtocolError::InvalidSecret(e.to_string()))?;
        Ok(Self::new(*hash.as_bytes()))
    }

    pub fn secret(&self) -> &[u8; SECRET_SIZE] {
        &self.secret
    }

    /// keccak256(secret).
    pub fn hash(&self) -> &Hash256 {
        &self.hash
    }

    pub fn to_base64(&self) -> String {
        Hash256::new(self.secret).to_base64()
    }
}

impl ByteStreamer for SecretRevelation {
    fn write_to(&self, stream: &mut ByteStream) -> Result<(), StreamError> {
        stream.write_bytes(&self.secret);
        Ok(())
    }
}

impl fmt::Debug for SecretRevelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretRevelation")
            .field("hash", &self.hash)
            .finish_non_exhaustive()
    }
}

/// Transaction declaration.
///
/// Kinds without a payload are placeholders: they convert and compare but
/// fail to serialize with [`StreamError::UnsupportedDeclaration`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Declaration {
    MultiSignature,
    HashLock,
    Secret(SecretRevelation),
    TimeLock,
    VendingMachine,
    LimitOrder,
    DelegatedAccount,
}

impl Declaration {
    pub fn kind(&self) -> DeclarationType {
        match self {
            Declaration::MultiSignature => DeclarationType::MultiSignature,
            Declaration::HashLock => DeclarationType::HashLock,
            Declaration::Secret(_) => DeclarationType::Secret,
            Declaration::TimeLock => DeclarationType::TimeLock,
            Declaration::VendingMachine => DeclarationType::VendingMachine,
            Declaration::LimitOrder => DeclarationType::LimitOrder,
            Declaration::DelegatedAccount => DeclarationType::DelegatedAccount,
        }
    }

    /// The placeholder declaration of `kind`; `Secret` has none.
    pub fn placeholder(kind: DeclarationType) -> Option<Self> {
        match kind {
            DeclarationType::MultiSignature => Some(Declaration::MultiSignature),
            DeclarationType::HashLock => Some(Declaration::HashLock),
            DeclarationType::Secret => None,
            DeclarationType::TimeLock => Some(Declaration::TimeLock),
            DeclarationType::VendingMachine => Some(Declaration::VendingMachine),
            DeclarationType::LimitOrder => Some(Declaration::LimitOrder),
            DeclarationType::DelegatedAccount => Some(Declaration::DelegatedAccount),
        }
    }
}

impl From<SecretRevelation> for Declaration {
    fn from(secret: SecretRevelation) -> Self {
        Declaration::Secret(secret)
    }
}

impl ByteStreamer for Declaration {
    fn write_to(&self, stream: &mut ByteStream) -> Result<(), StreamError> {
        match self {
            Declaration::Secret(secret) => {
                stream.write_byte(self.kind().code());
                secret.write_to(stream)
            }
            Declaration::MultiSignature
            | Declaration::HashLock
            | Declaration::TimeLock
            | Declaration::VendingMachine
            | Declaration::LimitOrder
            | Declaration::DelegatedAccount => Err(StreamError::UnsupportedDeclaration(self.kind())),
        }
    }
}
