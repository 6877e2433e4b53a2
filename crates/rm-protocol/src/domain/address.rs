//! # Addresses
//!
//! Typed account address: a type tag, a 20-byte payload and its cached
//! 40-character encoding.

use crate::domain::address32::{self, PAYLOAD_SIZE};
use crate::domain::bytestream::{ByteStream, ByteStreamer};
use crate::domain::errors::{AddressError, StreamError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Kind of account an address designates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AddressType {
    Ecdsa = 0x1,
    MultiSignatureEcdsa = 0x2,
    HashLock = 0x3,
    TimeLock = 0x4,
    VendingMachine = 0x5,
    LimitOrder = 0x6,
    DelegatedAccount = 0x7,
}

impl AddressType {
    /// Wire tag.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for AddressType {
    type Error = AddressError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0x1 => Ok(AddressType::Ecdsa),
            0x2 => Ok(AddressType::MultiSignatureEcdsa),
            0x3 => Ok(AddressType::HashLock),
            0x4 => Ok(AddressType::TimeLock),
            0x5 => Ok(AddressType::VendingMachine),
            0x6 => Ok(AddressType::LimitOrder),
            0x7 => Ok(AddressType::DelegatedAccount),
            other => Err(AddressError::UnknownType(other)),
        }
    }
}

/// Account address.
///
/// Always holds a valid encoding: construction either encodes the payload or
/// fully validates the text.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Address {
    kind: AddressType,
    payload: [u8; PAYLOAD_SIZE],
    encoded: String,
}

impl Address {
    /// Build an address from its parts.
    pub fn new(kind: AddressType, payload: [u8; PAYLOAD_SIZE]) -> Self {
        let encoded = address32::encode_payload(kind.code(), &payload);
        Self {
            kind,
            payload,
            encoded,
        }
    }

    /// Build an address from a payload slice of exactly 20 bytes.
    pub fn from_slice(kind: AddressType, payload: &[u8]) -> Result<Self, AddressError> {
        let payload: [u8; PAYLOAD_SIZE] = payload
            .try_into()
            .map_err(|_| AddressError::InvalidPayloadLength(payload.len()))?;
        Ok(Self::new(kind, payload))
    }

    /// Parse and validate the 40-character form.
    ///
    /// Uppercase input is accepted and normalized to lowercase.
    pub fn decode(encoded: &str) -> Result<Self, AddressError> {
        let (code, payload) = address32::decode(encoded)?;
        let kind = AddressType::try_from(code)?;
        Self::from_slice(kind, &payload)
    }

    pub fn kind(&self) -> AddressType {
        self.kind
    }

    pub fn payload(&self) -> &[u8; PAYLOAD_SIZE] {
        &self.payload
    }

    /// Lowercase 40-character encoding.
    pub fn as_str(&self) -> &str {
        &self.encoded
    }
}

impl ByteStreamer for Address {
    fn write_to(&self, stream: &mut ByteStream) -> Result<(), StreamError> {
        stream.write_byte(self.kind.code());
        stream.write_bytes(&self.payload);
        Ok(())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({:?}, {})", self.kind, self.encoded)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encoded)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Address::decode(&encoded).map_err(serde::de::Error::custom)
    }
}
