//! # Protocol Errors
//!
//! One error enum per codec plus the umbrella [`ProtocolError`].

use crate::domain::declaration::DeclarationType;
use shared_crypto::CryptoError;
use shared_types::EnvelopeError;
use thiserror::Error;

/// Errors from the checksummed address codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    /// Encoded string is not 40 characters long
    #[error("Invalid address length: {0}")]
    InvalidLength(usize),

    /// Byte outside printable ASCII [33, 126]
    #[error("Invalid character in address: {0:#04x}")]
    InvalidCharacter(u8),

    /// Both lowercase and uppercase letters present
    #[error("Address mixes lowercase and uppercase")]
    MixedCase,

    /// Character not part of the 32-symbol alphabet
    #[error("Character not in alphabet: {0:?}")]
    NotInAlphabet(char),

    /// Polymod over the 40 groups is not 1
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// Bit regrouping asked for groups outside 1..=8
    #[error("Invalid bit group size: {from} to {to}")]
    InvalidGroupSize { from: u8, to: u8 },

    /// Unpadded regrouping left non-zero or oversized bits
    #[error("Invalid incomplete group")]
    InvalidPadding,

    /// Tag and payload did not regroup into 34 groups
    #[error("Invalid decoded length: {0} groups")]
    InvalidDataLength(usize),

    /// Payload is not 20 bytes
    #[error("Invalid address payload length: {0}")]
    InvalidPayloadLength(usize),

    /// Type tag outside the known address types
    #[error("Unknown address type: {0}")]
    UnknownType(u8),
}

/// Errors from the canonical byte encoder.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StreamError {
    /// A counted list does not fit its one-byte count
    #[error("List too long: {0} elements, maximum 255")]
    ListTooLong(usize),

    /// Declaration kind without a binary layout
    #[error("Declaration {0:?} has no binary encoding")]
    UnsupportedDeclaration(DeclarationType),
}

/// Errors from the fixed-point amount codec.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AmountError {
    /// NaN or infinite
    #[error("Amount is not finite: {0}")]
    NotFinite(f64),

    /// Decimal amount below zero
    #[error("Amount is negative: {0}")]
    Negative(f64),

    /// Decimal amount does not fit in i64 units
    #[error("Amount out of range: {0}")]
    OutOfRange(f64),

    /// Unit count below zero
    #[error("Amount units are negative: {0}")]
    NegativeUnits(i64),
}

/// Errors from the currency symbol codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CurrencyError {
    /// Symbol is not exactly three uppercase ASCII letters
    #[error("Invalid currency symbol: {0:?}")]
    InvalidSymbol(String),

    /// Code outside [0, 17575]
    #[error("Currency code out of range: {0}")]
    OutOfRange(i16),
}

/// Protocol-level errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProtocolError {
    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Currency(#[from] CurrencyError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// Secret is not 32 bytes of base64
    #[error("Invalid secret: {0}")]
    InvalidSecret(String),

    /// Declaration type code outside the known kinds
    #[error("Unknown declaration type: {0}")]
    UnknownDeclaration(u8),

    /// A wire transaction without an expiry
    #[error("Transaction has no expiry")]
    MissingExpiry,

    /// The hash sent with a transaction does not match its contents
    #[error("Transaction hash mismatch: expected {expected}, computed {actual}")]
    HashMismatch { expected: String, actual: String },

    /// Message bytes cannot be carried by the text-only wire field
    #[error("Transaction message is not valid UTF-8: {0}")]
    InvalidMessage(String),

    /// Transport collaborator failed
    #[error("Transport failed: {0}")]
    Transport(String),

    /// Key storage collaborator failed
    #[error("Key storage failed: {0}")]
    KeyStore(String),
}
