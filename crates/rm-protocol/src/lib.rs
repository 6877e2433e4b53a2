//! # Republic of Miner Protocol Core
//!
//! Canonical binary representation of addresses and transactions, their
//! hashes, and authorization of a transaction by a secp256k1 key in a way a
//! node can verify.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Codecs and value types, no I/O
//! - **Ports Layer** (`ports/`): Wallet/explorer APIs and the transport and
//!   key storage they depend on
//! - **Adapters Layer** (`adapters/`): Wire conversions, request
//!   correlation, in-memory key storage
//! - **Service Layer** (`service.rs`): Wires domain logic to ports
//!
//! ## Wire Compatibility
//!
//! Byte order, field order, the address checksum polynomial and the
//! signature encoding are fixed by deployed nodes. Any drift breaks
//! interoperability, so every codec is pinned by reference vectors in its
//! tests.
//!
//! ## Signing
//!
//! A transaction is serialized canonically and hashed with keccak-256. The
//! signer prepends the network domain (`republicofminer.com`) to the hash and
//! signs deterministically (RFC 6979) with low-S normalization.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::convert::{
    declaration_from_api, declaration_to_api, signature_from_api, signature_to_api,
    transaction_from_api, transaction_to_api,
};
pub use adapters::correlation::{Dispatch, FrameTransport, PendingRequests};
pub use adapters::keystore::InMemoryKeyStore;
pub use config::ProtocolConfig;
pub use domain::address::{Address, AddressType};
pub use domain::amount::{Amount, Currency, UNITS_PER_COIN};
pub use domain::bytestream::{ByteStream, ByteStreamer};
pub use domain::declaration::{Declaration, DeclarationType, SecretRevelation, SECRET_SIZE};
pub use domain::errors::{AddressError, AmountError, CurrencyError, ProtocolError, StreamError};
pub use domain::keys::{
    address_from_public_key, check_address, sign_transaction, verify_transaction, NETWORK,
};
pub use domain::transaction::{Transaction, TransactionMessage, TxInput, TxInputOutput, TxOutput};
pub use ports::inbound::{ExplorerApi, WalletApi};
pub use ports::outbound::{KeyStore, KeyStoreError, Transport, TransportError};
pub use service::{ExplorerClient, WalletService};
