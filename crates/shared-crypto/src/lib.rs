//! # Shared Crypto - Protocol Cryptographic Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | Keccak-256, SHA-256 | Transaction/secret hashes, text digests |
//! | `ecdsa` | secp256k1 | Transaction authorization |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic nonces, low-S normalization
//! - **Keys**: private key material is zeroized when exported through base64

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;

// Re-exports
pub use ecdsa::{verify, PrivateKey, PublicKey, Signature};
pub use errors::CryptoError;
pub use hashing::{double_sha256, keccak256, keccak256_many, sha256, Hash256, HASH_SIZE};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
