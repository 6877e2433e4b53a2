//! # Domain Layer
//!
//! Pure codecs and value types with no I/O.
//! This is the inner layer of the hexagonal architecture.

pub mod address;
pub mod address32;
pub mod amount;
pub mod bytestream;
pub mod declaration;
pub mod errors;
pub mod keys;
pub mod transaction;
