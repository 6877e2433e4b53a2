//! # Shared Types Crate
//!
//! Wire-level types shared by the protocol core, its services and tools:
//! the request/response envelope and the JSON payloads of the node API.
//!
//! ## Design Principles
//!
//! - **Wire Fidelity**: Field names and shapes match the node's JSON exactly
//!   (PascalCase keys, base64 binary, decimal amounts).
//! - **No Protocol Logic**: Validation and hashing belong to `rm-protocol`;
//!   everything here is plain data.
//! - **Correlation by crid**: Responses are matched to requests by the
//!   envelope's `crid`; an empty `crid` marks a push notification.

pub mod envelope;
pub mod errors;
pub mod ipc;

pub use envelope::{CridGenerator, RequestEnvelope, ResponseEnvelope, RESULT_OK};
pub use errors::*;
pub use ipc::*;
