//! # Republic of Miner Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Codec, hashing and signing benchmarks
//! └── src/integration/  # Wallet ↔ node flows over the frame transport
//!     ├── fixtures.rs   # Simulated node and captured wire data
//!     └── flows.rs      # End-to-end scenarios
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rm-tests
//! cargo bench -p rm-tests
//! ```

pub mod integration;
