//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that wallet and explorer callers use
//! - **Outbound (Driven)**: Transport and key storage this crate needs

pub mod inbound;
pub mod outbound;
