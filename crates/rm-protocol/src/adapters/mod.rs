//! # Adapters Module
//!
//! Infrastructure adapters implementing the ports, plus the conversions
//! between wire payloads and the domain model.

pub mod convert;
pub mod correlation;
pub mod keystore;
