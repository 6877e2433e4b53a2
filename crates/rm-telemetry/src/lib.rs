//! # Republic of Miner Telemetry
//!
//! Structured logging for the workspace's tools and services, built on
//! `tracing` and `tracing-subscriber`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rm_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(TelemetryConfig::for_service("rm-keytool")).ok();
//!     tracing::info!("started");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RM_SERVICE_NAME` | `republicofminer` | Service name in events |
//! | `RM_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` also honoured) |
//! | `RM_JSON_LOGS` | `false` | JSON output instead of plain text |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Initialize logging for the process.
///
/// Fails if the level filter does not parse or a subscriber is already set.
pub fn init_telemetry(config: TelemetryConfig) -> Result<(), TelemetryError> {
    init_logging(&config)?;
    tracing::info!(service = %config.service_name, "Telemetry initialized");
    Ok(())
}
