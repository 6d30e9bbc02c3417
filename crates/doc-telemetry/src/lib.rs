//! # Document Telemetry
//!
//! Structured logging for CoreDocument nodes.
//!
//! Every crate in the workspace logs through `tracing` macros; this crate owns
//! the one-time subscriber installation so binaries and test suites share the
//! same output format.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use doc_telemetry::{init_tracing, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_tracing(&config).expect("Failed to init tracing");
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `coredoc` | Service name attached to the startup log |
//! | `CD_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `CD_JSON_LOGS` | `false` | Emit JSON lines instead of pretty output |
//! | `CD_NETWORK` | `testnet` | Network name attached to the startup log |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{init_test_tracing, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid log filter {filter:?}: {reason}")]
    InvalidFilter { filter: String, reason: String },
}
