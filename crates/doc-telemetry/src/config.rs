//! Telemetry configuration from environment variables.

use std::env;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name reported in the startup log
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error or a full directive)
    pub log_level: String,

    /// Emit JSON formatted logs
    pub json_logs: bool,

    /// Include file and line in log lines
    pub with_source_location: bool,

    /// Network identifier (testnet, mainnet, devnet)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "coredoc".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_source_location: false,
            network: "testnet".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// JSON output defaults to on inside containers.
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "coredoc".to_string()),

            log_level: env::var("CD_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("CD_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            with_source_location: env::var("CD_LOG_SOURCE")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),

            network: env::var("CD_NETWORK").unwrap_or_else(|_| "testnet".to_string()),
        }
    }

    /// Quiet configuration used by test suites.
    pub fn for_tests() -> Self {
        Self {
            service_name: "coredoc-tests".to_string(),
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()),
            ..Self::default()
        }
    }
}
