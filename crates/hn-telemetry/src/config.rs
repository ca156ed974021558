//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for structured logging.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line.
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error).
    pub log_level: String,

    /// Whether to enable JSON-formatted logs (for log shippers) instead
    /// of the human-readable console format.
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "hush-node".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `HN_SERVICE_NAME`: service name (default: `hush-node`)
    /// - `HN_LOG_LEVEL` or `RUST_LOG`: log level (default: `info`)
    /// - `HN_JSON_LOGS`: emit JSON logs (default: `false`)
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("HN_SERVICE_NAME").unwrap_or_else(|_| "hush-node".to_string()),

            log_level: env::var("HN_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("HN_JSON_LOGS")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
        }
    }
}
