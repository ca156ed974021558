//! # Hush Node Telemetry
//!
//! Structured logging and Prometheus-style metrics shared by every
//! crate in the node. Distributed tracing export and a bound scrape
//! endpoint are out of scope for a single-node deployment — the
//! registration API is real, wiring it to a collector is an operator
//! concern.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hn_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! let _guard = init_telemetry(config).expect("failed to init telemetry");
//! // logs and metrics are live for the lifetime of `_guard`
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HN_SERVICE_NAME` | `hush-node` | Service name attached to log lines |
//! | `HN_LOG_LEVEL` or `RUST_LOG` | `info` | Log level filter |
//! | `HN_JSON_LOGS` | `false` | Emit JSON logs instead of console format |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::LoggingGuard;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, BLOCKS_PRODUCED, BLOCK_PRODUCTION_DURATION,
    COMPONENT_ERRORS, IDEMPOTENCY_REJECTS, INDEXING_FAILURES, MEMPOOL_SIZE,
    SIGNATURE_VERIFICATIONS, TRANSACTIONS_INDEXED, TRANSACTIONS_RECEIVED, ZK_VERIFICATIONS,
};

use thiserror::Error;

/// Telemetry initialization errors.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global tracing subscriber was already installed.
    #[error("failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    /// Failed to register Prometheus metrics.
    #[error("failed to initialize metrics: {0}")]
    MetricsInit(String),

    /// Invalid telemetry configuration.
    #[error("invalid telemetry configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics for the process.
///
/// Returns a guard that must be held for the lifetime of the
/// application; dropping it is harmless, it carries no teardown beyond
/// logging the shutdown.
///
/// # Errors
///
/// Returns [`TelemetryError`] if the subscriber or metrics registry
/// fails to initialize.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics_handle = register_metrics()?;
    let logging_guard = logging::init_logging(&config)?;

    Ok(TelemetryGuard {
        _logging: logging_guard,
        _metrics: metrics_handle,
    })
}

/// Guard that keeps telemetry active. Drop to release.
pub struct TelemetryGuard {
    _logging: LoggingGuard,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("shutting down telemetry");
    }
}

/// Convenience macro for recording a metric increment, with or without
/// label values.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_service_name() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "hush-node");
    }
}
