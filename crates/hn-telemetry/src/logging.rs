//! Structured logging setup.
//!
//! Every component logs through `tracing` at the granularity its role
//! calls for: `debug!` for routine events, `warn!` for recoverable
//! anomalies (duplicate detection, replay), `error!` for
//! `IndexingFailed`/`PersistenceUnavailable`. This module just wires the
//! subscriber; the fields themselves (`block_index`, `tx_id`,
//! `nullifier`, ...) are attached at each call site.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::{TelemetryConfig, TelemetryError};

/// Handle kept alive for the lifetime of the process; logging has no
/// teardown work, but the guard gives callers a consistent RAII shape
/// alongside `MetricsHandle`.
pub struct LoggingGuard {
    _private: (),
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError::Config`] if the log level filter is
/// malformed, or [`TelemetryError::SubscriberInit`] if a global
/// subscriber was already installed.
pub fn init_logging(config: &TelemetryConfig) -> Result<LoggingGuard, TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Config(e.to_string()))?;

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter.and_then(fmt_layer))
            .try_init()
            .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "structured logging initialized"
    );

    Ok(LoggingGuard { _private: () })
}

/// Log a block-related event with standard fields.
#[macro_export]
macro_rules! log_block_event {
    ($level:ident, $msg:expr, $block_index:expr, $block_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            block_index = %$block_index,
            block_id = %$block_id,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a transaction-related event with standard fields.
#[macro_export]
macro_rules! log_tx_event {
    ($level:ident, $msg:expr, $tx_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            tx_id = %$tx_id,
            $($($field)*,)?
            $msg
        )
    };
}

#[cfg(test)]
mod tests {
    // A second `try_init()` in-process would fail since the global
    // subscriber can only be installed once; exercised by the
    // integration tests instead.
}
