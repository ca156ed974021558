//! Prometheus-style metrics for the Hush node's subsystems.
//!
//! All metrics follow the naming convention `hn_<component>_<metric>_<unit>`.
//! The registration API is real; binding a scrape endpoint to serve
//! `encode_metrics()` over HTTP is left to the operator's own process
//! supervisor.

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry.
    pub static ref REGISTRY: Registry = Registry::new();

    // -- Mempool -------------------------------------------------------

    /// Transactions currently sitting in the mempool.
    pub static ref MEMPOOL_SIZE: Gauge = Gauge::new(
        "hn_mempool_transactions_pending",
        "Number of pending transactions in the mempool"
    ).expect("metric creation failed");

    /// Transactions accepted into the mempool.
    pub static ref TRANSACTIONS_RECEIVED: Counter = Counter::new(
        "hn_mempool_transactions_received_total",
        "Total transactions accepted into the mempool"
    ).expect("metric creation failed");

    /// Transactions rejected by the idempotency gate.
    pub static ref IDEMPOTENCY_REJECTS: Counter = Counter::new(
        "hn_idempotency_rejects_total",
        "Total transactions rejected as duplicates by the idempotency gate"
    ).expect("metric creation failed");

    // -- Block production ------------------------------------------------

    /// Blocks produced and committed.
    pub static ref BLOCKS_PRODUCED: Counter = Counter::new(
        "hn_block_assembler_blocks_produced_total",
        "Total number of blocks assembled and committed"
    ).expect("metric creation failed");

    /// Time spent assembling and committing a block.
    pub static ref BLOCK_PRODUCTION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "hn_block_assembler_production_duration_seconds",
            "Time spent assembling and committing a block"
        ).buckets(exponential_buckets(0.001, 2.0, 15).expect("valid bucket params"))
    ).expect("metric creation failed");

    // -- Indexing ----------------------------------------------------------

    /// Transactions indexed by the dispatcher.
    pub static ref TRANSACTIONS_INDEXED: Counter = Counter::new(
        "hn_indexing_transactions_indexed_total",
        "Total transactions dispatched to index strategies"
    ).expect("metric creation failed");

    /// Indexing failures, by strategy.
    pub static ref INDEXING_FAILURES: CounterVec = CounterVec::new(
        Opts::new("hn_indexing_failures_total", "Indexing failures by strategy"),
        &["strategy"]
    ).expect("metric creation failed");

    // -- Cryptography --------------------------------------------------

    /// Signature verifications, by outcome.
    pub static ref SIGNATURE_VERIFICATIONS: CounterVec = CounterVec::new(
        Opts::new("hn_signature_verifications_total", "Total signature verifications"),
        &["result"]
    ).expect("metric creation failed");

    /// Zero-knowledge proof verifications, by outcome.
    pub static ref ZK_VERIFICATIONS: CounterVec = CounterVec::new(
        Opts::new("hn_zk_verifications_total", "Total reaction proof verifications"),
        &["result"]
    ).expect("metric creation failed");

    // -- Errors --------------------------------------------------------

    /// Errors by component and kind, for the dead-letter topic.
    pub static ref COMPONENT_ERRORS: CounterVec = CounterVec::new(
        Opts::new("hn_component_errors_total", "Errors by component and kind"),
        &["component", "kind"]
    ).expect("metric creation failed");
}

/// Handle for the registered metrics set.
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// # Errors
///
/// Returns [`TelemetryError::MetricsInit`] if a metric with a
/// conflicting name is already registered.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(MEMPOOL_SIZE.clone()),
        Box::new(TRANSACTIONS_RECEIVED.clone()),
        Box::new(IDEMPOTENCY_REJECTS.clone()),
        Box::new(BLOCKS_PRODUCED.clone()),
        Box::new(BLOCK_PRODUCTION_DURATION.clone()),
        Box::new(TRANSACTIONS_INDEXED.clone()),
        Box::new(INDEXING_FAILURES.clone()),
        Box::new(SIGNATURE_VERIFICATIONS.clone()),
        Box::new(ZK_VERIFICATIONS.clone()),
        Box::new(COMPONENT_ERRORS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics in the Prometheus text exposition format.
///
/// # Errors
///
/// Returns [`TelemetryError::MetricsInit`] if encoding fails.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard that records elapsed seconds into a histogram on drop.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start timing against the given histogram.
    #[must_use]
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
