//! Prometheus metrics for solkit
//!
//! - Cache lookups by cache name and result (hit/miss)
//! - Transaction outcomes (success/error)
//! - Transaction latency histogram

use crate::error::{AppError, AppResult};
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

/// Metrics registry shared by the caches and the transaction tracker
pub struct Metrics {
    /// Prometheus registry
    registry: Registry,
    /// Cache lookups, labelled by cache and result
    pub cache_lookups: IntCounterVec,
    /// Finished transactions, labelled by outcome
    pub transactions: IntCounterVec,
    /// Time from `execute` to a terminal state (in milliseconds)
    pub transaction_latency: Histogram,
}

impl Metrics {
    /// Create a new metrics registry with all metrics registered
    pub fn new() -> Self {
        let registry = Registry::new();

        let cache_lookups = IntCounterVec::new(
            Opts::new("solkit_cache_lookups_total", "TTL cache lookups"),
            &["cache", "result"],
        )
        .expect("Failed to create cache_lookups counter");
        registry
            .register(Box::new(cache_lookups.clone()))
            .expect("Failed to register cache_lookups");

        let transactions = IntCounterVec::new(
            Opts::new(
                "solkit_transactions_total",
                "Transactions that reached a terminal state",
            ),
            &["outcome"],
        )
        .expect("Failed to create transactions counter");
        registry
            .register(Box::new(transactions.clone()))
            .expect("Failed to register transactions");

        let transaction_latency = Histogram::with_opts(
            HistogramOpts::new(
                "solkit_transaction_latency_ms",
                "Submission-to-terminal latency in milliseconds",
            )
            .buckets(vec![
                100.0, 250.0, 500.0, 1_000.0, 2_500.0, 5_000.0, 10_000.0, 30_000.0, 60_000.0,
            ]),
        )
        .expect("Failed to create transaction_latency histogram");
        registry
            .register(Box::new(transaction_latency.clone()))
            .expect("Failed to register transaction_latency");

        Self {
            registry,
            cache_lookups,
            transactions,
            transaction_latency,
        }
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_cache_lookup(&self, cache: &str, hit: bool) {
        let result = if hit { "hit" } else { "miss" };
        self.cache_lookups.with_label_values(&[cache, result]).inc();
    }

    pub fn record_transaction(&self, outcome: &str, elapsed_ms: f64) {
        self.transactions.with_label_values(&[outcome]).inc();
        self.transaction_latency.observe(elapsed_ms);
    }

    /// Render all metrics in the Prometheus text format
    pub fn gather(&self) -> AppResult<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| AppError::Internal(format!("Failed to encode metrics: {}", e)))?;

        String::from_utf8(buffer)
            .map_err(|e| AppError::Internal(format!("Metrics are not valid UTF-8: {}", e)))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
