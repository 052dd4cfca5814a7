//! Metrics collection and exposition.
//!
//! # Metrics
//! - `contract_operations_total` (counter): operations by name and outcome
//! - `contract_operation_duration_seconds` (histogram): latency per operation
//! - `contract_sync_writes_total` (counter): syncs that overwrote the store

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome and latency of an API operation.
pub fn record_operation(operation: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "contract_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("contract_operation_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

/// Record a sync that corrected the store.
pub fn record_sync_write() {
    metrics::counter!("contract_sync_writes_total").increment(1);
}
