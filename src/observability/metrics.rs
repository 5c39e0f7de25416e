//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_router_requests_total` (counter): routed requests by status
//! - `edge_router_request_duration_seconds` (histogram): routing latency
//! - `edge_router_upstream_fetches_total` (counter): attempts by outcome
//! - `edge_router_cache_lookups_total` (counter): hits/misses by resource
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a routed request.
pub fn record_request(status: u16, start: Instant) {
    counter!("edge_router_requests_total", "status" => status.to_string()).increment(1);
    histogram!("edge_router_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record the outcome of an upstream attempt: `success`, `retry` or `failure`.
pub fn record_upstream_fetch(outcome: &'static str) {
    counter!("edge_router_upstream_fetches_total", "outcome" => outcome).increment(1);
}

/// Record a resource cache lookup.
pub fn record_cache_lookup(resource: &'static str, result: &'static str) {
    counter!(
        "edge_router_cache_lookups_total",
        "resource" => resource,
        "result" => result
    )
    .increment(1);
}
