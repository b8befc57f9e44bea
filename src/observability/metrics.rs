//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): dispatched requests by method, outcome
//! - `router_request_duration_seconds` (histogram): dispatch latency
//! - `router_registered_routes` (gauge): patterns in the dispatch table

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

/// Record one dispatched request.
///
/// `method` must come from a fixed set; every distinct value is a new series.
pub fn record_dispatch(method: &'static str, outcome: &'static str, start: Instant) {
    let labels = [("method", method), ("outcome", outcome)];
    metrics::counter!("router_requests_total", &labels).increment(1);
    metrics::histogram!("router_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record the size of the dispatch table after setup.
pub fn record_registered(count: usize) {
    metrics::gauge!("router_registered_routes").set(count as f64);
}
