//! Metrics collection and exposition.
//!
//! # Metrics
//! - `server_requests_total` (counter): requests by method, status
//! - `server_request_duration_seconds` (histogram): latency distribution
//! - `server_live_sessions` (gauge): sessions alive after each sweep

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its scrape endpoint.
///
/// Failure is logged, not fatal: the server runs fine without an exporter,
/// metric updates simply go nowhere.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the number of live sessions after a sweep.
pub fn record_live_sessions(count: usize) {
    metrics::gauge!("server_live_sessions").set(count as f64);
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("server_requests_total", &labels).increment(1);
    metrics::histogram!("server_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}
