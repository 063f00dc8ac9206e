//! Metrics collection and exposition.
//!
//! # Metrics
//! - `blm_requests_total` (counter): requests by method, status
//! - `blm_request_duration_seconds` (histogram): latency distribution
//! - `blm_auth_rejections_total` (counter): rejected requests by envelope code
//! - `blm_shutdown_total` (counter): shutdown outcome (finished, timed_out)
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   exporter every call is a no-op
//! - The Prometheus exporter serves its own listener, separate from the API

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "blm_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("blm_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_auth_rejection(code: u32) {
    metrics::counter!("blm_auth_rejections_total", "code" => format!("{code:#06x}")).increment(1);
}

pub fn record_shutdown(outcome: &'static str) {
    metrics::counter!("blm_shutdown_total", "outcome" => outcome).increment(1);
}
