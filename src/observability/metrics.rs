//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): handled requests by service, status
//! - `relay_request_duration_seconds` (histogram): handler latency by service
//! - `relay_upstream_calls_total` (counter): outbound calls by hop, outcome
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from inside the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled request.
pub fn record_request(service: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "service" => service,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("relay_request_duration_seconds", "service" => service)
        .record(start.elapsed().as_secs_f64());
}

/// Record one outbound call. `outcome` is `ok` or a short failure label.
pub fn record_upstream(hop: &'static str, outcome: &'static str) {
    metrics::counter!(
        "relay_upstream_calls_total",
        "hop" => hop,
        "outcome" => outcome
    )
    .increment(1);
}
