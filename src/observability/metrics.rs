//! Metrics collection and exposition.
//!
//! # Metrics
//! - `flareproxy_requests_total` (counter): client requests by method, status
//! - `flareproxy_request_duration_seconds` (histogram): client-facing latency
//! - `flareproxy_solver_calls_total` (counter): solver commands by cmd, outcome
//! - `flareproxy_solver_duration_seconds` (histogram): solver round trip

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one client request and its latency.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    counter!(
        "flareproxy_requests_total",
        "method" => method.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("flareproxy_request_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());
}

/// Record one solver command.
pub fn record_solver_call(cmd: &'static str, outcome: &'static str, start: Instant) {
    counter!("flareproxy_solver_calls_total", "cmd" => cmd, "outcome" => outcome).increment(1);
    histogram!("flareproxy_solver_duration_seconds", "cmd" => cmd)
        .record(start.elapsed().as_secs_f64());
}
