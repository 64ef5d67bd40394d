//! Metrics collection and exposition.
//!
//! # Metrics
//! - `token_info_node_health` (gauge): 1=reachable, 0=unreachable
//! - `token_info_node_requests_total` (counter): algod calls by operation, outcome
//! - `token_info_confirmations_total` (counter): wait outcomes
//! - `token_info_rounds_waited` (histogram): rounds spent per wait
//!
//! Without an installed recorder every call is a no-op.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_node_health(healthy: bool) {
    metrics::gauge!("token_info_node_health").set(if healthy { 1.0 } else { 0.0 });
}

pub fn record_node_request(operation: &'static str, outcome: &'static str) {
    metrics::counter!(
        "token_info_node_requests_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record how a confirmation wait ended.
pub fn record_confirmation(outcome: &'static str, rounds_waited: u64) {
    metrics::counter!("token_info_confirmations_total", "outcome" => outcome).increment(1);
    metrics::histogram!("token_info_rounds_waited").record(rounds_waited as f64);
}
