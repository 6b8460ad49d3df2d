//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rental_http_requests_total` (counter): requests by route, status
//! - `rental_http_request_duration_seconds` (histogram): latency by route
//! - `rental_contract_calls_total` (counter): contract calls by selector, outcome
//! - `rental_broadcasts_total` (counter): broadcasts by acceptance
//! - `rental_fee_query_degraded_total` (counter): fee fields replaced by zero
//!
//! Without an installed recorder every call here is a no-op.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!("rental_http_requests_total", "HTTP requests by route and status");
    describe_histogram!(
        "rental_http_request_duration_seconds",
        metrics::Unit::Seconds,
        "HTTP request latency by route"
    );
    describe_counter!("rental_contract_calls_total", "Contract calls by selector and outcome");
    describe_counter!("rental_broadcasts_total", "Transaction broadcasts by acceptance");
    describe_counter!(
        "rental_fee_query_degraded_total",
        "Fee quote fields that fell back to zero"
    );

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled HTTP request.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!("rental_http_requests_total", "route" => route, "status" => status.to_string()).increment(1);
    histogram!("rental_http_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_contract_call(method: &str, outcome: &'static str) {
    counter!("rental_contract_calls_total", "method" => method.to_string(), "outcome" => outcome)
        .increment(1);
}

pub fn record_broadcast(accepted: bool) {
    counter!("rental_broadcasts_total", "accepted" => if accepted { "true" } else { "false" })
        .increment(1);
}

pub fn record_fee_query_degraded(field: &'static str) {
    counter!("rental_fee_query_degraded_total", "field" => field).increment(1);
}
