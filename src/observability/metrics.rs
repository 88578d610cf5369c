//! Metrics collection and exposition.
//!
//! # Metrics
//! - `openroute_requests_total` (counter): requests by method, route, status
//! - `openroute_request_duration_seconds` (histogram): latency by method, route
//! - `openroute_validation_failures_total` (counter): 422s by route
//! - `openroute_rate_limited_total` (counter): rejections by reason
//!
//! # Design Decisions
//! - Labels use the declared route path, never the raw URI, to keep
//!   cardinality bounded

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub fn record_request(method: &str, route: &str, status: u16, elapsed: Duration) {
    counter!(
        "openroute_requests_total",
        "method" => method.to_string(),
        "path" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "openroute_request_duration_seconds",
        "method" => method.to_string(),
        "path" => route.to_string()
    )
    .record(elapsed.as_secs_f64());
}

pub fn record_validation_failure(route: &str) {
    counter!("openroute_validation_failures_total", "path" => route.to_string()).increment(1);
}

/// Start the Prometheus scrape endpoint. Must run inside the tokio runtime.
pub fn install_exporter(address: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(address).install()?;
    tracing::info!(address = %address, "Metrics endpoint listening");
    Ok(())
}
