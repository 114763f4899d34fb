//! Metrics collection and exposition.
//!
//! # Metrics
//! - `console_route_resolutions_total` (counter): resolutions by outcome (render, redirect)
//! - `console_uploads_total` (counter): uploads by status (success, rejected)
//! - `console_dataset_records` (gauge): rows in the current dataset
//! - `console_qc_findings` (gauge): findings on the current dataset
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`. Must run inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_resolution(redirected: bool) {
    let outcome = if redirected { "redirect" } else { "render" };
    metrics::counter!("console_route_resolutions_total", "outcome" => outcome).increment(1);
}

pub fn record_upload(success: bool) {
    let status = if success { "success" } else { "rejected" };
    metrics::counter!("console_uploads_total", "status" => status).increment(1);
}

pub fn record_dataset(records: usize, findings: usize) {
    metrics::gauge!("console_dataset_records").set(records as f64);
    metrics::gauge!("console_qc_findings").set(findings as f64);
}
