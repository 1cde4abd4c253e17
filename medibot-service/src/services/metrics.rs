//! Metrics collection for medibot-service.
//!
//! Counters and histograms go through the `metrics` facade; the Prometheus recorder
//! installed by [`init_metrics`] renders them for `GET /metrics`.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Later calls are no-ops.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
            tracing::info!("Prometheus metrics initialized");
        }
        Err(e) => tracing::warn!(error = %e, "Failed to install Prometheus recorder"),
    }
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Record one upstream call and how it ended.
pub fn record_upstream_request(provider: &'static str, outcome: &'static str, duration_secs: f64) {
    counter!(
        "medibot_upstream_requests_total",
        "provider" => provider,
        "outcome" => outcome
    )
    .increment(1);
    histogram!("medibot_upstream_latency_seconds", "provider" => provider).record(duration_secs);
}

/// Record the severity attached to a relayed reply.
pub fn record_condition_level(level: &'static str) {
    let level = if level.is_empty() { "unknown" } else { level };
    counter!("medibot_condition_level_total", "level" => level).increment(1);
}
