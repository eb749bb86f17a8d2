// src/telemetry.rs
// Prometheus series for the evaluation pipeline and record store.

use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up in the exposition).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "dashboard_evaluations_total",
            "Full dashboard pipeline evaluations."
        );
        describe_gauge!(
            "dashboard_filtered_articles",
            "Articles matching the filter in the last evaluation."
        );
        describe_histogram!(
            "dashboard_eval_ms",
            "Dashboard pipeline evaluation time in milliseconds."
        );
        describe_counter!(
            "store_records_loaded_total",
            "Channels, articles and jobs accepted by record store ingestion."
        );
    });
}

/// Record the outcome of one dashboard evaluation.
pub fn record_evaluation(filtered: usize, elapsed_ms: f64) {
    ensure_metrics_described();
    counter!("dashboard_evaluations_total").increment(1);
    gauge!("dashboard_filtered_articles").set(filtered as f64);
    histogram!("dashboard_eval_ms").record(elapsed_ms);
}

/// Install a process-wide Prometheus recorder. No listener is started;
/// callers render the exposition text from the returned handle.
pub fn install_prometheus() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("prometheus: install recorder")?;
    ensure_metrics_described();
    Ok(handle)
}
