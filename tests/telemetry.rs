// tests/telemetry.rs
// Own test binary: installs the process-wide Prometheus recorder.
mod common;

use common::now;
use publication_monitor::fixtures::{self, FixtureSpec};
use publication_monitor::{evaluate, telemetry, DashboardQuery, EvalTime, RecordStore};

#[test]
fn evaluation_series_are_exported() {
    let handle = telemetry::install_prometheus().unwrap();

    let store = RecordStore::ingest(fixtures::generate(&FixtureSpec::default(), now())).unwrap();
    let _ = evaluate(&store, &DashboardQuery::default(), &EvalTime::utc(now()));

    let text = handle.render();
    for needle in [
        "dashboard_evaluations_total",
        "dashboard_filtered_articles",
        "dashboard_eval_ms",
        "store_records_loaded_total",
    ] {
        assert!(text.contains(needle), "missing {needle} in:\n{text}");
    }
}
