//! Publication Monitor: binary entrypoint
//! Loads config, builds the record store (snapshot file or generated
//! fixtures), evaluates the dashboard once and prints the snapshot as JSON.
//!
//! Logs go to stderr so stdout stays machine-readable.

use std::fs;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use publication_monitor::config::DashboardConfig;
use publication_monitor::{dashboard, export, fixtures, telemetry};
use publication_monitor::{EvalTime, RecordStore, SystemClock};

const ENV_EXPORT_CSV: &str = "DASHBOARD_EXPORT_CSV";
const ENV_METRICS: &str = "DASHBOARD_METRICS";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("publication_monitor=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let prometheus = if std::env::var(ENV_METRICS).is_ok_and(|v| v == "1") {
        Some(telemetry::install_prometheus()?)
    } else {
        None
    };

    let mut cfg = DashboardConfig::load_default()?;
    cfg.apply_env_overrides()?;
    cfg.validate()?;

    let time = EvalTime::from_clock(&SystemClock, cfg.offset()?);

    let store = match &cfg.dataset_path {
        Some(path) => RecordStore::load_from(path)
            .with_context(|| format!("loading dataset {}", path.display()))?,
        None => {
            tracing::info!(seed = cfg.fixture_seed, "no dataset_path configured; generating fixtures");
            RecordStore::ingest(fixtures::generate(&cfg.fixture_spec(), time.now))
                .context("ingesting generated fixtures")?
        }
    };

    let query = cfg.query();
    let snapshot = dashboard::evaluate(&store, &query, &time);
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).context("serializing dashboard snapshot")?
    );

    if let Ok(path) = std::env::var(ENV_EXPORT_CSV) {
        let current = dashboard::filtered(&store, &query, &time);
        let csv = export::export_articles_csv(&current, &time)?;
        fs::write(&path, csv).with_context(|| format!("writing csv export to {path}"))?;
        tracing::info!(path = %path, rows = current.len(), "articles exported");
    }

    if let Some(handle) = prometheus {
        eprintln!("{}", handle.render());
    }

    Ok(())
}
