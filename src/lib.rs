// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod model;
pub mod store;
pub mod clock;

// Aggregation core: filter -> KPIs / groupings, scheduler load on the side
pub mod filter;
pub mod kpi;
pub mod grouping;
pub mod scheduler;

// Presentation-facing adapters
pub mod chart;
pub mod export;
pub mod dashboard;

pub mod config;
pub mod fixtures;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::clock::{Clock, EvalTime, FixedClock, SystemClock};
pub use crate::dashboard::{evaluate, DashboardQuery, DashboardSnapshot};
pub use crate::filter::{filter_articles, Filter, Selector};
pub use crate::grouping::{
    aggregate_daily_trend, distribution_by_channel, status_breakdown, top_ranking, Grouped,
    RankingMetric,
};
pub use crate::kpi::{calc_delta, calculate_kpis, count_configured_pages, count_publications, Delta};
pub use crate::scheduler::scheduler_hourly_metrics;
pub use crate::store::{RecordStore, StoreError};
