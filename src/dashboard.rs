//! # Dashboard pipeline
//! One full evaluation: filter, baseline, KPIs, groupings, scheduler load,
//! chart shapes and the recent-articles table, computed from scratch for a
//! given query and reference time.
//!
//! Evaluation is deterministic for a fixed store, query and [`EvalTime`],
//! so callers may cache snapshots keyed on the query if they need to.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::chart::{self, ChartData};
use crate::clock::EvalTime;
use crate::filter::{baseline_articles, filter_articles, previous_day_count, Filter};
use crate::grouping::{
    aggregate_daily_trend, distribution_by_channel, status_breakdown, status_segments,
    top_ranking, ChannelShare, ChannelStatusTally, Grouped, RankedArticle, RankingMetric,
    StatusSegment, TrendBucket, DEFAULT_TOP_N,
};
use crate::kpi::{calculate_kpis, kpi_cards, CardInputs, KpiCard, Kpis};
use crate::model::{Article, HOURS_PER_DAY};
use crate::scheduler::{scheduler_hourly_metrics, HourlyTotals};
use crate::store::RecordStore;
use crate::telemetry;

/// Rows shown in the "recent articles" table.
pub const RECENT_TABLE_LIMIT: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DashboardQuery {
    pub filter: Filter,
    pub ranking: RankingMetric,
    pub top_n: usize,
}

impl Default for DashboardQuery {
    fn default() -> Self {
        Self {
            filter: Filter::default(),
            ranking: RankingMetric::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCharts {
    pub publication_trend: ChartData,
    pub channel_coverage: ChartData,
    pub status_breakdown: ChartData,
    pub scheduler_hourly: ChartData,
    pub top_stories: ChartData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot<'a> {
    pub generated_at: DateTime<Utc>,
    pub query: DashboardQuery,
    pub kpis: Kpis,
    pub baseline_kpis: Kpis,
    pub cards: Vec<KpiCard>,
    pub segments: Grouped<StatusSegment>,
    pub trend: Grouped<TrendBucket>,
    pub distribution: Grouped<ChannelShare>,
    pub status_breakdown: Grouped<ChannelStatusTally>,
    pub ranking: Grouped<RankedArticle<'a>>,
    pub scheduler_load: [HourlyTotals; HOURS_PER_DAY],
    pub charts: DashboardCharts,
    pub recent_articles: Vec<&'a Article>,
}

/// Articles matching the query's filter at `time`.
pub fn filtered<'a>(store: &'a RecordStore, query: &DashboardQuery, time: &EvalTime) -> Vec<&'a Article> {
    filter_articles(store.articles(), &query.filter, time.now)
}

pub fn evaluate<'a>(
    store: &'a RecordStore,
    query: &DashboardQuery,
    time: &EvalTime,
) -> DashboardSnapshot<'a> {
    let started = Instant::now();
    let filter = &query.filter;

    let current = filtered(store, query, time);
    let baseline = baseline_articles(store.articles(), filter, time.now);
    let prev_day = previous_day_count(store.articles(), filter, time);
    let jobs = store.jobs_for(&filter.channel);

    let kpis = calculate_kpis(&current, &jobs, time);
    let baseline_kpis = calculate_kpis(&baseline, &jobs, time);
    let cards = kpi_cards(
        &CardInputs {
            current: &current,
            baseline: &baseline,
            jobs: &jobs,
            previous_day_count: prev_day,
            range_days: filter.range_days,
        },
        time,
    );

    let trend = aggregate_daily_trend(&current);
    let distribution = distribution_by_channel(&current, store.channels());
    let breakdown = status_breakdown(&current);
    let ranking = top_ranking(&current, query.ranking, query.top_n);
    let scheduler_load = scheduler_hourly_metrics(store.jobs(), &filter.channel);

    let charts = DashboardCharts {
        publication_trend: chart::publication_trend(&trend, &current, store),
        channel_coverage: chart::channel_coverage(&current, store),
        status_breakdown: chart::status_breakdown(&breakdown, store),
        scheduler_hourly: chart::scheduler_hourly(&scheduler_load),
        top_stories: chart::top_stories(&ranking, query.ranking),
    };

    let mut recent_articles = crate::export::sorted_by_recency(&current);
    recent_articles.truncate(RECENT_TABLE_LIMIT);

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    telemetry::record_evaluation(current.len(), elapsed_ms);
    tracing::debug!(
        target: "dashboard",
        filtered = current.len(),
        baseline = baseline.len(),
        jobs = jobs.len(),
        range_days = filter.range_days,
        channel = %filter.channel,
        elapsed_ms,
        "dashboard evaluated"
    );

    DashboardSnapshot {
        generated_at: time.now,
        query: query.clone(),
        kpis,
        baseline_kpis,
        cards,
        segments: status_segments(&current),
        trend,
        distribution,
        status_breakdown: breakdown,
        ranking,
        scheduler_load,
        charts,
        recent_articles,
    }
}
