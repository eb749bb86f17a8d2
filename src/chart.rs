//! # Chart adapter
//! Maps aggregation results to chart-ready `{labels, datasets}` structures.
//! Rendering itself belongs to the consumer; this module only shapes data.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::grouping::{ChannelStatusTally, Grouped, RankedArticle, RankingMetric, TrendBucket};
use crate::model::{Article, ArticleStatus};
use crate::scheduler::{has_load, HourlyTotals};
use crate::store::RecordStore;

/// Label used for the single placeholder category.
pub const NO_DATA_LABEL: &str = "No data";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
}

impl Dataset {
    fn new(label: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    /// One "No data" category holding `value` in a single dataset.
    pub fn no_data(dataset_label: &str, value: f64) -> Self {
        Self {
            labels: vec![NO_DATA_LABEL.to_string()],
            datasets: vec![Dataset::new(dataset_label, vec![value])],
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.labels.len() == 1 && self.labels[0] == NO_DATA_LABEL
    }
}

/// Channel ids in order of first appearance within `articles`.
fn channels_in_order<'a>(articles: &[&'a Article]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    for a in articles {
        if seen.insert(a.channel_id.as_str()) {
            order.push(a.channel_id.as_str());
        }
    }
    order
}

/// "Total" line plus one zero-filled line per represented channel.
pub fn publication_trend(
    trend: &Grouped<TrendBucket>,
    articles: &[&Article],
    store: &RecordStore,
) -> ChartData {
    let buckets = match trend {
        Grouped::NoData => return ChartData::no_data("Total", 0.0),
        Grouped::Data(b) => b,
    };

    let labels = buckets.iter().map(|b| b.date.to_string()).collect();
    let mut datasets = vec![Dataset::new(
        "Total",
        buckets.iter().map(|b| b.total as f64).collect(),
    )];
    for id in channels_in_order(articles) {
        let data = buckets
            .iter()
            .map(|b| b.per_channel.get(id).copied().unwrap_or(0) as f64)
            .collect();
        datasets.push(Dataset::new(store.channel_label(id), data));
    }

    ChartData { labels, datasets }
}

/// Doughnut of represented channels only. The empty ring holds 1 so it stays visible.
pub fn channel_coverage(articles: &[&Article], store: &RecordStore) -> ChartData {
    if articles.is_empty() {
        return ChartData::no_data("Articles", 1.0);
    }

    let order = channels_in_order(articles);
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for a in articles {
        *counts.entry(a.channel_id.as_str()).or_default() += 1;
    }

    ChartData {
        labels: order
            .iter()
            .map(|id| store.channel_label(id).to_string())
            .collect(),
        datasets: vec![Dataset::new(
            "Articles",
            order.iter().map(|id| counts[id] as f64).collect(),
        )],
    }
}

/// Three stacked series (one per status) over the represented channels.
pub fn status_breakdown(tallies: &Grouped<ChannelStatusTally>, store: &RecordStore) -> ChartData {
    let tallies = match tallies {
        Grouped::NoData => return ChartData::no_data(ArticleStatus::Completed.label(), 0.0),
        Grouped::Data(t) => t,
    };

    ChartData {
        labels: tallies
            .iter()
            .map(|t| store.channel_label(&t.channel_id).to_string())
            .collect(),
        datasets: ArticleStatus::ALL
            .iter()
            .map(|&s| {
                Dataset::new(
                    s.label(),
                    tallies.iter().map(|t| t.counts.get(s) as f64).collect(),
                )
            })
            .collect(),
    }
}

pub fn scheduler_hourly(totals: &[HourlyTotals]) -> ChartData {
    if !has_load(totals) {
        return ChartData::no_data("Completed", 0.0);
    }

    ChartData {
        labels: totals.iter().map(|t| format!("{:02}:00", t.hour)).collect(),
        datasets: vec![
            Dataset::new("Completed", totals.iter().map(|t| t.success as f64).collect()),
            Dataset::new("Queued", totals.iter().map(|t| t.queued as f64).collect()),
            Dataset::new("Failed", totals.iter().map(|t| t.failed as f64).collect()),
        ],
    }
}

pub fn top_stories(ranking: &Grouped<RankedArticle<'_>>, metric: RankingMetric) -> ChartData {
    let ranked = match ranking {
        Grouped::NoData => return ChartData::no_data(metric.label(), 0.0),
        Grouped::Data(r) => r,
    };

    ChartData {
        labels: ranked.iter().map(|r| r.article.title.clone()).collect(),
        datasets: vec![Dataset::new(
            metric.label(),
            ranked.iter().map(|r| r.value as f64).collect(),
        )],
    }
}
