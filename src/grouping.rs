//! # Grouping / Bucketing Engine
//! Daily trend, channel distribution, status tallies, status segments and
//! top-N ranking over an already-filtered article set.
//!
//! An empty input never produces an empty structure: every grouping
//! answers [`Grouped::NoData`] so chart code has one explicit case to render.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Article, ArticleStatus, Channel, ChannelStatus, Engagement};

/// Default length of the top-stories ranking.
pub const DEFAULT_TOP_N: usize = 5;

/// Result of a grouping: either real items or the "no data" placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "items", rename_all = "snake_case")]
pub enum Grouped<T> {
    NoData,
    Data(Vec<T>),
}

impl<T> Grouped<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Grouped::NoData => &[],
            Grouped::Data(v) => v,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Grouped::NoData)
    }
}

/// Articles published on one UTC calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendBucket {
    pub date: NaiveDate,
    pub total: usize,
    pub per_channel: BTreeMap<String, usize>,
}

/// Sparse daily series, ascending by date; days without articles are absent.
pub fn aggregate_daily_trend(articles: &[&Article]) -> Grouped<TrendBucket> {
    if articles.is_empty() {
        return Grouped::NoData;
    }

    let mut buckets: BTreeMap<NaiveDate, BTreeMap<String, usize>> = BTreeMap::new();
    for a in articles {
        *buckets
            .entry(a.published_at.date_naive())
            .or_default()
            .entry(a.channel_id.clone())
            .or_default() += 1;
    }

    Grouped::Data(
        buckets
            .into_iter()
            .map(|(date, per_channel)| TrendBucket {
                date,
                total: per_channel.values().sum(),
                per_channel,
            })
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelShare {
    pub channel_id: String,
    pub label: String,
    pub count: usize,
    pub status: ChannelStatus,
}

/// One entry per known channel, in registration order, zero when unrepresented.
/// An empty article set yields [`Grouped::NoData`], not a row of zeros.
pub fn distribution_by_channel(articles: &[&Article], channels: &[Channel]) -> Grouped<ChannelShare> {
    if articles.is_empty() {
        return Grouped::NoData;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for a in articles {
        *counts.entry(a.channel_id.as_str()).or_default() += 1;
    }

    Grouped::Data(
        channels
            .iter()
            .map(|c| ChannelShare {
                channel_id: c.id.clone(),
                label: c.name.clone(),
                count: counts.get(c.id.as_str()).copied().unwrap_or(0),
                status: c.status,
            })
            .collect(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusCounts {
    pub completed: usize,
    pub in_queue: usize,
    pub improper: usize,
}

impl StatusCounts {
    pub fn add(&mut self, status: ArticleStatus) {
        match status {
            ArticleStatus::Completed => self.completed += 1,
            ArticleStatus::InQueue => self.in_queue += 1,
            ArticleStatus::Improper => self.improper += 1,
        }
    }

    pub fn get(&self, status: ArticleStatus) -> usize {
        match status {
            ArticleStatus::Completed => self.completed,
            ArticleStatus::InQueue => self.in_queue,
            ArticleStatus::Improper => self.improper,
        }
    }

    pub fn total(&self) -> usize {
        self.completed
            .saturating_add(self.in_queue)
            .saturating_add(self.improper)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelStatusTally {
    pub channel_id: String,
    pub counts: StatusCounts,
}

/// Per-channel status tallies in first-appearance order.
pub fn status_breakdown(articles: &[&Article]) -> Grouped<ChannelStatusTally> {
    if articles.is_empty() {
        return Grouped::NoData;
    }

    let mut order: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<ChannelStatusTally> = Vec::new();
    for a in articles {
        let idx = *order.entry(a.channel_id.as_str()).or_insert_with(|| {
            out.push(ChannelStatusTally {
                channel_id: a.channel_id.clone(),
                counts: StatusCounts::default(),
            });
            out.len() - 1
        });
        out[idx].counts.add(a.status);
    }

    Grouped::Data(out)
}

/// Status share of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSegment {
    pub status: ArticleStatus,
    pub label: &'static str,
    pub caption: &'static str,
    pub count: usize,
    pub share_percent: f64,
}

pub fn status_segments(articles: &[&Article]) -> Grouped<StatusSegment> {
    if articles.is_empty() {
        return Grouped::NoData;
    }

    let mut counts = StatusCounts::default();
    for a in articles {
        counts.add(a.status);
    }
    let total = articles.len() as f64;

    Grouped::Data(
        ArticleStatus::ALL
            .iter()
            .map(|&status| {
                let (label, caption) = match status {
                    ArticleStatus::Completed => ("Completed Articles", "Processed successfully"),
                    ArticleStatus::InQueue => ("Articles In Queue", "Awaiting processing"),
                    ArticleStatus::Improper => ("Improper Articles", "Needs remediation"),
                };
                let count = counts.get(status);
                StatusSegment {
                    status,
                    label,
                    caption,
                    count,
                    share_percent: (count as f64 / total * 1000.0).round() / 10.0,
                }
            })
            .collect(),
    )
}

/// Engagement metric used to rank top stories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingMetric {
    /// Web plus mobile views.
    #[default]
    Views,
    Shares,
}

impl RankingMetric {
    pub fn value(self, e: &Engagement) -> u64 {
        match self {
            RankingMetric::Views => e.total_views(),
            RankingMetric::Shares => e.shares,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RankingMetric::Views => "Total Views",
            RankingMetric::Shares => "Shares",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedArticle<'a> {
    pub article: &'a Article,
    pub value: u64,
}

/// Top `n` articles by `metric`, descending; equal values keep input order.
/// `n == 0` is treated like an empty input.
pub fn top_ranking<'a>(
    articles: &[&'a Article],
    metric: RankingMetric,
    n: usize,
) -> Grouped<RankedArticle<'a>> {
    if articles.is_empty() || n == 0 {
        return Grouped::NoData;
    }

    let mut ranked: Vec<RankedArticle<'a>> = articles
        .iter()
        .map(|&article| RankedArticle {
            article,
            value: metric.value(&article.engagement),
        })
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.value.cmp(&a.value));
    ranked.truncate(n);

    Grouped::Data(ranked)
}
