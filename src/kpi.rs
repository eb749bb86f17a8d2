//! # Metric Aggregator
//! Scalar KPIs over a filtered article set, period-over-period deltas and
//! the KPI card set shown at the top of the dashboard.

use std::collections::HashSet;

use serde::Serialize;

use crate::clock::EvalTime;
use crate::model::{Article, ScheduleJob};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Kpis {
    pub published_today: usize,
    pub total_articles: usize,
    pub active_channels: usize,
    pub average_dwell: f64,
    pub success_rate: f64,
}

/// Empty inputs yield zeros: both means floor their denominator at 1.
pub fn calculate_kpis(articles: &[&Article], jobs: &[&ScheduleJob], time: &EvalTime) -> Kpis {
    let today = time.today();
    let published_today = articles
        .iter()
        .filter(|a| time.local_date(a.published_at) == today)
        .count();

    let total_articles = articles.len();
    let dwell_sum = articles
        .iter()
        .fold(0u64, |acc, a| acc.saturating_add(a.engagement.dwell_seconds));
    let rate_sum: f64 = jobs.iter().map(|j| j.success_rate).sum();

    Kpis {
        published_today,
        total_articles,
        active_channels: count_publications(articles),
        average_dwell: dwell_sum as f64 / total_articles.max(1) as f64,
        success_rate: rate_sum / jobs.len().max(1) as f64,
    }
}

/// Distinct channel ids represented in the set.
pub fn count_publications(articles: &[&Article]) -> usize {
    articles
        .iter()
        .map(|a| a.channel_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Distinct source pages (channel display names) represented in the set.
pub fn count_configured_pages(articles: &[&Article]) -> usize {
    articles
        .iter()
        .map(|a| a.source.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Change of a KPI against its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Delta {
    /// Both periods are zero.
    NoPriorData,
    /// Baseline is zero, current is not; no percentage exists.
    New,
    /// Signed percentage, one decimal.
    Change { percent: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Delta {
    pub fn percent(&self) -> Option<f64> {
        match self {
            Delta::Change { percent } => Some(*percent),
            _ => None,
        }
    }

    pub fn trend(&self) -> Trend {
        match self.percent() {
            Some(p) if p > 0.0 => Trend::Up,
            Some(p) if p < 0.0 => Trend::Down,
            _ => Trend::Neutral,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Delta::NoPriorData => "no prior data".to_string(),
            Delta::New => "new".to_string(),
            Delta::Change { percent } => {
                let sign = if *percent > 0.0 { "+" } else { "" };
                format!("{sign}{percent:.1}% vs prev")
            }
        }
    }
}

pub fn calc_delta(current: f64, previous: f64) -> Delta {
    if previous == 0.0 {
        if current == 0.0 {
            return Delta::NoPriorData;
        }
        return Delta::New;
    }
    let pct = (current - previous) / previous * 100.0;
    Delta::Change {
        percent: (pct * 10.0).round() / 10.0,
    }
}

/// Compact number: `1.2M`, `12.3K`, or thousands-separated below 10k.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "--".to_string();
    }
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        return format!("{:.1}M", value / 1_000_000.0);
    }
    if abs >= 10_000.0 {
        return format!("{:.1}K", value / 1_000.0);
    }

    let rounded = (value * 1000.0).round() / 1000.0;
    let whole = rounded.trunc() as i64;
    let mut digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    while digits.len() > 3 {
        let tail = digits.split_off(digits.len() - 3);
        grouped = format!(",{tail}{grouped}");
    }
    grouped = format!("{digits}{grouped}");
    if rounded < 0.0 {
        grouped.insert(0, '-');
    }

    let frac = (rounded.fract().abs() * 1000.0).round() as u32;
    if frac == 0 {
        grouped
    } else {
        let f = format!("{frac:03}");
        format!("{grouped}.{}", f.trim_end_matches('0'))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub delta: Delta,
    pub delta_label: String,
    pub trend: Trend,
    pub meta: String,
}

impl KpiCard {
    fn new(key: &'static str, label: &'static str, value: String, delta: Delta, meta: String) -> Self {
        Self {
            key,
            label,
            value,
            delta_label: delta.label(),
            trend: delta.trend(),
            delta,
            meta,
        }
    }
}

/// Inputs for [`kpi_cards`]: current window vs. baseline window.
#[derive(Debug, Clone, Copy)]
pub struct CardInputs<'a> {
    pub current: &'a [&'a Article],
    pub baseline: &'a [&'a Article],
    pub jobs: &'a [&'a ScheduleJob],
    pub previous_day_count: usize,
    pub range_days: u32,
}

pub fn kpi_cards(inputs: &CardInputs<'_>, time: &EvalTime) -> Vec<KpiCard> {
    let cur = calculate_kpis(inputs.current, inputs.jobs, time);
    let base = calculate_kpis(inputs.baseline, inputs.jobs, time);
    let publications = count_publications(inputs.current);
    let base_publications = count_publications(inputs.baseline);
    let pages = count_configured_pages(inputs.current);
    let base_pages = count_configured_pages(inputs.baseline);

    vec![
        KpiCard::new(
            "totalArticles",
            "Total Articles",
            format_number(cur.total_articles as f64),
            calc_delta(cur.total_articles as f64, base.total_articles as f64),
            format!("{}-day window", inputs.range_days),
        ),
        KpiCard::new(
            "publications",
            "Active Publications",
            format_number(publications as f64),
            calc_delta(publications as f64, base_publications as f64),
            "Unique feeds".to_string(),
        ),
        KpiCard::new(
            "configuredPages",
            "Total Configured Pages",
            format_number(pages as f64),
            calc_delta(pages as f64, base_pages as f64),
            "Distinct source pages".to_string(),
        ),
        KpiCard::new(
            "completedToday",
            "Completed Today",
            format_number(cur.published_today as f64),
            calc_delta(cur.published_today as f64, inputs.previous_day_count as f64),
            "vs previous day".to_string(),
        ),
        KpiCard::new(
            "activeChannels",
            "Active Channels",
            format_number(cur.active_channels as f64),
            calc_delta(cur.active_channels as f64, base.active_channels as f64),
            "Unique sources".to_string(),
        ),
        KpiCard::new(
            "averageDwell",
            "Avg Dwell Time",
            format!("{}s", cur.average_dwell.round()),
            calc_delta(cur.average_dwell, base.average_dwell),
            "Reader engagement".to_string(),
        ),
        KpiCard::new(
            "successRate",
            "Scheduler Success",
            format!("{:.1}%", cur.success_rate * 100.0),
            calc_delta(cur.success_rate, base.success_rate),
            "Execution reliability".to_string(),
        ),
    ]
}
