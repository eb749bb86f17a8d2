//! # Record model
//! Channels, articles and scheduler jobs as they live in the record store.
//!
//! Wire shapes use camelCase keys so a JSON snapshot produced by the
//! dashboard's data source deserializes without a mapping layer.
//! Schedule jobs arrive as [`RawScheduleJob`] and are normalized into
//! [`ScheduleJob`] by the store (channel reference resolved, health derived).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of hour-of-day slots carried by every scheduler job.
pub const HOURS_PER_DAY: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelStatus {
    Active,
    Paused,
}

/// Publication source with fixed reference metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub region: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub status: ChannelStatus,
    pub avg_latency_minutes: f64,
    pub audience_share: f64,
}

/// Processing state of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArticleStatus {
    Completed,
    #[serde(rename = "In Queue", alias = "InQueue")]
    InQueue,
    Improper,
}

impl ArticleStatus {
    pub const ALL: [ArticleStatus; 3] = [
        ArticleStatus::Completed,
        ArticleStatus::InQueue,
        ArticleStatus::Improper,
    ];

    /// Display label (matches the wire form).
    pub fn label(self) -> &'static str {
        match self {
            ArticleStatus::Completed => "Completed",
            ArticleStatus::InQueue => "In Queue",
            ArticleStatus::Improper => "Improper",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    pub web_views: u64,
    pub mobile_views: u64,
    pub shares: u64,
    pub dwell_seconds: u64,
}

impl Engagement {
    /// Web plus mobile views.
    pub fn total_views(&self) -> u64 {
        self.web_views.saturating_add(self.mobile_views)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub teaser: String,
    /// Channel display name, denormalized.
    pub source: String,
    pub region: String,
    pub category: String,
    pub channel_id: String,
    pub status: ArticleStatus,
    pub published_at: DateTime<Utc>,
    pub company_name: String,
    pub sector: String,
    pub engagement: Engagement,
}

/// Scheduler job health, derived from latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobHealth {
    Healthy,
    Warning,
    Critical,
}

impl JobHealth {
    /// <15 min healthy, <25 min warning, anything slower critical.
    pub fn from_latency(latency_minutes: f64) -> Self {
        if latency_minutes < 15.0 {
            JobHealth::Healthy
        } else if latency_minutes < 25.0 {
            JobHealth::Warning
        } else {
            JobHealth::Critical
        }
    }
}

/// One hour of scheduler execution load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HourlySlot {
    pub hour: u8,
    pub success: u64,
    pub queued: u64,
    pub failed: u64,
}

impl HourlySlot {
    pub fn total(&self) -> u64 {
        self.success
            .saturating_add(self.queued)
            .saturating_add(self.failed)
    }
}

/// Scheduler job as supplied by the data source.
///
/// The channel may be referenced by `channelId`, by display name
/// (`channel`), or both. `status` is ignored on ingestion; health is
/// always re-derived from `latencyMinutes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScheduleJob {
    pub id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    pub cron: String,
    pub latency_minutes: f64,
    pub success_rate: f64,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobHealth>,
    pub hourly_load: Vec<HourlySlot>,
}

/// Normalized scheduler job: channel resolved to its canonical id,
/// exactly one slot per hour of day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleJob {
    pub id: u32,
    pub name: String,
    pub channel_id: String,
    /// Display name of the channel, kept for selectors that use it.
    pub channel_name: String,
    pub cron: String,
    pub latency_minutes: f64,
    pub success_rate: f64,
    pub active: bool,
    pub status: JobHealth,
    pub hourly_load: [HourlySlot; HOURS_PER_DAY],
}

/// Complete input snapshot for a [`crate::store::RecordStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDataset {
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default, alias = "scheduleJobs")]
    pub scheduler: Vec<RawScheduleJob>,
}
