// tests/common/mod.rs
// Small record builders shared by the integration tests.
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use publication_monitor::model::{
    Article, ArticleStatus, Channel, ChannelStatus, Engagement, HourlySlot, RawDataset,
    RawScheduleJob,
};

/// Fixed reference instant used by every scenario.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
}

pub fn channel(id: &str, name: &str, status: ChannelStatus) -> Channel {
    Channel {
        id: id.into(),
        name: name.into(),
        region: "Global".into(),
        categories: vec!["Markets".into()],
        status,
        avg_latency_minutes: 10.0,
        audience_share: 0.2,
    }
}

pub fn five_channels() -> Vec<Channel> {
    vec![
        channel("financial-times", "Financial Times", ChannelStatus::Active),
        channel("fortune", "Fortune", ChannelStatus::Active),
        channel("bloomberg", "Bloomberg", ChannelStatus::Active),
        channel("reuters", "Reuters", ChannelStatus::Paused),
        channel("business-insider", "Business Insider", ChannelStatus::Active),
    ]
}

pub fn article(id: &str, channel_id: &str, age: Duration) -> Article {
    Article {
        id: id.into(),
        title: format!("{id} headline"),
        teaser: String::new(),
        source: channel_id.to_uppercase(),
        region: "Global".into(),
        category: "Markets".into(),
        channel_id: channel_id.into(),
        status: ArticleStatus::Completed,
        published_at: now() - age,
        company_name: "GlobalBank plc".into(),
        sector: "Financial Services".into(),
        engagement: Engagement {
            web_views: 1_000,
            mobile_views: 500,
            shares: 50,
            dwell_seconds: 100,
        },
    }
}

pub fn with_engagement(mut a: Article, views: u64, shares: u64) -> Article {
    a.engagement.web_views = views;
    a.engagement.mobile_views = 0;
    a.engagement.shares = shares;
    a
}

pub fn with_status(mut a: Article, status: ArticleStatus) -> Article {
    a.status = status;
    a
}

pub fn raw_job(id: u32, channel_id: Option<&str>, channel: Option<&str>, per_hour: u64) -> RawScheduleJob {
    RawScheduleJob {
        id,
        name: format!("job {id}"),
        channel_id: channel_id.map(Into::into),
        channel: channel.map(Into::into),
        cron: "15 */2 * * *".into(),
        latency_minutes: 12.0,
        success_rate: 0.9,
        active: true,
        status: None,
        hourly_load: (0..24)
            .map(|hour| HourlySlot {
                hour,
                success: per_hour,
                queued: 0,
                failed: 0,
            })
            .collect(),
    }
}

pub fn dataset(articles: Vec<Article>, scheduler: Vec<RawScheduleJob>) -> RawDataset {
    RawDataset {
        channels: five_channels(),
        articles,
        scheduler,
    }
}
