//! # Record Store
//! Immutable in-memory snapshot of channels, articles and scheduler jobs.
//!
//! Ingestion validates every record once and fails fast on the first
//! inconsistency. After that the store is read-only; every aggregation
//! borrows from it.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use metrics::counter;
use thiserror::Error;

use crate::filter::Selector;
use crate::model::{
    Article, Channel, HourlySlot, JobHealth, RawDataset, RawScheduleJob, ScheduleJob,
    HOURS_PER_DAY,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate channel id '{0}'")]
    DuplicateChannel(String),

    #[error("duplicate article id '{0}'")]
    DuplicateArticle(String),

    #[error("duplicate schedule job id {0}")]
    DuplicateJob(u32),

    #[error("{entity} '{id}' references unknown channel '{reference}'")]
    UnknownChannel {
        entity: &'static str,
        id: String,
        reference: String,
    },

    #[error("schedule job {job} carries neither channelId nor channel")]
    MissingChannelRef { job: u32 },

    #[error("schedule job {job} has {len} hourly slots, expected 24")]
    HourlyLoadLength { job: u32, len: usize },

    #[error("schedule job {job} slot {index} is labelled hour {hour}")]
    HourlySlotMismatch { job: u32, index: usize, hour: u8 },

    #[error("{entity} '{id}' field {field} out of range: {value}")]
    OutOfRange {
        entity: &'static str,
        id: String,
        field: &'static str,
        value: f64,
    },

    #[error("dataset JSON invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reading dataset from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    channels: Vec<Channel>,
    articles: Vec<Article>,
    jobs: Vec<ScheduleJob>,
    channel_index: HashMap<String, usize>,
}

impl RecordStore {
    /// Validate and normalize a raw snapshot.
    pub fn ingest(raw: RawDataset) -> Result<Self, StoreError> {
        let RawDataset {
            channels,
            articles,
            scheduler,
        } = raw;

        let mut channel_index = HashMap::with_capacity(channels.len());
        for (i, ch) in channels.iter().enumerate() {
            check_unit_interval("channel", &ch.id, "audienceShare", ch.audience_share)?;
            if !(ch.avg_latency_minutes.is_finite() && ch.avg_latency_minutes > 0.0) {
                return Err(StoreError::OutOfRange {
                    entity: "channel",
                    id: ch.id.clone(),
                    field: "avgLatencyMinutes",
                    value: ch.avg_latency_minutes,
                });
            }
            if channel_index.insert(ch.id.clone(), i).is_some() {
                return Err(StoreError::DuplicateChannel(ch.id.clone()));
            }
        }

        let mut store = Self {
            channels,
            articles: Vec::new(),
            jobs: Vec::new(),
            channel_index,
        };

        let mut seen_articles = HashSet::with_capacity(articles.len());
        for a in &articles {
            if !store.channel_index.contains_key(&a.channel_id) {
                return Err(StoreError::UnknownChannel {
                    entity: "article",
                    id: a.id.clone(),
                    reference: a.channel_id.clone(),
                });
            }
            if !seen_articles.insert(a.id.as_str()) {
                return Err(StoreError::DuplicateArticle(a.id.clone()));
            }
        }
        store.articles = articles;

        let mut seen_jobs = HashSet::with_capacity(scheduler.len());
        let mut jobs = Vec::with_capacity(scheduler.len());
        for raw_job in scheduler {
            if !seen_jobs.insert(raw_job.id) {
                return Err(StoreError::DuplicateJob(raw_job.id));
            }
            jobs.push(store.normalize_job(raw_job)?);
        }
        store.jobs = jobs;

        counter!("store_records_loaded_total").increment(
            (store.channels.len() + store.articles.len() + store.jobs.len()) as u64,
        );
        tracing::info!(
            target: "store",
            channels = store.channels.len(),
            articles = store.articles.len(),
            jobs = store.jobs.len(),
            "record store ingested"
        );

        Ok(store)
    }

    pub fn from_json_str(s: &str) -> Result<Self, StoreError> {
        let raw: RawDataset = serde_json::from_str(s)?;
        Self::ingest(raw)
    }

    /// Load a JSON snapshot from disk.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    fn normalize_job(&self, raw: RawScheduleJob) -> Result<ScheduleJob, StoreError> {
        let job_id = raw.id;

        // channelId wins when present; otherwise the display name must resolve.
        let channel = match (&raw.channel_id, &raw.channel) {
            (Some(id), _) => self.channel(id).ok_or_else(|| StoreError::UnknownChannel {
                entity: "schedule job",
                id: job_id.to_string(),
                reference: id.clone(),
            })?,
            (None, Some(reference)) => {
                self.resolve_channel(reference)
                    .ok_or_else(|| StoreError::UnknownChannel {
                        entity: "schedule job",
                        id: job_id.to_string(),
                        reference: reference.clone(),
                    })?
            }
            (None, None) => return Err(StoreError::MissingChannelRef { job: job_id }),
        };

        check_unit_interval("schedule job", &job_id.to_string(), "successRate", raw.success_rate)?;
        if !(raw.latency_minutes.is_finite() && raw.latency_minutes >= 0.0) {
            return Err(StoreError::OutOfRange {
                entity: "schedule job",
                id: job_id.to_string(),
                field: "latencyMinutes",
                value: raw.latency_minutes,
            });
        }

        let len = raw.hourly_load.len();
        let hourly_load: [HourlySlot; HOURS_PER_DAY] = raw
            .hourly_load
            .try_into()
            .map_err(|_| StoreError::HourlyLoadLength { job: job_id, len })?;
        for (index, slot) in hourly_load.iter().enumerate() {
            if usize::from(slot.hour) != index {
                return Err(StoreError::HourlySlotMismatch {
                    job: job_id,
                    index,
                    hour: slot.hour,
                });
            }
        }

        let status = JobHealth::from_latency(raw.latency_minutes);
        if raw.status.is_some_and(|s| s != status) {
            tracing::warn!(
                target: "store",
                job = job_id,
                supplied = ?raw.status,
                derived = ?status,
                "job status disagrees with latency; using derived health"
            );
        }

        Ok(ScheduleJob {
            id: job_id,
            name: raw.name,
            channel_id: channel.id.clone(),
            channel_name: channel.name.clone(),
            cron: raw.cron,
            latency_minutes: raw.latency_minutes,
            success_rate: raw.success_rate,
            active: raw.active,
            status,
            hourly_load,
        })
    }

    /// Channels in registration order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn jobs(&self) -> &[ScheduleJob] {
        &self.jobs
    }

    pub fn channel(&self, id: &str) -> Option<&Channel> {
        self.channel_index.get(id).map(|&i| &self.channels[i])
    }

    /// Resolve a reference that may be either a channel id or a display name.
    pub fn resolve_channel(&self, reference: &str) -> Option<&Channel> {
        self.channel(reference)
            .or_else(|| self.channels.iter().find(|c| c.name == reference))
    }

    /// Display name for a channel id, falling back to the id itself.
    pub fn channel_label<'a>(&'a self, id: &'a str) -> &'a str {
        self.channel(id).map(|c| c.name.as_str()).unwrap_or(id)
    }

    /// Scheduler jobs serving the selected channel (id or display name).
    pub fn jobs_for(&self, selector: &Selector) -> Vec<&ScheduleJob> {
        self.jobs.iter().filter(|j| j.serves(selector)).collect()
    }

    pub fn region_options(&self) -> Vec<String> {
        distinct(self.channels.iter().map(|c| c.region.as_str()))
    }

    pub fn company_options(&self) -> Vec<String> {
        distinct(self.articles.iter().map(|a| a.company_name.as_str()))
    }

    pub fn sector_options(&self) -> Vec<String> {
        distinct(self.articles.iter().map(|a| a.sector.as_str()))
    }

    pub fn category_options(&self) -> Vec<String> {
        distinct(self.articles.iter().map(|a| a.category.as_str()))
    }
}

fn check_unit_interval(
    entity: &'static str,
    id: &str,
    field: &'static str,
    value: f64,
) -> Result<(), StoreError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(StoreError::OutOfRange {
            entity,
            id: id.to_string(),
            field,
            value,
        })
    }
}

fn distinct<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
