// src/config.rs
use anyhow::{anyhow, bail, Context, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::dashboard::DashboardQuery;
use crate::filter::{Filter, Selector, DEFAULT_RANGE_DAYS};
use crate::fixtures::FixtureSpec;
use crate::grouping::{RankingMetric, DEFAULT_TOP_N};

const ENV_PATH: &str = "DASHBOARD_CONFIG_PATH";
const ENV_RANGE_DAYS: &str = "DASHBOARD_RANGE_DAYS";
const ENV_CHANNEL: &str = "DASHBOARD_CHANNEL";
const ENV_RANKING: &str = "DASHBOARD_RANKING";

/// Filter dimensions as written in config files; missing keys mean "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub channel: Selector,
    pub category: Selector,
    pub company: Selector,
    pub sector: Selector,
    pub region: Selector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub range_days: u32,
    pub top_n: usize,
    pub ranking: RankingMetric,
    pub utc_offset_minutes: i32,
    /// JSON snapshot to load instead of generated fixtures.
    pub dataset_path: Option<PathBuf>,
    pub fixture_seed: u64,
    pub fixture_articles: usize,
    pub fixture_jobs: usize,
    pub filter: FilterConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let fx = FixtureSpec::default();
        Self {
            range_days: DEFAULT_RANGE_DAYS,
            top_n: DEFAULT_TOP_N,
            ranking: RankingMetric::default(),
            utc_offset_minutes: 0,
            dataset_path: None,
            fixture_seed: fx.seed,
            fixture_articles: fx.articles,
            fixture_jobs: fx.jobs,
            filter: FilterConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading dashboard config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = match ext.as_str() {
            "json" => serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?,
            _ => toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?,
        };
        tracing::debug!(target: "config", path = %path.display(), "dashboard config loaded");
        Ok(cfg)
    }

    /// Load using env var + fallbacks:
    /// 1) $DASHBOARD_CONFIG_PATH
    /// 2) config/dashboard.toml
    /// 3) config/dashboard.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            } else {
                return Err(anyhow!("{ENV_PATH} points to non-existent path"));
            }
        }
        let toml_p = PathBuf::from("config/dashboard.toml");
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        let json_p = PathBuf::from("config/dashboard.json");
        if json_p.exists() {
            return Self::load_from(&json_p);
        }
        Ok(Self::default())
    }

    /// Apply single-value env overrides on top of the file config.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(v) = std::env::var(ENV_RANGE_DAYS) {
            self.range_days = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_RANGE_DAYS}='{v}' is not a day count"))?;
        }
        if let Ok(v) = std::env::var(ENV_CHANNEL) {
            self.filter.channel = Selector::from(v.trim());
        }
        if let Ok(v) = std::env::var(ENV_RANKING) {
            self.ranking = match v.trim().to_ascii_lowercase().as_str() {
                "views" => RankingMetric::Views,
                "shares" => RankingMetric::Shares,
                other => bail!("{ENV_RANKING}='{other}' must be 'views' or 'shares'"),
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.range_days == 0 {
            bail!("range_days must be positive");
        }
        if self.top_n == 0 {
            bail!("top_n must be positive");
        }
        self.offset()?;
        Ok(())
    }

    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .ok_or_else(|| anyhow!("utc_offset_minutes {} out of range", self.utc_offset_minutes))
    }

    pub fn filter(&self) -> Filter {
        let f = &self.filter;
        Filter::new(self.range_days)
            .with_channel(f.channel.clone())
            .with_category(f.category.clone())
            .with_company(f.company.clone())
            .with_sector(f.sector.clone())
            .with_region(f.region.clone())
    }

    pub fn query(&self) -> DashboardQuery {
        DashboardQuery {
            filter: self.filter(),
            ranking: self.ranking,
            top_n: self.top_n,
        }
    }

    pub fn fixture_spec(&self) -> FixtureSpec {
        FixtureSpec {
            seed: self.fixture_seed,
            articles: self.fixture_articles,
            jobs: self.fixture_jobs,
        }
    }
}
