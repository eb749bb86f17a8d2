//! # Filter Engine
//! Narrows an article collection by channel, region, company, sector,
//! category and a trailing time window.
//!
//! Everything here is pure and order-preserving; "now" is always passed in.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::EvalTime;
use crate::model::Article;

/// Sentinel string meaning "no restriction".
pub const ALL: &str = "all";

/// Default window length in days.
pub const DEFAULT_RANGE_DAYS: u32 = 30;

const MS_PER_DAY: f64 = 86_400_000.0;

/// A single filter dimension: either unrestricted or one exact value.
///
/// On the wire this is a plain string; `"all"` and `null` both mean [`Selector::All`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Selector {
    #[default]
    All,
    Only(String),
}

impl Selector {
    pub fn only(value: impl Into<String>) -> Self {
        Selector::Only(value.into())
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(v) => v == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }
}

impl From<Option<String>> for Selector {
    fn from(v: Option<String>) -> Self {
        match v {
            None => Selector::All,
            Some(s) if s.is_empty() || s == ALL => Selector::All,
            Some(s) => Selector::Only(s),
        }
    }
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        Selector::from(Some(s.to_string()))
    }
}

impl From<Selector> for String {
    fn from(s: Selector) -> Self {
        match s {
            Selector::All => ALL.to_string(),
            Selector::Only(v) => v,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str(ALL),
            Selector::Only(v) => f.write_str(v),
        }
    }
}

/// Transient query over the article collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Filter {
    #[serde(rename = "channelId")]
    pub channel: Selector,
    pub category: Selector,
    pub company: Selector,
    pub sector: Selector,
    pub region: Selector,
    pub range_days: u32,
}

impl Default for Filter {
    fn default() -> Self {
        Self::new(DEFAULT_RANGE_DAYS)
    }
}

impl Filter {
    /// Unrestricted filter over the last `range_days` days.
    pub fn new(range_days: u32) -> Self {
        Self {
            channel: Selector::All,
            category: Selector::All,
            company: Selector::All,
            sector: Selector::All,
            region: Selector::All,
            range_days,
        }
    }

    pub fn with_channel(mut self, s: impl Into<Selector>) -> Self {
        self.channel = s.into();
        self
    }

    pub fn with_category(mut self, s: impl Into<Selector>) -> Self {
        self.category = s.into();
        self
    }

    pub fn with_company(mut self, s: impl Into<Selector>) -> Self {
        self.company = s.into();
        self
    }

    pub fn with_sector(mut self, s: impl Into<Selector>) -> Self {
        self.sector = s.into();
        self
    }

    pub fn with_region(mut self, s: impl Into<Selector>) -> Self {
        self.region = s.into();
        self
    }

    /// Same attribute predicates, different window.
    pub fn with_range_days(mut self, range_days: u32) -> Self {
        self.range_days = range_days;
        self
    }

    /// Attribute predicates only (no time window).
    pub fn matches_attributes(&self, a: &Article) -> bool {
        self.channel.matches(&a.channel_id)
            && self.region.matches(&a.region)
            && self.company.matches(&a.company_name)
            && self.sector.matches(&a.sector)
            && self.category.matches(&a.category)
    }

    /// Window check at whole-minute precision; an article exactly
    /// `range_days` old is still inside. A window reaching past the
    /// representable date range has no lower bound.
    pub fn in_window(&self, a: &Article, now: DateTime<Utc>) -> bool {
        let Some(cutoff) = now.checked_sub_signed(Duration::days(i64::from(self.range_days))) else {
            return true;
        };
        // num_minutes truncates toward zero, so up to 59s before the cutoff still counts
        (a.published_at - cutoff).num_minutes() >= 0
    }

    pub fn matches(&self, a: &Article, now: DateTime<Utc>) -> bool {
        self.matches_attributes(a) && self.in_window(a, now)
    }
}

/// Keep articles satisfying every predicate of `filter`, in input order.
pub fn filter_articles<'a, I>(articles: I, filter: &Filter, now: DateTime<Utc>) -> Vec<&'a Article>
where
    I: IntoIterator<Item = &'a Article>,
{
    articles
        .into_iter()
        .filter(|a| filter.matches(a, now))
        .collect()
}

/// Articles from the window immediately preceding the current one:
/// age in days within `[range_days, 2 × range_days)`.
pub fn baseline_articles<'a, I>(
    articles: I,
    filter: &Filter,
    now: DateTime<Utc>,
) -> Vec<&'a Article>
where
    I: IntoIterator<Item = &'a Article>,
{
    let range = f64::from(filter.range_days);
    let wide = filter.clone().with_range_days(filter.range_days.saturating_mul(2));

    filter_articles(articles, &wide, now)
        .into_iter()
        .filter(|a| {
            let age_days = (now - a.published_at).num_milliseconds() as f64 / MS_PER_DAY;
            age_days >= range && age_days < range * 2.0
        })
        .collect()
}

/// Articles published on the calendar day before today (reference timezone)
/// that satisfy the attribute predicates. The time window is ignored.
pub fn previous_day_count<'a, I>(articles: I, filter: &Filter, time: &EvalTime) -> usize
where
    I: IntoIterator<Item = &'a Article>,
{
    let Some(yesterday) = time.today().pred_opt() else {
        return 0;
    };
    articles
        .into_iter()
        .filter(|a| time.local_date(a.published_at) == yesterday && filter.matches_attributes(a))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArticleStatus, Engagement};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn article(id: &str, channel: &str, published_at: DateTime<Utc>) -> Article {
        Article {
            id: id.into(),
            title: format!("{id} title"),
            teaser: String::new(),
            source: channel.to_uppercase(),
            region: "Global".into(),
            category: "Markets".into(),
            channel_id: channel.into(),
            status: ArticleStatus::Completed,
            published_at,
            company_name: "Skyline Media".into(),
            sector: "Media & Entertainment".into(),
            engagement: Engagement::default(),
        }
    }

    #[test]
    fn selector_wire_form() {
        let s: Selector = serde_json::from_str(r#""all""#).unwrap();
        assert_eq!(s, Selector::All);
        let s: Selector = serde_json::from_str("null").unwrap();
        assert_eq!(s, Selector::All);
        let s: Selector = serde_json::from_str(r#""fortune""#).unwrap();
        assert_eq!(s, Selector::only("fortune"));
        assert_eq!(serde_json::to_string(&Selector::All).unwrap(), r#""all""#);
    }

    #[test]
    fn window_boundary_is_inclusive_at_minute_precision() {
        let f = Filter::new(30);
        let exact = article("a", "x", now() - Duration::days(30));
        let within_minute = article("b", "x", now() - Duration::days(30) - Duration::seconds(59));
        let past_minute = article("c", "x", now() - Duration::days(30) - Duration::seconds(60));
        assert!(f.in_window(&exact, now()));
        assert!(f.in_window(&within_minute, now()));
        assert!(!f.in_window(&past_minute, now()));
    }

    #[test]
    fn baseline_takes_the_preceding_window() {
        let arts = vec![
            article("fresh", "x", now() - Duration::days(3)),
            article("edge", "x", now() - Duration::days(7)),
            article("prior", "x", now() - Duration::days(10)),
            article("ancient", "x", now() - Duration::days(15)),
        ];
        let f = Filter::new(7);
        let ids: Vec<_> = baseline_articles(&arts, &f, now())
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["edge", "prior"]);
    }

    #[test]
    fn previous_day_ignores_window_but_honours_attributes() {
        let time = EvalTime::utc(now());
        let arts = vec![
            article("y1", "x", now() - Duration::hours(20)),
            article("y2", "z", now() - Duration::hours(20)),
            article("today", "x", now() - Duration::hours(1)),
        ];
        let f = Filter::new(1).with_channel("x");
        assert_eq!(previous_day_count(&arts, &f, &time), 1);
        assert_eq!(previous_day_count(&arts, &Filter::new(1), &time), 2);
    }
}
