// src/clock.rs
//! Injected time source. Every range, baseline and "today" computation reads
//! the reference instant from an [`EvalTime`], never from the wall clock.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, used by the binary only.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Frozen clock for tests and reproducible evaluations.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Reference instant plus the timezone used for calendar-day questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalTime {
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
}

impl EvalTime {
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::with_offset(now, Utc.fix())
    }

    pub fn with_offset(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    pub fn from_clock(clock: &dyn Clock, offset: FixedOffset) -> Self {
        Self::with_offset(clock.now(), offset)
    }

    /// Calendar date of `ts` in the reference timezone.
    pub fn local_date(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(self.now)
    }

    /// `YYYY-MM-DD HH:mm` in the reference timezone.
    pub fn format_minute(&self, ts: DateTime<Utc>) -> String {
        ts.with_timezone(&self.offset)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }
}
