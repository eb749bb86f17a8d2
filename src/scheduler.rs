// src/scheduler.rs
//! Scheduler load aggregation: element-wise sum of the selected jobs'
//! 24-slot hourly load profiles.

use serde::Serialize;

use crate::filter::Selector;
use crate::model::{ScheduleJob, HOURS_PER_DAY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HourlyTotals {
    pub hour: u8,
    pub success: u64,
    pub queued: u64,
    pub failed: u64,
}

impl HourlyTotals {
    pub fn total(&self) -> u64 {
        self.success
            .saturating_add(self.queued)
            .saturating_add(self.failed)
    }
}

impl ScheduleJob {
    /// True when the selector is `All` or names this job's channel by id or display name.
    pub fn serves(&self, selector: &Selector) -> bool {
        match selector {
            Selector::All => true,
            Selector::Only(v) => self.channel_id == *v || self.channel_name == *v,
        }
    }
}

/// Always 24 entries, hours 0..=23 in order, zeros when nothing matches.
pub fn scheduler_hourly_metrics(
    jobs: &[ScheduleJob],
    selector: &Selector,
) -> [HourlyTotals; HOURS_PER_DAY] {
    let mut totals: [HourlyTotals; HOURS_PER_DAY] = std::array::from_fn(|h| HourlyTotals {
        hour: h as u8,
        ..HourlyTotals::default()
    });

    for job in jobs.iter().filter(|j| j.serves(selector)) {
        for (slot, acc) in job.hourly_load.iter().zip(totals.iter_mut()) {
            acc.success = acc.success.saturating_add(slot.success);
            acc.queued = acc.queued.saturating_add(slot.queued);
            acc.failed = acc.failed.saturating_add(slot.failed);
        }
    }

    totals
}

/// True when at least one hour saw any execution.
pub fn has_load(totals: &[HourlyTotals]) -> bool {
    totals.iter().any(|t| t.total() > 0)
}
