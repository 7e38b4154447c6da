//src/rest.rs
use crate::suggestion::RestContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Countdown between two sets. Suggestions and fatigue checks are shown while it runs.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestPeriod {
    pub context: RestContext,
    pub started_at: DateTime<Utc>,
    pub planned_seconds: u32,
    pub extended_seconds: u32,
}

impl RestPeriod {
    pub const fn start(context: RestContext, planned_seconds: u32, started_at: DateTime<Utc>) -> Self {
        Self {
            context,
            started_at,
            planned_seconds,
            extended_seconds: 0,
        }
    }

    pub const fn total_seconds(&self) -> u32 {
        self.planned_seconds.saturating_add(self.extended_seconds)
    }

    /// Seconds since start, clamped at zero when `now` precedes the start.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u32 {
        let elapsed = (now - self.started_at).num_seconds().max(0);
        u32::try_from(elapsed).unwrap_or(u32::MAX)
    }

    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> u32 {
        self.total_seconds()
            .saturating_sub(self.elapsed_seconds(now))
    }

    pub fn is_complete(&self, now: DateTime<Utc>) -> bool {
        self.remaining_seconds(now) == 0
    }

    /// Adds time to the running countdown, e.g. the "+30s" button.
    pub fn extend(&mut self, seconds: u32) {
        self.extended_seconds = self.extended_seconds.saturating_add(seconds);
    }

    /// Remaining time as `m:ss`.
    pub fn format_remaining(&self, now: DateTime<Utc>) -> String {
        format_clock(self.remaining_seconds(now))
    }
}

pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
