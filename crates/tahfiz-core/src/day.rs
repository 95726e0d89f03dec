//! Study-day resolution.
//!
//! Streaks and daily goals are keyed by *study day*, not calendar day: a
//! configurable offset shifts the day boundary past local midnight so a
//! late-night session still counts toward the evening's day.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A date-only key identifying one study day for one user.
///
/// Two timestamps map to the same `DayKey` iff they fall within the same
/// user-local study day. Construction is pure: the same inputs always
/// produce the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

/// Day-boundary configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DayConfig {
    /// User timezone as minutes east of UTC.
    #[serde(default)]
    pub tz_offset_minutes: i32,
    /// Minutes after local midnight at which a new study day begins.
    #[serde(default)]
    pub day_start_offset_minutes: i32,
}

impl Default for DayConfig {
    fn default() -> Self {
        Self {
            tz_offset_minutes: 0,
            day_start_offset_minutes: 0,
        }
    }
}

impl DayKey {
    /// Resolve the study day a timestamp belongs to.
    pub fn from_timestamp(ts: DateTime<Utc>, config: &DayConfig) -> Self {
        let offset = FixedOffset::east_opt(config.tz_offset_minutes * 60)
            .unwrap_or(FixedOffset::east_opt(0).expect("zero offset is valid"));
        let local = ts.with_timezone(&offset);
        let shifted = local - Duration::minutes(config.day_start_offset_minutes as i64);
        DayKey(shifted.date_naive())
    }

    /// The day immediately after this one.
    pub fn succ(&self) -> DayKey {
        DayKey(self.0.succ_opt().unwrap_or(self.0))
    }

    /// Signed whole days from `self` to `other`.
    pub fn days_until(&self, other: DayKey) -> i64 {
        (other.0 - self.0).num_days()
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl std::fmt::Display for DayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
