//! Progress events.
//!
//! Every state change in the store produces an `Event`. The front end
//! drains the pending queue after each mutation; nothing dispatches
//! ambiently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::day::DayKey;
use crate::item::{MemorizationStatus, VerseId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A review was applied to a verse.
    ReviewRecorded {
        id: VerseId,
        quality: u8,
        status: MemorizationStatus,
        interval_days: u32,
        due_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// The due queue changed (review recorded or snapshot merged).
    DueItemsChanged {
        due_count: usize,
        at: DateTime<Utc>,
    },
    /// Streak length changed. `celebrate` marks the first activity of a
    /// new streak length.
    StreakUpdated {
        current: u32,
        longest: u32,
        celebrate: bool,
        at: DateTime<Utc>,
    },
    /// Both daily targets were met for the first time today.
    GoalCompleted {
        day: DayKey,
        at: DateTime<Utc>,
    },
    /// An achievement rule became satisfied.
    AchievementUnlocked {
        id: String,
        name: String,
        at: DateTime<Utc>,
    },
    /// A sync cycle finished.
    SyncCompleted {
        pulled: bool,
        pushed: bool,
        at: DateTime<Utc>,
    },
}
