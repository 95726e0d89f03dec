//! Achievement rule table.
//!
//! Each rule is a pure predicate over an aggregate view of progress.
//! After every mutation batch the store evaluates the not-yet-unlocked
//! rules; a newly satisfied rule is recorded once and never revoked or
//! re-emitted.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate progress facts the predicates are allowed to see.
#[derive(Debug, Clone)]
pub struct ProgressView<'a> {
    /// Verses with at least one recorded review.
    pub verses_started: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Surahs where every ayah has reached Review or Mastered.
    pub completed_surahs: &'a BTreeSet<u16>,
    /// Juz where every ayah has reached Review or Mastered.
    pub completed_juz: &'a BTreeSet<u8>,
}

/// One achievement rule.
pub struct AchievementRule {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    predicate: fn(&ProgressView<'_>) -> bool,
}

/// A recorded unlock. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub id: String,
    pub unlocked_at: DateTime<Utc>,
}

fn streak_at_least(view: &ProgressView<'_>, days: u32) -> bool {
    view.current_streak >= days || view.longest_streak >= days
}

fn verses_at_least(view: &ProgressView<'_>, count: usize) -> bool {
    view.verses_started >= count
}

/// The full rule catalog, in display order.
pub const CATALOG: &[AchievementRule] = &[
    AchievementRule {
        id: "streak_7",
        name: "Week Warrior",
        description: "7 day streak",
        predicate: |v| streak_at_least(v, 7),
    },
    AchievementRule {
        id: "streak_30",
        name: "Monthly Master",
        description: "30 day streak",
        predicate: |v| streak_at_least(v, 30),
    },
    AchievementRule {
        id: "streak_100",
        name: "Century Club",
        description: "100 day streak",
        predicate: |v| streak_at_least(v, 100),
    },
    AchievementRule {
        id: "streak_365",
        name: "Year of Dedication",
        description: "365 day streak",
        predicate: |v| streak_at_least(v, 365),
    },
    AchievementRule {
        id: "first_verse",
        name: "First Step",
        description: "Started your first verse",
        predicate: |v| verses_at_least(v, 1),
    },
    AchievementRule {
        id: "verses_10",
        name: "Getting Started",
        description: "10 verses in progress",
        predicate: |v| verses_at_least(v, 10),
    },
    AchievementRule {
        id: "verses_50",
        name: "Growing Strong",
        description: "50 verses in progress",
        predicate: |v| verses_at_least(v, 50),
    },
    AchievementRule {
        id: "verses_100",
        name: "Centurion",
        description: "100 verses in progress",
        predicate: |v| verses_at_least(v, 100),
    },
    AchievementRule {
        id: "verses_500",
        name: "Scholar",
        description: "500 verses in progress",
        predicate: |v| verses_at_least(v, 500),
    },
    AchievementRule {
        id: "verses_1000",
        name: "Rising Star",
        description: "1000 verses in progress",
        predicate: |v| verses_at_least(v, 1000),
    },
    AchievementRule {
        id: "first_surah",
        name: "Surah Complete",
        description: "Completed your first surah",
        predicate: |v| !v.completed_surahs.is_empty(),
    },
    AchievementRule {
        id: "fatihah",
        name: "The Opening",
        description: "Memorized Al-Faatiha",
        predicate: |v| v.completed_surahs.contains(&1),
    },
    AchievementRule {
        id: "kahf",
        name: "The Cave",
        description: "Memorized Al-Kahf",
        predicate: |v| v.completed_surahs.contains(&18),
    },
    AchievementRule {
        id: "yasin",
        name: "Heart of the Quran",
        description: "Memorized Yaseen",
        predicate: |v| v.completed_surahs.contains(&36),
    },
    AchievementRule {
        id: "mulk",
        name: "The Sovereignty",
        description: "Memorized Al-Mulk",
        predicate: |v| v.completed_surahs.contains(&67),
    },
    AchievementRule {
        id: "first_juz",
        name: "Juz Complete",
        description: "Completed your first juz",
        predicate: |v| !v.completed_juz.is_empty(),
    },
    AchievementRule {
        id: "juz_30",
        name: "Juz Amma Master",
        description: "Completed Juz 30",
        predicate: |v| v.completed_juz.contains(&30),
    },
];

/// Look up a rule by id.
pub fn rule(id: &str) -> Option<&'static AchievementRule> {
    CATALOG.iter().find(|r| r.id == id)
}

/// Evaluate all not-yet-unlocked rules against a snapshot view.
///
/// Returns the newly satisfied rules; already-unlocked ids are skipped, so
/// re-evaluation never double-emits.
pub fn evaluate<'c>(
    view: &ProgressView<'_>,
    unlocked: &BTreeMap<String, DateTime<Utc>>,
) -> Vec<&'c AchievementRule> {
    CATALOG
        .iter()
        .filter(|rule| !unlocked.contains_key(rule.id))
        .filter(|rule| (rule.predicate)(view))
        .collect()
}
