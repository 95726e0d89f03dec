//! Deterministic snapshot reconciliation.
//!
//! Merges two independently evolved copies of a user's progress without a
//! server-side transaction log. Resolution is per field group:
//!
//! - items: the copy with the strictly greater `total_reviews` wins; ties
//!   fall to `confidence`, then `last_reviewed_at`. The loser is discarded
//!   whole, never spliced field-by-field, so a merged card can never pair
//!   a fresh ease factor with a stale due date.
//! - streak/goal: derivable aggregates; the more recently computed copy
//!   wins wholesale.
//! - achievements: monotone facts; set union, keeping the earliest
//!   unlock time per id.
//!
//! Every rule is symmetric, so `merge(a, b) == merge(b, a)` and a snapshot
//! merged with itself is unchanged.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::achievements::UnlockedAchievement;
use crate::item::{VerseCard, VerseId};
use crate::streak::{DailyGoal, StreakState};
use crate::sync::types::ProgressSnapshot;

/// Merge two snapshots into the reconciled state both sides converge to.
pub fn merge_snapshots(local: &ProgressSnapshot, remote: &ProgressSnapshot) -> ProgressSnapshot {
    ProgressSnapshot {
        items: merge_items(&local.items, &remote.items),
        streak: merge_streaks(&local.streak, &remote.streak),
        goal: merge_goals(&local.goal, &remote.goal),
        achievements: merge_achievements(&local.achievements, &remote.achievements),
    }
}

fn merge_items(local: &[VerseCard], remote: &[VerseCard]) -> Vec<VerseCard> {
    let mut merged: BTreeMap<VerseId, VerseCard> = BTreeMap::new();
    for card in local.iter().chain(remote) {
        match merged.get(&card.id) {
            Some(existing) if dominance(existing, card) != Ordering::Less => {}
            _ => {
                merged.insert(card.id, card.clone());
            }
        }
    }
    merged.into_values().collect()
}

/// Which of two copies of the same verse carries the more complete
/// history. `total_reviews` strictly increases per review and never
/// resets, which makes it the primary dominance signal.
pub fn dominance(a: &VerseCard, b: &VerseCard) -> Ordering {
    a.total_reviews
        .cmp(&b.total_reviews)
        .then_with(|| a.confidence.partial_cmp(&b.confidence).unwrap_or(Ordering::Equal))
        .then_with(|| a.last_reviewed_at.cmp(&b.last_reviewed_at))
        .then_with(|| a.due_at.cmp(&b.due_at))
        .then_with(|| a.repetitions.cmp(&b.repetitions))
        .then_with(|| a.lapses.cmp(&b.lapses))
}

fn merge_streaks(local: &StreakState, remote: &StreakState) -> StreakState {
    let ordering = local
        .last_active_day
        .cmp(&remote.last_active_day)
        .then(local.current.cmp(&remote.current))
        .then(local.longest.cmp(&remote.longest));
    if ordering == Ordering::Less {
        remote.clone()
    } else {
        local.clone()
    }
}

fn merge_goals(local: &DailyGoal, remote: &DailyGoal) -> DailyGoal {
    let ordering = local
        .day
        .cmp(&remote.day)
        .then((local.completed_new + local.completed_review).cmp(&(remote.completed_new + remote.completed_review)));
    if ordering == Ordering::Less {
        remote.clone()
    } else {
        local.clone()
    }
}

fn merge_achievements(
    local: &[UnlockedAchievement],
    remote: &[UnlockedAchievement],
) -> Vec<UnlockedAchievement> {
    let mut merged: BTreeMap<String, UnlockedAchievement> = BTreeMap::new();
    for unlock in local.iter().chain(remote) {
        merged
            .entry(unlock.id.clone())
            .and_modify(|existing| {
                if unlock.unlocked_at < existing.unlocked_at {
                    existing.unlocked_at = unlock.unlocked_at;
                }
            })
            .or_insert_with(|| unlock.clone());
    }
    merged.into_values().collect()
}
