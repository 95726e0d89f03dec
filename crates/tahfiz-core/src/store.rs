//! Authoritative progress state for one user.
//!
//! The store owns every verse card, the streak, the daily goal, and the
//! unlocked achievement set. `record_review` is the single mutation entry
//! point: it routes through the scheduler, then the streak and goal
//! trackers, then the achievement engine, and finally marks the store
//! dirty for sync. Consumers drain the pending event queue after each
//! mutation.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::achievements::{self, ProgressView, UnlockedAchievement};
use crate::day::{DayConfig, DayKey};
use crate::events::Event;
use crate::item::{MemorizationStatus, VerseCard, VerseId};
use crate::quran;
use crate::scheduler::{schedule, Quality, SchedulerConfig};
use crate::streak::{DailyGoal, GoalKind, StreakState};
use crate::sync::types::ProgressSnapshot;

/// Days of per-day activity history kept locally.
const ACTIVITY_RETENTION_DAYS: i64 = 90;

/// Store-level configuration, assembled from the app config.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub scheduler: SchedulerConfig,
    pub day: DayConfig,
    pub goal_target_new: u32,
    pub goal_target_review: u32,
}

/// Per-day activity counters. Local-only; not part of the sync payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayActivity {
    pub day: DayKey,
    /// First-ever reviews of a verse.
    pub new_reviews: u32,
    /// Repeat reviews of known material.
    pub repeat_reviews: u32,
}

/// Aggregate counts for one surah or juz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeProgress {
    pub total_ayahs: u32,
    pub started: u32,
    pub learning: u32,
    pub review: u32,
    pub mastered: u32,
    /// Share of ayahs at Review or Mastered, in [0, 100].
    pub percent: f64,
    pub complete: bool,
}

/// Overview numbers for the stats surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub tracked_verses: usize,
    pub started_verses: usize,
    pub learning: usize,
    pub review: usize,
    pub mastered: usize,
    pub due_now: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub quran_percent: f64,
}

/// The authoritative in-memory progress state.
pub struct ProgressStore {
    config: StoreConfig,
    cards: HashMap<VerseId, VerseCard>,
    streak: StreakState,
    goal: DailyGoal,
    unlocked: BTreeMap<String, DateTime<Utc>>,
    activity: Vec<DayActivity>,
    events: Vec<Event>,
    dirty: bool,
}

impl ProgressStore {
    pub fn new(config: StoreConfig) -> Self {
        let goal = DailyGoal::new(config.goal_target_new, config.goal_target_review);
        Self {
            config,
            cards: HashMap::new(),
            streak: StreakState::default(),
            goal,
            unlocked: BTreeMap::new(),
            activity: Vec::new(),
            events: Vec::new(),
            dirty: false,
        }
    }

    /// Rebuild a store from a persisted or merged snapshot.
    pub fn from_snapshot(config: StoreConfig, snapshot: ProgressSnapshot) -> Self {
        let mut store = Self::new(config);
        store.install_snapshot(snapshot);
        store.dirty = false;
        store.events.clear();
        store
    }

    /// Record one review. The single mutation entry point.
    ///
    /// Unknown verse ids auto-initialize to a fresh New card; every
    /// (surah, ayah) pair is a valid target.
    pub fn record_review(&mut self, id: VerseId, quality: Quality, now: DateTime<Utc>) -> VerseCard {
        let today = DayKey::from_timestamp(now, &self.config.day);
        let start_ease = self.config.scheduler.start_ease;
        let card = self
            .cards
            .entry(id)
            .or_insert_with(|| VerseCard::new(id, now, start_ease));
        let first_review = card.total_reviews == 0;

        let next = schedule(card, quality, now, &self.config.scheduler);
        *card = next.clone();
        debug!(
            "review {id} q={} -> {} interval={}d",
            quality.score(),
            next.status.label(),
            next.interval_days
        );

        self.events.push(Event::ReviewRecorded {
            id,
            quality: quality.score(),
            status: next.status,
            interval_days: next.interval_days,
            due_at: next.due_at,
            at: now,
        });
        let due_count = self.due_count(now);
        self.events.push(Event::DueItemsChanged { due_count, at: now });

        let outcome = self.streak.activity(today);
        if outcome.changed {
            self.events.push(Event::StreakUpdated {
                current: self.streak.current,
                longest: self.streak.longest,
                celebrate: true,
                at: now,
            });
        }

        let kind = if first_review { GoalKind::New } else { GoalKind::Review };
        if self.goal.record(kind, today) {
            self.events.push(Event::GoalCompleted { day: today, at: now });
        }

        self.record_activity(today, kind);
        self.check_achievements(now);
        self.dirty = true;
        next
    }

    /// Cards due at `now`, most overdue first; equally-due cards surface
    /// New before Review before Mastered.
    pub fn query_due(&self, now: DateTime<Utc>, limit: usize) -> Vec<&VerseCard> {
        let mut due: Vec<&VerseCard> = self
            .cards
            .values()
            .filter(|card| card.is_due(now))
            .collect();
        due.sort_by(|a, b| {
            a.due_at
                .cmp(&b.due_at)
                .then(a.status.rank().cmp(&b.status.rank()))
                .then(a.id.cmp(&b.id))
        });
        due.truncate(limit);
        due
    }

    fn due_count(&self, now: DateTime<Utc>) -> usize {
        self.cards.values().filter(|card| card.is_due(now)).count()
    }

    /// Aggregate progress for one surah. O(ayahs in the surah).
    pub fn surah_progress(&self, surah: u16) -> Option<ScopeProgress> {
        quran::ayah_count(surah)?;
        Some(self.scope_progress(quran::surah_verses(surah)))
    }

    /// Aggregate progress for one juz. O(ayahs in the juz).
    pub fn juz_progress(&self, juz: u8) -> Option<ScopeProgress> {
        let range = quran::juz_range(juz)?;
        Some(self.scope_progress(range.verses()))
    }

    fn scope_progress(&self, verses: impl Iterator<Item = VerseId>) -> ScopeProgress {
        let mut progress = ScopeProgress {
            total_ayahs: 0,
            started: 0,
            learning: 0,
            review: 0,
            mastered: 0,
            percent: 0.0,
            complete: false,
        };
        for id in verses {
            progress.total_ayahs += 1;
            let Some(card) = self.cards.get(&id) else { continue };
            if card.total_reviews > 0 {
                progress.started += 1;
            }
            match card.status {
                MemorizationStatus::Learning => progress.learning += 1,
                MemorizationStatus::Review => progress.review += 1,
                MemorizationStatus::Mastered => progress.mastered += 1,
                MemorizationStatus::New => {}
            }
        }
        let retained = progress.review + progress.mastered;
        if progress.total_ayahs > 0 {
            progress.percent = f64::from(retained) / f64::from(progress.total_ayahs) * 100.0;
        }
        progress.complete = progress.total_ayahs > 0 && retained == progress.total_ayahs;
        progress
    }

    /// Overview statistics.
    pub fn stats(&self, now: DateTime<Utc>) -> StoreStats {
        let mut learning = 0;
        let mut review = 0;
        let mut mastered = 0;
        let mut started = 0;
        for card in self.cards.values() {
            if card.total_reviews > 0 {
                started += 1;
            }
            match card.status {
                MemorizationStatus::Learning => learning += 1,
                MemorizationStatus::Review => review += 1,
                MemorizationStatus::Mastered => mastered += 1,
                MemorizationStatus::New => {}
            }
        }
        StoreStats {
            tracked_verses: self.cards.len(),
            started_verses: started,
            learning,
            review,
            mastered,
            due_now: self.due_count(now),
            current_streak: self.streak.current,
            longest_streak: self.streak.longest,
            quran_percent: started as f64 / f64::from(quran::TOTAL_VERSES) * 100.0,
        }
    }

    pub fn card(&self, id: VerseId) -> Option<&VerseCard> {
        self.cards.get(&id)
    }

    pub fn streak(&self) -> &StreakState {
        &self.streak
    }

    /// Daily goal with counters rolled over to the current study day.
    pub fn goal_for(&self, now: DateTime<Utc>) -> DailyGoal {
        let mut goal = self.goal.clone();
        goal.rollover(DayKey::from_timestamp(now, &self.config.day));
        goal
    }

    pub fn unlocked_achievements(&self) -> &BTreeMap<String, DateTime<Utc>> {
        &self.unlocked
    }

    /// Per-day activity for the last `days` study days.
    pub fn recent_activity(&self, days: i64, now: DateTime<Utc>) -> Vec<&DayActivity> {
        let today = DayKey::from_timestamp(now, &self.config.day);
        self.activity
            .iter()
            .filter(|entry| entry.day.days_until(today) < days)
            .collect()
    }

    /// Drain pending events in emission order.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Whether local mutations are waiting to be synced.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Serialize the full state for persistence or upload. Items are
    /// emitted in mushaf order so equal states serialize identically.
    pub fn snapshot(&self) -> ProgressSnapshot {
        let mut items: Vec<VerseCard> = self.cards.values().cloned().collect();
        items.sort_by_key(|card| card.id);
        ProgressSnapshot {
            items,
            streak: self.streak.clone(),
            goal: self.goal.clone(),
            achievements: self
                .unlocked
                .iter()
                .map(|(id, &unlocked_at)| UnlockedAchievement {
                    id: id.clone(),
                    unlocked_at,
                })
                .collect(),
        }
    }

    /// Swap in a merged snapshot as the new local baseline and queue a
    /// push so the merge outcome propagates back to the remote store.
    pub fn apply_merged(&mut self, snapshot: ProgressSnapshot, now: DateTime<Utc>) {
        self.install_snapshot(snapshot);
        let due_count = self.due_count(now);
        self.events.push(Event::DueItemsChanged { due_count, at: now });
        self.dirty = true;
    }

    /// Report a finished sync cycle to event consumers.
    pub fn note_sync(&mut self, pulled: bool, pushed: bool, now: DateTime<Utc>) {
        self.events.push(Event::SyncCompleted { pulled, pushed, at: now });
    }

    fn install_snapshot(&mut self, snapshot: ProgressSnapshot) {
        self.cards = snapshot
            .items
            .into_iter()
            .map(|card| (card.id, card))
            .collect();
        self.streak = snapshot.streak;
        self.goal = snapshot.goal;
        self.unlocked = snapshot
            .achievements
            .into_iter()
            .map(|a| (a.id, a.unlocked_at))
            .collect();
    }

    fn record_activity(&mut self, today: DayKey, kind: GoalKind) {
        let entry = match self.activity.iter_mut().find(|entry| entry.day == today) {
            Some(entry) => entry,
            None => {
                self.activity.push(DayActivity {
                    day: today,
                    new_reviews: 0,
                    repeat_reviews: 0,
                });
                self.activity.sort_by_key(|entry| entry.day);
                self.activity
                    .retain(|entry| entry.day.days_until(today) < ACTIVITY_RETENTION_DAYS);
                self.activity
                    .iter_mut()
                    .find(|entry| entry.day == today)
                    .expect("entry just inserted")
            }
        };
        match kind {
            GoalKind::New => entry.new_reviews += 1,
            GoalKind::Review => entry.repeat_reviews += 1,
        }
    }

    fn check_achievements(&mut self, now: DateTime<Utc>) {
        let (completed_surahs, completed_juz) = self.completed_scopes();
        let started = self
            .cards
            .values()
            .filter(|card| card.total_reviews > 0)
            .count();
        let view = ProgressView {
            verses_started: started,
            current_streak: self.streak.current,
            longest_streak: self.streak.longest,
            completed_surahs: &completed_surahs,
            completed_juz: &completed_juz,
        };
        let newly: Vec<(&str, &str)> = achievements::evaluate(&view, &self.unlocked)
            .into_iter()
            .map(|rule| (rule.id, rule.name))
            .collect();
        for (id, name) in newly {
            self.unlocked.insert(id.to_string(), now);
            self.events.push(Event::AchievementUnlocked {
                id: id.to_string(),
                name: name.to_string(),
                at: now,
            });
        }
    }

    /// Surahs and juz where every ayah has reached Review or Mastered.
    fn completed_scopes(&self) -> (BTreeSet<u16>, BTreeSet<u8>) {
        let mut per_surah: HashMap<u16, u32> = HashMap::new();
        let mut per_juz: HashMap<u8, u32> = HashMap::new();
        for card in self.cards.values() {
            if matches!(
                card.status,
                MemorizationStatus::Review | MemorizationStatus::Mastered
            ) {
                *per_surah.entry(card.id.surah).or_default() += 1;
                if let Some(juz) = quran::juz_for(card.id) {
                    *per_juz.entry(juz).or_default() += 1;
                }
            }
        }

        let surahs = per_surah
            .into_iter()
            .filter(|&(surah, retained)| {
                quran::ayah_count(surah).is_some_and(|total| retained == u32::from(total))
            })
            .map(|(surah, _)| surah)
            .collect();
        let juz = per_juz
            .into_iter()
            .filter(|&(juz, retained)| {
                quran::juz_range(juz)
                    .is_some_and(|range| retained as usize == range.verses().count())
            })
            .map(|(juz, _)| juz)
            .collect();
        (surahs, juz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn store() -> ProgressStore {
        ProgressStore::new(StoreConfig {
            goal_target_new: 1,
            goal_target_review: 1,
            ..StoreConfig::default()
        })
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_record_review_auto_initializes_unknown_verse() {
        let mut store = store();
        let card = store.record_review(VerseId::new(1, 1), Quality::Good, t0());
        assert_eq!(card.status, MemorizationStatus::Learning);
        assert_eq!(card.total_reviews, 1);
        assert!(store.is_dirty());
    }

    #[test]
    fn test_record_review_emits_events_in_order() {
        let mut store = store();
        store.record_review(VerseId::new(1, 1), Quality::Good, t0());

        let events = store.drain_events();
        assert!(matches!(events[0], Event::ReviewRecorded { .. }));
        assert!(matches!(events[1], Event::DueItemsChanged { .. }));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::StreakUpdated { current: 1, .. })));
        // first_verse achievement unlocks on the very first review
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::AchievementUnlocked { id, .. } if id == "first_verse")));
        // Drained: queue is now empty.
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn test_same_day_reviews_do_not_reemit_streak() {
        let mut store = store();
        store.record_review(VerseId::new(1, 1), Quality::Good, t0());
        store.drain_events();

        store.record_review(VerseId::new(1, 2), Quality::Good, t0() + Duration::hours(1));
        let events = store.drain_events();
        assert!(!events.iter().any(|e| matches!(e, Event::StreakUpdated { .. })));
        assert_eq!(store.streak().current, 1);
    }

    #[test]
    fn test_goal_completion_fires_once_per_day() {
        let mut store = store();
        // Targets are 1 new + 1 review. First review of 1:1 is "new";
        // the second (same verse, now known) counts as review work.
        store.record_review(VerseId::new(1, 1), Quality::Good, t0());
        store.record_review(VerseId::new(1, 1), Quality::Good, t0() + Duration::minutes(5));
        let events = store.drain_events();
        let completions = events
            .iter()
            .filter(|e| matches!(e, Event::GoalCompleted { .. }))
            .count();
        assert_eq!(completions, 1);

        store.record_review(VerseId::new(1, 2), Quality::Good, t0() + Duration::minutes(10));
        assert!(!store
            .drain_events()
            .iter()
            .any(|e| matches!(e, Event::GoalCompleted { .. })));
    }

    #[test]
    fn test_query_due_orders_overdue_first_then_status() {
        let mut store = store();
        let now = t0();

        // Reviewed yesterday with a 1-day interval: due exactly now.
        store.record_review(VerseId::new(2, 1), Quality::Good, now - Duration::days(1));
        // Reviewed 3 days ago: more overdue, surfaces first.
        store.record_review(VerseId::new(2, 2), Quality::Good, now - Duration::days(3));
        // Never reviewed: due at insertion time (36 hours ago), status New.
        store
            .cards
            .insert(VerseId::new(2, 3), VerseCard::new(VerseId::new(2, 3), now - Duration::hours(36), 2.5));

        let due: Vec<VerseId> = store.query_due(now, 10).iter().map(|c| c.id).collect();
        assert_eq!(
            due,
            vec![VerseId::new(2, 2), VerseId::new(2, 3), VerseId::new(2, 1)]
        );

        let limited = store.query_due(now, 1);
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_due_ties_surface_new_before_review() {
        let mut store = store();
        let now = t0();
        let due_at = now - Duration::days(1);

        let mut reviewed = VerseCard::new(VerseId::new(3, 1), due_at, 2.5);
        reviewed.status = MemorizationStatus::Review;
        reviewed.due_at = due_at;
        let fresh = VerseCard::new(VerseId::new(3, 2), due_at, 2.5);

        store.cards.insert(reviewed.id, reviewed);
        store.cards.insert(fresh.id, fresh);

        let due: Vec<VerseId> = store.query_due(now, 10).iter().map(|c| c.id).collect();
        assert_eq!(due, vec![VerseId::new(3, 2), VerseId::new(3, 1)]);
    }

    #[test]
    fn test_surah_progress_counts() {
        let mut store = store();
        let now = t0();
        // Surah 103 has 3 ayahs. Take two of them to Review.
        for ayah in 1..=2 {
            let id = VerseId::new(103, ayah);
            store.record_review(id, Quality::Good, now);
            store.record_review(id, Quality::Good, now + Duration::days(1));
        }

        let progress = store.surah_progress(103).unwrap();
        assert_eq!(progress.total_ayahs, 3);
        assert_eq!(progress.started, 2);
        assert_eq!(progress.review, 2);
        assert!(!progress.complete);
        assert!((progress.percent - 66.666).abs() < 0.1);

        assert!(store.surah_progress(200).is_none());
    }

    #[test]
    fn test_completing_surah_unlocks_achievements() {
        let mut store = store();
        let now = t0();
        // Drive all 3 ayahs of surah 103 to Review status.
        for ayah in 1..=3 {
            let id = VerseId::new(103, ayah);
            store.record_review(id, Quality::Good, now);
            store.record_review(id, Quality::Good, now + Duration::days(1));
        }

        let unlocked = store.unlocked_achievements();
        assert!(unlocked.contains_key("first_surah"));
        assert!(!unlocked.contains_key("fatihah"));

        let progress = store.surah_progress(103).unwrap();
        assert!(progress.complete);
    }

    #[test]
    fn test_snapshot_round_trip_preserves_state() {
        let mut store = store();
        let now = t0();
        store.record_review(VerseId::new(1, 1), Quality::Good, now);
        store.record_review(VerseId::new(1, 2), Quality::Hard, now);

        let snapshot = store.snapshot();
        let restored = ProgressStore::from_snapshot(StoreConfig::default(), snapshot.clone());

        assert_eq!(restored.snapshot(), snapshot);
        assert!(!restored.is_dirty());
    }

    #[test]
    fn test_apply_merged_marks_dirty_and_signals_due_change() {
        let mut store = store();
        let now = t0();
        store.record_review(VerseId::new(1, 1), Quality::Good, now);
        store.clear_dirty();
        store.drain_events();

        let mut snapshot = store.snapshot();
        snapshot.items[0].total_reviews = 10;
        store.apply_merged(snapshot, now);

        assert!(store.is_dirty());
        assert_eq!(store.card(VerseId::new(1, 1)).unwrap().total_reviews, 10);
        assert!(store
            .drain_events()
            .iter()
            .any(|e| matches!(e, Event::DueItemsChanged { .. })));
    }

    #[test]
    fn test_activity_log_tracks_new_vs_repeat() {
        let mut store = store();
        let now = t0();
        store.record_review(VerseId::new(1, 1), Quality::Good, now);
        store.record_review(VerseId::new(1, 1), Quality::Good, now + Duration::hours(1));
        store.record_review(VerseId::new(1, 2), Quality::Good, now + Duration::hours(2));

        let recent = store.recent_activity(7, now + Duration::hours(3));
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].new_reviews, 2);
        assert_eq!(recent[0].repeat_reviews, 1);
    }

    #[test]
    fn test_streak_across_days_via_store() {
        let mut store = store();
        let now = t0();
        store.record_review(VerseId::new(1, 1), Quality::Good, now);
        store.record_review(VerseId::new(1, 1), Quality::Good, now + Duration::days(1));
        store.record_review(VerseId::new(1, 1), Quality::Good, now + Duration::days(2));
        assert_eq!(store.streak().current, 3);

        store.record_review(VerseId::new(1, 1), Quality::Good, now + Duration::days(5));
        assert_eq!(store.streak().current, 1);
        assert_eq!(store.streak().longest, 3);
    }
}
