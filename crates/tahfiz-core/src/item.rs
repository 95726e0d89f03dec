//! Per-verse memorization state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Composite key for one memorization unit: a (surah, ayah) pair.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct VerseId {
    pub surah: u16,
    pub ayah: u16,
}

impl VerseId {
    pub fn new(surah: u16, ayah: u16) -> Self {
        Self { surah, ayah }
    }
}

impl std::fmt::Display for VerseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.surah, self.ayah)
    }
}

impl std::str::FromStr for VerseId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (surah, ayah) = s
            .split_once(':')
            .ok_or_else(|| format!("expected surah:ayah, got '{s}'"))?;
        Ok(Self {
            surah: surah.parse().map_err(|_| format!("invalid surah '{surah}'"))?,
            ayah: ayah.parse().map_err(|_| format!("invalid ayah '{ayah}'"))?,
        })
    }
}

/// Lifecycle stage of a verse.
///
/// Advances New -> Learning -> Review -> Mastered on successful reviews and
/// falls back to Learning on a lapse.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MemorizationStatus {
    New,
    Learning,
    Review,
    Mastered,
}

impl MemorizationStatus {
    /// Ordering rank used by due-queue sorting (New surfaces first among
    /// equally-due cards).
    pub fn rank(&self) -> u8 {
        match self {
            MemorizationStatus::New => 0,
            MemorizationStatus::Learning => 1,
            MemorizationStatus::Review => 2,
            MemorizationStatus::Mastered => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MemorizationStatus::New => "new",
            MemorizationStatus::Learning => "learning",
            MemorizationStatus::Review => "review",
            MemorizationStatus::Mastered => "mastered",
        }
    }
}

/// Scheduling state for one verse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseCard {
    pub id: VerseId,
    pub status: MemorizationStatus,
    /// Interval-growth multiplier, never below the configured floor.
    pub ease_factor: f64,
    /// Days between the last review and `due_at`.
    pub interval_days: u32,
    /// The card is due once `now >= due_at`.
    pub due_at: DateTime<Utc>,
    /// Consecutive non-lapsing reviews since the last lapse.
    pub repetitions: u32,
    /// Lifetime count of failing reviews.
    pub lapses: u32,
    /// Recency-weighted recall score in [0, 1]; merge tie-breaker.
    pub confidence: f64,
    /// Lifetime review count. Strictly increases by one per recorded
    /// review and never resets, which makes it safe as the sync merge
    /// dominance signal.
    pub total_reviews: u64,
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl VerseCard {
    /// A never-reviewed card, due immediately.
    pub fn new(id: VerseId, now: DateTime<Utc>, start_ease: f64) -> Self {
        Self {
            id,
            status: MemorizationStatus::New,
            ease_factor: start_ease,
            interval_days: 0,
            due_at: now,
            repetitions: 0,
            lapses: 0,
            confidence: 0.0,
            total_reviews: 0,
            last_reviewed_at: None,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.due_at
    }
}
