//! SM-2 style review scheduling.
//!
//! `schedule` is a pure function of `(card, quality, now, config)`; it never
//! reads ambient state, so replaying the same review twice produces the same
//! card twice. Duplicate-submission guarding is the caller's job (the
//! session layer keeps a window of client event ids).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::{MemorizationStatus, VerseCard};

/// Scheduler errors.
#[derive(Debug, Error, PartialEq)]
pub enum SchedulerError {
    /// Quality score outside the 0-5 ordinal range. The card is left
    /// unmodified.
    #[error("invalid quality score {0}: expected 0-5")]
    InvalidQuality(u8),
}

/// Recall quality for one review, on the classic 0-5 scale.
///
/// Grades below `Good` are failing: the card lapses back to short
/// intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// Complete blackout, no recall.
    Blackout,
    /// Incorrect, but recognized once seen.
    Incorrect,
    /// Incorrect, yet felt easy once seen.
    Hard,
    /// Correct with significant difficulty.
    Good,
    /// Correct with slight hesitation.
    Easy,
    /// Perfect immediate recall.
    Perfect,
}

impl Quality {
    /// Validate a raw ordinal score.
    pub fn from_score(score: u8) -> Result<Self, SchedulerError> {
        match score {
            0 => Ok(Quality::Blackout),
            1 => Ok(Quality::Incorrect),
            2 => Ok(Quality::Hard),
            3 => Ok(Quality::Good),
            4 => Ok(Quality::Easy),
            5 => Ok(Quality::Perfect),
            other => Err(SchedulerError::InvalidQuality(other)),
        }
    }

    pub fn score(&self) -> u8 {
        match self {
            Quality::Blackout => 0,
            Quality::Incorrect => 1,
            Quality::Hard => 2,
            Quality::Good => 3,
            Quality::Easy => 4,
            Quality::Perfect => 5,
        }
    }

    /// Scores below 3 are lapses.
    pub fn is_passing(&self) -> bool {
        self.score() >= 3
    }

    /// Normalized score in [0, 1] for the confidence moving average.
    fn unit_score(&self) -> f64 {
        f64::from(self.score()) / 5.0
    }

    /// Interval multiplier applied on top of the ease factor.
    fn interval_multiplier(&self) -> f64 {
        match self {
            Quality::Blackout | Quality::Incorrect | Quality::Hard => 1.0,
            Quality::Good => 1.0,
            Quality::Easy => 1.05,
            Quality::Perfect => 1.1,
        }
    }

    /// SM-2 ease delta: `0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)`.
    fn ease_delta(&self) -> f64 {
        let q = f64::from(self.score());
        0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02)
    }
}

/// Tunable scheduling constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Ease factor floor; the factor never collapses below this.
    #[serde(default = "default_min_ease")]
    pub min_ease: f64,
    #[serde(default = "default_max_ease")]
    pub max_ease: f64,
    /// Ease assigned to freshly initialized cards.
    #[serde(default = "default_start_ease")]
    pub start_ease: f64,
    /// Interval after the first successful review.
    #[serde(default = "default_first_interval_days")]
    pub first_interval_days: u32,
    /// Interval after the second consecutive successful review.
    #[serde(default = "default_second_interval_days")]
    pub second_interval_days: u32,
    /// Hard cap on interval growth.
    #[serde(default = "default_max_interval_days")]
    pub max_interval_days: u32,
    /// Interval at which a Review card may graduate to Mastered.
    #[serde(default = "default_mastery_threshold_days")]
    pub mastery_threshold_days: u32,
    /// Consecutive successes required for mastery.
    #[serde(default = "default_mastery_reps")]
    pub mastery_reps: u32,
    /// Exponential-moving-average weight for confidence updates.
    #[serde(default = "default_confidence_smoothing")]
    pub confidence_smoothing: f64,
}

fn default_min_ease() -> f64 {
    1.3
}
fn default_max_ease() -> f64 {
    2.5
}
fn default_start_ease() -> f64 {
    2.5
}
fn default_first_interval_days() -> u32 {
    1
}
fn default_second_interval_days() -> u32 {
    6
}
fn default_max_interval_days() -> u32 {
    180
}
fn default_mastery_threshold_days() -> u32 {
    30
}
fn default_mastery_reps() -> u32 {
    5
}
fn default_confidence_smoothing() -> f64 {
    0.3
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_ease: default_min_ease(),
            max_ease: default_max_ease(),
            start_ease: default_start_ease(),
            first_interval_days: default_first_interval_days(),
            second_interval_days: default_second_interval_days(),
            max_interval_days: default_max_interval_days(),
            mastery_threshold_days: default_mastery_threshold_days(),
            mastery_reps: default_mastery_reps(),
            confidence_smoothing: default_confidence_smoothing(),
        }
    }
}

/// Apply one review to a card, producing its next scheduling state.
pub fn schedule(
    card: &VerseCard,
    quality: Quality,
    now: DateTime<Utc>,
    config: &SchedulerConfig,
) -> VerseCard {
    let mut next = card.clone();

    if quality.is_passing() {
        next.repetitions = card.repetitions.saturating_add(1);
        next.interval_days = match next.repetitions {
            1 => config.first_interval_days,
            2 => config.second_interval_days,
            _ => grow_interval(card.interval_days, card.ease_factor, quality, config),
        };
        next.status = advance_status(card.status, &next, config);
    } else {
        // Lapse: back to short intervals. A card that never left New stays
        // New; anything further along falls back to Learning.
        next.repetitions = 0;
        next.lapses = card.lapses.saturating_add(1);
        next.interval_days = config.first_interval_days;
        next.status = match card.status {
            MemorizationStatus::New => MemorizationStatus::New,
            _ => MemorizationStatus::Learning,
        };
    }

    next.ease_factor =
        (card.ease_factor + quality.ease_delta()).clamp(config.min_ease, config.max_ease);
    next.due_at = now + Duration::days(i64::from(next.interval_days));
    next.total_reviews = card.total_reviews + 1;
    next.last_reviewed_at = Some(now);
    next.confidence = (card.confidence
        + config.confidence_smoothing * (quality.unit_score() - card.confidence))
        .clamp(0.0, 1.0);

    next
}

fn grow_interval(
    interval_days: u32,
    ease_factor: f64,
    quality: Quality,
    config: &SchedulerConfig,
) -> u32 {
    let grown = (f64::from(interval_days.max(1)) * ease_factor * quality.interval_multiplier())
        .round() as u32;
    grown.clamp(1, config.max_interval_days)
}

fn advance_status(
    previous: MemorizationStatus,
    next: &VerseCard,
    config: &SchedulerConfig,
) -> MemorizationStatus {
    match previous {
        MemorizationStatus::New => MemorizationStatus::Learning,
        MemorizationStatus::Learning if next.repetitions >= 2 => MemorizationStatus::Review,
        MemorizationStatus::Learning => MemorizationStatus::Learning,
        MemorizationStatus::Review
            if next.interval_days >= config.mastery_threshold_days
                && next.repetitions >= config.mastery_reps =>
        {
            MemorizationStatus::Mastered
        }
        MemorizationStatus::Review => MemorizationStatus::Review,
        MemorizationStatus::Mastered => MemorizationStatus::Mastered,
    }
}
