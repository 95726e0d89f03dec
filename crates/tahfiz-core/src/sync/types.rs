//! Core types for snapshot synchronization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::achievements::UnlockedAchievement;
use crate::item::VerseCard;
use crate::streak::{DailyGoal, StreakState};

/// Full progress state for one user, as exchanged with the remote store
/// and persisted locally. The sync layer moves snapshots around whole;
/// interpretation belongs to the per-field merge rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub items: Vec<VerseCard>,
    pub streak: StreakState,
    pub goal: DailyGoal,
    pub achievements: Vec<UnlockedAchievement>,
}

impl ProgressSnapshot {
    /// An empty snapshot for a fresh user.
    pub fn empty(target_new: u32, target_review: u32) -> Self {
        Self {
            items: Vec::new(),
            streak: StreakState::default(),
            goal: DailyGoal::new(target_new, target_review),
            achievements: Vec::new(),
        }
    }
}

/// What the server returns on pull.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullResponse {
    #[serde(flatten)]
    pub snapshot: ProgressSnapshot,
    pub server_timestamp: DateTime<Utc>,
}

/// Current sync status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Last successful sync timestamp.
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Whether local mutations are waiting to be pushed.
    pub dirty: bool,
    /// Whether a sync is currently in progress.
    pub in_progress: bool,
}

/// Sync error types. Never surfaced as blocking errors to the review
/// flow; a failed sync leaves local state untouched.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Sync unavailable: {0}")]
    Unavailable(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned status {0}")]
    Http(u16),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_round_trip() {
        let snapshot = ProgressSnapshot::empty(5, 20);
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: ProgressSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_pull_response_flattens_snapshot() {
        let response = PullResponse {
            snapshot: ProgressSnapshot::empty(5, 20),
            server_timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("items").is_some());
        assert!(json.get("streak").is_some());
        assert!(json.get("server_timestamp").is_some());
        assert!(json.get("snapshot").is_none());
    }
}
