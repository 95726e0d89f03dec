//! Push/pull orchestration.
//!
//! Local-first: mutations never wait on the network. Each mutation resets
//! a debounce window; once the window lapses the current snapshot is
//! pushed whole. A pull-triggered merge counts as a mutation of its own
//! and supersedes any in-flight push of a now-stale snapshot: the stale
//! push may still land remotely, but its completion no longer clears the
//! pending state, so the merged snapshot is pushed right after.

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};

use crate::sync::client::SyncClient;
use crate::sync::types::{ProgressSnapshot, SyncError, SyncStatus};

const BACKOFF_BASE_SECS: u64 = 2;
const BACKOFF_CAP_SECS: u64 = 300;

/// Identifies the snapshot generation an in-flight push was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushTicket {
    generation: u64,
}

/// Tracks what needs pushing and when.
pub struct SyncCoordinator {
    debounce: Duration,
    max_retries: u32,
    /// Monotone counter of local mutations (including merges).
    generation: u64,
    push_due_at: Option<DateTime<Utc>>,
    last_sync_at: Option<DateTime<Utc>>,
    in_progress: bool,
}

impl SyncCoordinator {
    pub fn new(debounce_secs: u64, max_retries: u32) -> Self {
        Self {
            debounce: Duration::seconds(debounce_secs as i64),
            max_retries,
            generation: 0,
            push_due_at: None,
            last_sync_at: None,
            in_progress: false,
        }
    }

    pub fn with_last_sync(mut self, last_sync_at: Option<DateTime<Utc>>) -> Self {
        self.last_sync_at = last_sync_at;
        self
    }

    /// A local mutation happened: restart the debounce window.
    pub fn notify_mutation(&mut self, now: DateTime<Utc>) {
        self.generation += 1;
        self.push_due_at = Some(now + self.debounce);
    }

    /// A pull+merge completed: the merged snapshot should propagate back
    /// immediately, healing any remote lag.
    pub fn notify_merge(&mut self, now: DateTime<Utc>) {
        self.generation += 1;
        self.push_due_at = Some(now);
    }

    /// Whether the debounce window has lapsed.
    pub fn push_ready(&self, now: DateTime<Utc>) -> bool {
        matches!(self.push_due_at, Some(due) if now >= due) && !self.in_progress
    }

    /// Time remaining until the pending push fires.
    pub fn time_until_push(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.push_due_at
            .map(|due| (due - now).max(Duration::zero()))
    }

    /// Mark a push as started, pinning the snapshot generation it carries.
    pub fn begin_push(&mut self) -> PushTicket {
        self.in_progress = true;
        PushTicket {
            generation: self.generation,
        }
    }

    /// Mark a push as finished. Returns false when the pushed snapshot
    /// was superseded by a later mutation or merge; the pending state is
    /// kept so the newer snapshot goes out next.
    pub fn complete_push(&mut self, ticket: PushTicket, now: DateTime<Utc>) -> bool {
        self.in_progress = false;
        self.last_sync_at = Some(now);
        if ticket.generation == self.generation {
            self.push_due_at = None;
            true
        } else {
            debug!("push superseded (gen {} < {})", ticket.generation, self.generation);
            false
        }
    }

    /// Mark a push as failed; the pending window is kept for retry.
    pub fn fail_push(&mut self, _ticket: PushTicket) {
        self.in_progress = false;
    }

    pub fn last_sync_at(&self) -> Option<DateTime<Utc>> {
        self.last_sync_at
    }

    pub fn status(&self, dirty: bool) -> SyncStatus {
        SyncStatus {
            last_sync_at: self.last_sync_at,
            dirty: dirty || self.push_due_at.is_some(),
            in_progress: self.in_progress,
        }
    }

    /// Exponential backoff delay for retry `attempt` (0-based).
    pub fn backoff_delay(attempt: u32) -> std::time::Duration {
        let secs = BACKOFF_BASE_SECS
            .saturating_mul(1u64 << attempt.min(16))
            .min(BACKOFF_CAP_SECS);
        std::time::Duration::from_secs(secs)
    }

    /// Push a snapshot with retry and backoff. Returns whether the push
    /// both succeeded and still represents the current generation.
    pub async fn push_with_retry(
        &mut self,
        client: &SyncClient,
        snapshot: &ProgressSnapshot,
    ) -> Result<bool, SyncError> {
        let ticket = self.begin_push();
        let mut attempt = 0;
        loop {
            match client.push(snapshot).await {
                Ok(()) => return Ok(self.complete_push(ticket, Utc::now())),
                Err(err) if attempt + 1 < self.max_retries => {
                    warn!("push attempt {} failed: {err}; retrying", attempt + 1);
                    tokio::time::sleep(Self::backoff_delay(attempt)).await;
                    attempt += 1;
                }
                Err(err) => {
                    self.fail_push(ticket);
                    return Err(err);
                }
            }
        }
    }
}
