//! Top-level user session.
//!
//! Owns the progress store, the durable snapshot database, and the sync
//! coordinator for one signed-in (or local) user. Created at session
//! start, torn down explicitly; nothing here is a process-wide singleton.
//!
//! All mutations flow through this type in order, so the store is never
//! touched from two logical flows at once.

use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, Utc};
use log::{info, warn};
use uuid::Uuid;

use crate::error::{CoreError, StorageError};
use crate::events::Event;
use crate::item::{VerseCard, VerseId};
use crate::scheduler::Quality;
use crate::storage::{Config, SnapshotDb};
use crate::store::ProgressStore;
use crate::sync::{merge_snapshots, SyncClient, SyncCoordinator, SyncStatus};

/// Size of the duplicate-suppression window for client event ids.
const EVENT_ID_WINDOW: usize = 128;

/// What a sync cycle accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Remote state was fetched and merged.
    pub pulled: bool,
    /// The current snapshot was accepted remotely and is still current.
    pub pushed: bool,
}

pub struct Session {
    user_id: String,
    store: ProgressStore,
    db: SnapshotDb,
    coordinator: SyncCoordinator,
    recent_event_ids: VecDeque<Uuid>,
    recent_event_set: HashSet<Uuid>,
}

impl Session {
    /// Open the session for the configured user, loading the persisted
    /// baseline snapshot if one exists.
    pub fn open(config: &Config, db: SnapshotDb) -> Result<Self, CoreError> {
        let user_id = config.sync.user_id.clone();
        let stored = db.load(&user_id)?;
        let last_sync_at = stored.as_ref().and_then(|s| s.last_sync_at);

        let store = match stored {
            Some(stored) => ProgressStore::from_snapshot(config.store_config(), stored.snapshot),
            None => ProgressStore::new(config.store_config()),
        };
        let coordinator = SyncCoordinator::new(config.sync.debounce_secs, config.sync.max_retries)
            .with_last_sync(last_sync_at);

        info!("session opened for user '{user_id}'");
        Ok(Self {
            user_id,
            store,
            db,
            coordinator,
            recent_event_ids: VecDeque::new(),
            recent_event_set: HashSet::new(),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    /// Record one review, persist the result, and arm the sync debounce.
    pub fn record_review(
        &mut self,
        id: VerseId,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> Result<VerseCard, CoreError> {
        let card = self.store.record_review(id, quality, now);
        self.coordinator.notify_mutation(now);
        self.persist(now)?;
        Ok(card)
    }

    /// Record a review once per client event id.
    ///
    /// The scheduler itself is not idempotent (every call increments
    /// `total_reviews`), so double-taps and crash retries are suppressed
    /// here with a bounded window of recently seen ids. Returns None for
    /// a duplicate.
    pub fn record_review_once(
        &mut self,
        event_id: Uuid,
        id: VerseId,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> Result<Option<VerseCard>, CoreError> {
        if self.recent_event_set.contains(&event_id) {
            warn!("duplicate review event {event_id} ignored");
            return Ok(None);
        }
        self.recent_event_set.insert(event_id);
        self.recent_event_ids.push_back(event_id);
        if self.recent_event_ids.len() > EVENT_ID_WINDOW {
            if let Some(evicted) = self.recent_event_ids.pop_front() {
                self.recent_event_set.remove(&evicted);
            }
        }
        self.record_review(id, quality, now).map(Some)
    }

    /// Drain progress events for the front end.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.store.drain_events()
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.coordinator.status(self.store.is_dirty())
    }

    /// Run one sync cycle: pull and merge remote state, then push the
    /// resulting snapshot.
    ///
    /// A failed pull leaves local state untouched and the cycle continues
    /// to the push. A failed push (after retries) surfaces as an error,
    /// but the local store is already persisted and no review is ever
    /// lost or rolled back.
    pub async fn sync(
        &mut self,
        client: &SyncClient,
        now: DateTime<Utc>,
    ) -> Result<SyncOutcome, CoreError> {
        let mut pulled = false;
        match client.pull().await {
            Ok(response) => {
                let local = self.store.snapshot();
                let merged = merge_snapshots(&local, &response.snapshot);
                if merged != local {
                    self.store.apply_merged(merged, now);
                    self.coordinator.notify_merge(now);
                }
                pulled = true;
            }
            Err(err) => {
                warn!("pull failed: {err}; continuing with local state");
            }
        }

        let snapshot = self.store.snapshot();
        let push_result = self.coordinator.push_with_retry(client, &snapshot).await;
        let pushed = match push_result {
            Ok(current) => {
                if current {
                    self.store.clear_dirty();
                }
                current
            }
            Err(err) => {
                self.persist(now)?;
                return Err(err.into());
            }
        };

        self.persist(now)?;
        self.store.note_sync(pulled, pushed, now);
        Ok(SyncOutcome { pulled, pushed })
    }

    /// Tear down this user's local state (sign-out).
    pub fn reset(self) -> Result<(), StorageError> {
        self.db.delete(&self.user_id)
    }

    fn persist(&mut self, now: DateTime<Utc>) -> Result<(), StorageError> {
        self.db.save(
            &self.user_id,
            &self.store.snapshot(),
            self.coordinator.last_sync_at(),
            now,
        )
    }
}
