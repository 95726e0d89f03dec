//! SQLite-backed snapshot persistence.
//!
//! The durable local store holds one serialized progress snapshot per
//! user id, plus the last-sync marker. The store and the sync layer both
//! write through the same serialized mutation path, so no isolation
//! beyond last-writer-wins is needed.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::error::StorageError;
use crate::sync::types::ProgressSnapshot;

/// A loaded snapshot with its sync marker.
#[derive(Debug, Clone)]
pub struct StoredSnapshot {
    pub snapshot: ProgressSnapshot,
    pub last_sync_at: Option<DateTime<Utc>>,
}

/// SQLite database holding per-user progress snapshots.
pub struct SnapshotDb {
    conn: Connection,
}

impl SnapshotDb {
    /// Open the database at `~/.config/tahfiz/tahfiz.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()?.join("tahfiz.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS snapshots (
                    user_id      TEXT PRIMARY KEY,
                    payload      TEXT NOT NULL,
                    last_sync_at TEXT,
                    updated_at   TEXT NOT NULL
                );",
            )
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))
    }

    /// Load the stored snapshot for a user, if any.
    pub fn load(&self, user_id: &str) -> Result<Option<StoredSnapshot>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT payload, last_sync_at FROM snapshots WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                    ))
                },
            )
            .optional()?;

        let Some((payload, last_sync_at)) = row else {
            return Ok(None);
        };

        let snapshot: ProgressSnapshot =
            serde_json::from_str(&payload).map_err(|e| StorageError::CorruptSnapshot {
                user_id: user_id.to_string(),
                message: e.to_string(),
            })?;
        let last_sync_at = last_sync_at
            .as_deref()
            .map(DateTime::parse_from_rfc3339)
            .transpose()
            .map_err(|e| StorageError::CorruptSnapshot {
                user_id: user_id.to_string(),
                message: format!("bad last_sync_at: {e}"),
            })?
            .map(|ts| ts.with_timezone(&Utc));

        Ok(Some(StoredSnapshot { snapshot, last_sync_at }))
    }

    /// Write a snapshot as the new durable state for a user.
    pub fn save(
        &self,
        user_id: &str,
        snapshot: &ProgressSnapshot,
        last_sync_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let payload = serde_json::to_string(snapshot).map_err(|e| {
            StorageError::QueryFailed(format!("snapshot serialization failed: {e}"))
        })?;
        self.conn.execute(
            "INSERT INTO snapshots (user_id, payload, last_sync_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                 payload = excluded.payload,
                 last_sync_at = excluded.last_sync_at,
                 updated_at = excluded.updated_at",
            params![
                user_id,
                payload,
                last_sync_at.map(|ts| ts.to_rfc3339()),
                now.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Update only the last-sync marker.
    pub fn mark_synced(
        &self,
        user_id: &str,
        last_sync_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE snapshots SET last_sync_at = ?2 WHERE user_id = ?1",
            params![user_id, last_sync_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Remove a user's stored state (sign-out teardown).
    pub fn delete(&self, user_id: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM snapshots WHERE user_id = ?1", params![user_id])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{VerseCard, VerseId};
    use tempfile::TempDir;

    fn sample() -> ProgressSnapshot {
        let mut snapshot = ProgressSnapshot::empty(5, 20);
        let mut card = VerseCard::new(VerseId::new(2, 255), Utc::now(), 2.5);
        card.total_reviews = 4;
        snapshot.items.push(card);
        snapshot
    }

    #[test]
    fn test_load_missing_user_is_none() {
        let db = SnapshotDb::open_memory().unwrap();
        assert!(db.load("nobody").unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let db = SnapshotDb::open_memory().unwrap();
        let snapshot = sample();
        let now = Utc::now();

        db.save("user-1", &snapshot, None, now).unwrap();
        let stored = db.load("user-1").unwrap().unwrap();
        assert_eq!(stored.snapshot, snapshot);
        assert_eq!(stored.last_sync_at, None);
    }

    #[test]
    fn test_save_overwrites_previous() {
        let db = SnapshotDb::open_memory().unwrap();
        let now = Utc::now();
        db.save("user-1", &sample(), None, now).unwrap();

        let mut updated = sample();
        updated.items[0].total_reviews = 9;
        db.save("user-1", &updated, Some(now), now).unwrap();

        let stored = db.load("user-1").unwrap().unwrap();
        assert_eq!(stored.snapshot.items[0].total_reviews, 9);
        assert!(stored.last_sync_at.is_some());
    }

    #[test]
    fn test_users_are_isolated() {
        let db = SnapshotDb::open_memory().unwrap();
        let now = Utc::now();
        db.save("a", &sample(), None, now).unwrap();
        db.save("b", &ProgressSnapshot::empty(1, 1), None, now).unwrap();

        assert_eq!(db.load("a").unwrap().unwrap().snapshot.items.len(), 1);
        assert!(db.load("b").unwrap().unwrap().snapshot.items.is_empty());
    }

    #[test]
    fn test_mark_synced_updates_marker() {
        let db = SnapshotDb::open_memory().unwrap();
        let now = Utc::now();
        db.save("user-1", &sample(), None, now).unwrap();
        db.mark_synced("user-1", now).unwrap();

        let stored = db.load("user-1").unwrap().unwrap();
        let marker = stored.last_sync_at.unwrap();
        assert!((marker - now).num_seconds().abs() < 1);
    }

    #[test]
    fn test_delete_removes_user_state() {
        let db = SnapshotDb::open_memory().unwrap();
        db.save("user-1", &sample(), None, Utc::now()).unwrap();
        db.delete("user-1").unwrap();
        assert!(db.load("user-1").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_payload_reported() {
        let db = SnapshotDb::open_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO snapshots (user_id, payload, updated_at) VALUES ('x', 'not json', '')",
                [],
            )
            .unwrap();
        assert!(matches!(
            db.load("x"),
            Err(StorageError::CorruptSnapshot { .. })
        ));
    }

    #[test]
    fn test_on_disk_persistence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tahfiz.db");
        let now = Utc::now();
        {
            let db = SnapshotDb::open_at(&path).unwrap();
            db.save("user-1", &sample(), None, now).unwrap();
        }
        let db = SnapshotDb::open_at(&path).unwrap();
        assert!(db.load("user-1").unwrap().is_some());
    }
}
