mod config;
pub mod snapshot_db;

pub use config::{Config, DaySection, GoalSection, SyncSection};
pub use snapshot_db::SnapshotDb;

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/tahfiz[-dev]/` based on TAHFIZ_ENV.
///
/// Set TAHFIZ_ENV=dev to keep development data separate.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TAHFIZ_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("tahfiz-dev")
    } else {
        base_dir.join("tahfiz")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
