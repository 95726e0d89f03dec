//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Scheduler constants (ease bounds, intervals, mastery thresholds)
//! - Study-day boundary (timezone, day-start offset)
//! - Daily goal targets
//! - Sync server settings
//!
//! Configuration is stored at `~/.config/tahfiz/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::day::DayConfig;
use crate::error::ConfigError;
use crate::scheduler::SchedulerConfig;
use crate::store::StoreConfig;

const CONFIG_FILE: &str = "config.toml";

/// Day-boundary configuration section.
pub type DaySection = DayConfig;

/// Daily goal targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSection {
    #[serde(default = "default_target_new")]
    pub target_new: u32,
    #[serde(default = "default_target_review")]
    pub target_review: u32,
}

/// Sync server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSection {
    /// Remote snapshot store base URL; empty disables sync.
    #[serde(default)]
    pub server_url: String,
    /// Bearer token for the authenticated session.
    #[serde(default)]
    pub auth_token: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Quiet period after the last mutation before a push fires.
    #[serde(default = "default_debounce_secs")]
    pub debounce_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tahfiz/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub day: DaySection,
    #[serde(default)]
    pub goal: GoalSection,
    #[serde(default)]
    pub sync: SyncSection,
}

fn default_target_new() -> u32 {
    5
}
fn default_target_review() -> u32 {
    20
}
fn default_user_id() -> String {
    "local".to_string()
}
fn default_debounce_secs() -> u64 {
    5
}
fn default_max_retries() -> u32 {
    3
}

impl Default for GoalSection {
    fn default() -> Self {
        Self {
            target_new: default_target_new(),
            target_review: default_target_review(),
        }
    }
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            auth_token: String::new(),
            user_id: default_user_id(),
            debounce_secs: default_debounce_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            day: DaySection::default(),
            goal: GoalSection::default(),
            sync: SyncSection::default(),
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when the
    /// file does not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from(CONFIG_FILE),
            message: e.to_string(),
        })?;
        Ok(dir.join(CONFIG_FILE))
    }

    /// Assemble the store-level configuration.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            scheduler: self.scheduler.clone(),
            day: self.day,
            goal_target_new: self.goal.target_new,
            goal_target_review: self.goal.target_review,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.goal.target_new, 5);
        assert_eq!(config.goal.target_review, 20);
        assert_eq!(config.sync.debounce_secs, 5);
        assert!((config.scheduler.min_ease - 1.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.goal.target_new = 3;
        config.sync.server_url = "https://sync.example.net".to_string();
        config.day.day_start_offset_minutes = 90;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.goal.target_new, 3);
        assert_eq!(loaded.sync.server_url, "https://sync.example.net");
        assert_eq!(loaded.day.day_start_offset_minutes, 90);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[goal]\ntarget_new = 2\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.goal.target_new, 2);
        assert_eq!(config.goal.target_review, 20);
        assert_eq!(config.scheduler.max_interval_days, 180);
    }

    #[test]
    fn test_malformed_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is not toml [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }
}
