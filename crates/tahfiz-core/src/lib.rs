//! # Tahfiz Core Library
//!
//! Core business logic for Tahfiz, an offline-first Quran memorization
//! tracker. All operations are available through a standalone CLI binary;
//! any richer front end is a thin layer over this same library.
//!
//! ## Architecture
//!
//! - **Scheduler**: a pure SM-2 style function mapping a card and a recall
//!   quality to the next retention state
//! - **Progress Store**: the authoritative per-user state (cards, streak,
//!   daily goal, achievements) with a single mutation entry point
//! - **Sync**: local-first snapshot push/pull with deterministic
//!   client-side merge; the network never blocks a review
//! - **Storage**: SQLite snapshot persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`ProgressStore`]: progress state and queries
//! - [`Session`]: top-level owned object wiring store, storage, and sync
//! - [`schedule`]: the review scheduling function
//! - [`SyncClient`] / [`SyncCoordinator`]: remote reconciliation

pub mod achievements;
pub mod day;
pub mod error;
pub mod events;
pub mod item;
pub mod quran;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod store;
pub mod streak;
pub mod sync;

pub use day::{DayConfig, DayKey};
pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use item::{MemorizationStatus, VerseCard, VerseId};
pub use scheduler::{schedule, Quality, SchedulerConfig, SchedulerError};
pub use session::{Session, SyncOutcome};
pub use storage::{Config, SnapshotDb};
pub use store::{ProgressStore, ScopeProgress, StoreConfig, StoreStats};
pub use streak::{DailyGoal, StreakState};
pub use sync::{ProgressSnapshot, SyncClient, SyncCoordinator, SyncError, SyncStatus};
