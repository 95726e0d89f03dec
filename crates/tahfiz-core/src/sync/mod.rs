//! Snapshot synchronization layer.
//!
//! Local-first: reads and writes always hit the progress store directly,
//! and network I/O never blocks a mutation. Divergent copies reconcile
//! client-side through the deterministic merge rules in [`merge`].

pub mod client;
pub mod coordinator;
pub mod device_id;
pub mod merge;
pub mod types;

#[cfg(test)]
mod client_tests;

pub use client::SyncClient;
pub use coordinator::{PushTicket, SyncCoordinator};
pub use device_id::{get_or_create_device_id, DeviceIdError};
pub use merge::merge_snapshots;
pub use types::{ProgressSnapshot, PullResponse, SyncError, SyncStatus};
