pub mod achievements;
pub mod config;
pub mod due;
pub mod review;
pub mod stats;
pub mod streak;
pub mod sync;

use tahfiz_core::{Config, Session, SnapshotDb};

/// Open the session for the configured user.
pub fn open_session() -> Result<Session, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = SnapshotDb::open()?;
    Ok(Session::open(&config, db)?)
}
