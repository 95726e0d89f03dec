//! Sync subcommand.
//!
//! Drives one explicit sync cycle against the configured remote snapshot
//! store, or reports the current sync state.

use chrono::Utc;
use clap::Subcommand;
use tahfiz_core::storage::data_dir;
use tahfiz_core::sync::get_or_create_device_id;
use tahfiz_core::{Config, SyncClient};

#[derive(Subcommand)]
pub enum SyncAction {
    /// Pull, merge, and push now
    Now,
    /// Show sync status
    Status,
}

pub fn run(action: SyncAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SyncAction::Now => sync_now(),
        SyncAction::Status => show_status(),
    }
}

fn sync_now() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    if config.sync.server_url.is_empty() {
        return Err("sync.server_url is not configured".into());
    }
    let device_id = get_or_create_device_id(&data_dir()?)?;
    let client = SyncClient::new(&config.sync.server_url, config.sync.auth_token.clone())?
        .with_device_id(device_id);
    let mut session = super::open_session()?;

    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(session.sync(&client, Utc::now()))?;

    println!(
        "sync complete: pull {}, push {}",
        if outcome.pulled { "ok" } else { "skipped (offline)" },
        if outcome.pushed { "ok" } else { "superseded" },
    );
    Ok(())
}

fn show_status() -> Result<(), Box<dyn std::error::Error>> {
    let session = super::open_session()?;
    let status = session.sync_status();
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
