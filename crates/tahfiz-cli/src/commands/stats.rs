use chrono::Utc;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Overall progress overview
    Overview,
    /// Progress for one surah
    Surah {
        /// Surah number (1-114)
        number: u16,
    },
    /// Progress for one juz
    Juz {
        /// Juz number (1-30)
        number: u8,
    },
    /// Per-day activity for the last week
    Recent,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let session = super::open_session()?;
    let store = session.store();

    match action {
        StatsAction::Overview => {
            let stats = store.stats(Utc::now());
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Surah { number } => {
            let progress = store
                .surah_progress(number)
                .ok_or_else(|| format!("no such surah: {number}"))?;
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        StatsAction::Juz { number } => {
            let progress = store
                .juz_progress(number)
                .ok_or_else(|| format!("no such juz: {number}"))?;
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        StatsAction::Recent => {
            let activity = store.recent_activity(7, Utc::now());
            println!("{}", serde_json::to_string_pretty(&activity)?);
        }
    }
    Ok(())
}
