use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;

#[derive(Parser)]
#[command(name = "tahfiz", version, about = "Tahfiz CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a review for a verse
    Review {
        /// Surah number (1-114)
        surah: u16,
        /// Ayah number within the surah
        ayah: u16,
        /// Recall quality (0-5): 0 blackout .. 5 perfect
        quality: u8,
        /// Print the resulting card as JSON
        #[arg(long)]
        json: bool,
    },
    /// List verses due for review
    Due {
        /// Maximum number of verses to list
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Progress statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Streak and daily goal status
    Streak,
    /// Achievements
    Achievements {
        /// Include locked achievements
        #[arg(long)]
        all: bool,
    },
    /// Remote synchronization
    Sync {
        #[command(subcommand)]
        action: commands::sync::SyncAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Review { surah, ayah, quality, json } => {
            commands::review::run(surah, ayah, quality, json)
        }
        Commands::Due { limit, json } => commands::due::run(limit, json),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Streak => commands::streak::run(),
        Commands::Achievements { all } => commands::achievements::run(all),
        Commands::Sync { action } => commands::sync::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "tahfiz", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
