use clap::Subcommand;
use tahfiz_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,
    /// Set a configuration value (dotted key, e.g. goal.target_new)
    Set {
        key: String,
        value: String,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            apply(&mut config, &key, &value)?;
            config.save()?;
            println!("{key} = {value}");
        }
    }
    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
    let parse_err = |e: String| -> Box<dyn std::error::Error> {
        format!("invalid value for {key}: {e}").into()
    };
    match key {
        "goal.target_new" => {
            config.goal.target_new = value.parse().map_err(|_| parse_err(value.into()))?;
        }
        "goal.target_review" => {
            config.goal.target_review = value.parse().map_err(|_| parse_err(value.into()))?;
        }
        "day.tz_offset_minutes" => {
            config.day.tz_offset_minutes = value.parse().map_err(|_| parse_err(value.into()))?;
        }
        "day.day_start_offset_minutes" => {
            config.day.day_start_offset_minutes =
                value.parse().map_err(|_| parse_err(value.into()))?;
        }
        "sync.server_url" => config.sync.server_url = value.to_string(),
        "sync.auth_token" => config.sync.auth_token = value.to_string(),
        "sync.user_id" => config.sync.user_id = value.to_string(),
        other => {
            return Err(format!(
                "unknown key: {other}. Supported: goal.target_new, goal.target_review, \
                 day.tz_offset_minutes, day.day_start_offset_minutes, sync.server_url, \
                 sync.auth_token, sync.user_id"
            )
            .into());
        }
    }
    Ok(())
}
