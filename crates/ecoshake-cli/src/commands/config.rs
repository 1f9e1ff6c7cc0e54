//! Settings in `config.toml`: motion gate, feedback switches and catalog.

use clap::Subcommand;
use ecoshake_core::Config;

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dotted key, e.g. "motion.threshold" or "feedback.sound"
        key: String,
    },
    /// Change one setting and save
    ///
    /// The value is parsed as the type the key already holds: `true`/`false`
    /// for the feedback switches, a number for the motion gate, a path for
    /// `catalog.path`. An empty value clears `catalog.path`. The threshold
    /// must stay positive.
    Set {
        /// Dotted key, e.g. "motion.cooldown_ms"
        key: String,
        /// New value, typed by the current one
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Print every setting as JSON
    List,
    /// Restore the default motion gate, feedback and catalog settings
    Reset,
}

pub fn run(action: ConfigAction) -> CmdResult {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            tracing::debug!(%key, "config updated");
            // Echo the stored form, e.g. "18" comes back as 18.0.
            println!("{key} = {}", config.get(&key).unwrap_or_default());
        }
        ConfigAction::List => {
            let config = Config::load()?;
            print_json(&config)?;
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            eprintln!("config reset to defaults");
        }
    }
    Ok(())
}
