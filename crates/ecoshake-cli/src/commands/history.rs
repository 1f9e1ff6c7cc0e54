use clap::Subcommand;
use ecoshake_core::storage::HistoryStore;
use ecoshake_core::Database;

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List resolved challenges, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Completed and total counts
    Summary,
}

pub fn run(action: HistoryAction) -> CmdResult {
    let history = HistoryStore::new(Database::open()?).load();

    match action {
        HistoryAction::List { json: true } => {
            let entries: Vec<_> = history.newest_first().collect();
            print_json(&entries)?;
        }
        HistoryAction::List { json: false } => {
            if history.is_empty() {
                println!("No challenges yet. Shake your phone to start!");
            }
            for entry in history.newest_first() {
                let mark = if entry.completed { "✓" } else { "✗" };
                println!("{}  {mark}  {}", entry.display_time(), entry.title);
            }
        }
        HistoryAction::Summary => {
            print_json(&history.summary())?;
        }
    }
    Ok(())
}
