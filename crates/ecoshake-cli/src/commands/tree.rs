use ecoshake_core::storage::HistoryStore;
use ecoshake_core::{Database, Progression};

use super::{print_json, CmdResult};

pub fn run() -> CmdResult {
    let history = HistoryStore::new(Database::open()?).load();
    let progression = Progression::for_completed(history.completed_count());
    print_json(&progression)?;
    eprintln!("{}", headline(&progression));
    Ok(())
}

fn headline(progression: &Progression) -> String {
    let stage = progression.stage.name;
    if progression.is_max() {
        return format!("{stage}: max level reached");
    }
    let next = progression.next.map_or("", |next| next.name);
    format!("{stage}: {} more to {next}", progression.remaining_to_next)
}
