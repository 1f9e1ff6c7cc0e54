pub mod catalog;
pub mod challenge;
pub mod config;
pub mod history;
pub mod motion;
pub mod run;
mod sink;
pub mod tree;

use ecoshake_core::{Config, Database, EffectExecutor, Outcome, ShakeApp};
use serde::Serialize;

pub use sink::TerminalSink;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the app on the persistent database, with the state an earlier
/// invocation left behind.
pub fn open_app() -> ecoshake_core::error::Result<ShakeApp<Database>> {
    let config = Config::load()?;
    let catalog = config.catalog()?;
    let mut app = ShakeApp::new(Database::open()?, catalog, &config);
    app.restore_state();
    Ok(app)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the events of `outcome`, play its feedback on the terminal and park
/// the controller state for the next invocation.
pub fn finish(app: &ShakeApp<Database>, outcome: &Outcome) -> CmdResult {
    for event in &outcome.events {
        print_json(event)?;
    }
    let log = EffectExecutor::new().execute_batch(&mut TerminalSink::new(), &outcome.effects);
    tracing::debug!(
        success = log.success_count(),
        failed = log.failure_count(),
        skipped = log.skipped_count(),
        "feedback executed"
    );
    app.save_state()?;
    Ok(())
}
