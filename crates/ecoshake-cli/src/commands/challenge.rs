use clap::Subcommand;
use ecoshake_core::{now_ms, Input, Outcome};

use super::{finish, open_app, print_json, CmdResult};

#[derive(Subcommand)]
pub enum ChallengeAction {
    /// Start a random challenge (the "random challenge" button)
    Trigger,
    /// Print current state as JSON
    Status,
    /// Advance the countdown by whole seconds
    Tick {
        #[arg(long, default_value = "1")]
        count: u32,
    },
    /// Mark the open challenge as done
    Complete,
    /// Give up on the open challenge (still logged)
    Skip,
    /// Close the open challenge without logging it
    Cancel,
}

pub fn run(action: ChallengeAction) -> CmdResult {
    let mut app = open_app()?;
    let now = now_ms();

    let input = match action {
        ChallengeAction::Status => {
            print_json(&app.snapshot(now))?;
            return Ok(());
        }
        ChallengeAction::Tick { count } => {
            let mut outcome = Outcome::default();
            for i in 0..u64::from(count) {
                outcome.extend(app.handle(Input::Tick, now + i * 1000));
            }
            return finish(&app, &outcome);
        }
        ChallengeAction::Trigger => Input::RandomChallenge,
        ChallengeAction::Complete => Input::Complete,
        ChallengeAction::Skip => Input::Skip,
        ChallengeAction::Cancel => Input::Cancel,
    };

    let outcome = app.handle(input, now);
    if outcome.is_empty() {
        if app.session().is_some() {
            eprintln!("a challenge is already in progress");
        } else {
            eprintln!("no challenge in progress");
        }
        print_json(&app.snapshot(now))?;
    }
    finish(&app, &outcome)
}
