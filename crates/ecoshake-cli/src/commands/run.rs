//! Interactive session.
//!
//! Plays the shell around the controller: it owns the countdown timer,
//! answers permission requests, gates motion input on the subscription and
//! renders feedback. Commands are read from stdin, one per line:
//!
//! ```text
//! shake              strong sample
//! motion X Y Z       one sample, `-` for a missing axis
//! random             start a random challenge
//! complete | skip | cancel
//! enable | disable   shake detection
//! status | help | quit
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use clap::Args;
use ecoshake_core::{
    now_ms, Config, Database, Effect, EffectExecutor, Input, MotionSample, Outcome,
    SensorAccess, ShakeApp,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use super::{print_json, CmdResult, TerminalSink};

const HELP: &str = "commands: shake | motion X Y Z | random | complete | skip | cancel | enable | disable | status | quit";

#[derive(Args)]
pub struct RunArgs {
    /// Answer to the motion sensor permission prompt
    #[arg(long, default_value = "not-required")]
    permission: SensorAccess,
    /// Seed for challenge selection
    #[arg(long)]
    seed: Option<u64>,
    /// Don't arm shake detection on start
    #[arg(long)]
    no_shake: bool,
    /// Print events only, without playing feedback
    #[arg(long)]
    no_feedback: bool,
}

enum Command {
    Input(Input),
    Status,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let command = match word {
        "" => return Ok(None),
        "shake" => Command::Input(Input::Motion(MotionSample::xyz(20.0, 15.0, 10.0))),
        "motion" => {
            let sample = rest.parse::<MotionSample>().map_err(|e| e.to_string())?;
            Command::Input(Input::Motion(sample))
        }
        "random" => Command::Input(Input::RandomChallenge),
        "complete" => Command::Input(Input::Complete),
        "skip" => Command::Input(Input::Skip),
        "cancel" => Command::Input(Input::Cancel),
        "enable" => Command::Input(Input::EnableShake),
        "disable" => Command::Input(Input::DisableShake),
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(Some(command))
}

struct Shell {
    permission: SensorAccess,
    countdown: Option<Interval>,
    subscribed: bool,
    executor: EffectExecutor,
    sink: TerminalSink,
}

impl Shell {
    /// Feed one input and everything it causes back into the controller.
    fn apply(&mut self, app: &mut ShakeApp<Database>, input: Input) -> CmdResult {
        let mut queue = VecDeque::from([input]);
        while let Some(input) = queue.pop_front() {
            if matches!(input, Input::Motion(_)) && !self.subscribed {
                eprintln!("shake detection is off (try 'enable')");
                continue;
            }
            let outcome = app.handle(input, now_ms());
            if let Some(next) = self.perform(&outcome)? {
                queue.push_back(next);
            }
        }
        Ok(())
    }

    /// Print events and carry out effects. A permission request is answered
    /// with the configured outcome, returned as the follow-up input.
    fn perform(&mut self, outcome: &Outcome) -> Result<Option<Input>, serde_json::Error> {
        for event in &outcome.events {
            println!("{}", serde_json::to_string(event)?);
        }

        let mut follow_up = None;
        for effect in &outcome.effects {
            match effect {
                Effect::StartCountdown { interval_ms, .. } => {
                    let period = Duration::from_millis(*interval_ms);
                    let mut interval = interval_at(Instant::now() + period, period);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    self.countdown = Some(interval);
                }
                Effect::StopCountdown { .. } => self.countdown = None,
                Effect::RequestPermission => {
                    follow_up = Some(Input::PermissionResolved(self.permission.clone()));
                }
                Effect::SubscribeMotion => self.subscribed = true,
                Effect::UnsubscribeMotion => self.subscribed = false,
                _ => {}
            }
        }

        let log = self.executor.execute_batch(&mut self.sink, &outcome.effects);
        tracing::debug!(
            success = log.success_count(),
            failed = log.failure_count(),
            "feedback executed"
        );
        Ok(follow_up)
    }
}

async fn next_tick(countdown: &mut Option<Interval>) {
    match countdown {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

enum Step {
    Tick,
    Line(Option<String>),
}

pub fn run(args: RunArgs) -> CmdResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session(args))
}

async fn session(args: RunArgs) -> CmdResult {
    let config = Config::load()?;
    let catalog = config.catalog()?;
    let db = Database::open()?;
    let mut app = match args.seed {
        Some(seed) => ShakeApp::seeded(db, catalog, &config, seed),
        None => ShakeApp::new(db, catalog, &config),
    };
    app.restore_state();

    let mut shell = Shell {
        permission: args.permission,
        countdown: None,
        subscribed: false,
        executor: if args.no_feedback {
            EffectExecutor::dry_run()
        } else {
            EffectExecutor::new()
        },
        sink: TerminalSink::new(),
    };

    // A challenge left open by an earlier run keeps counting down.
    if let Some(session) = app.session().filter(|s| s.countdown_running()) {
        let outcome = Outcome {
            events: Vec::new(),
            effects: vec![Effect::StartCountdown {
                session_id: session.id(),
                interval_ms: ecoshake_core::app::COUNTDOWN_INTERVAL_MS,
            }],
        };
        shell.perform(&outcome)?;
    }
    if !args.no_shake {
        shell.apply(&mut app, Input::EnableShake)?;
    }
    print_json(&app.snapshot(now_ms()))?;
    eprintln!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let step = tokio::select! {
            _ = next_tick(&mut shell.countdown) => Step::Tick,
            line = lines.next_line() => Step::Line(line?),
        };

        match step {
            Step::Tick => shell.apply(&mut app, Input::Tick)?,
            Step::Line(None) => break,
            Step::Line(Some(line)) => match parse_command(&line) {
                Ok(None) => {}
                Ok(Some(Command::Input(input))) => shell.apply(&mut app, input)?,
                Ok(Some(Command::Status)) => print_json(&app.snapshot(now_ms()))?,
                Ok(Some(Command::Help)) => eprintln!("{HELP}"),
                Ok(Some(Command::Quit)) => break,
                Err(message) => eprintln!("{message}"),
            },
        }
    }

    shell.perform(&app.shutdown())?;
    app.save_state()?;
    tracing::debug!("session ended");
    Ok(())
}
