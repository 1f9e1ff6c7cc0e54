//! Motion sample commands.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use ecoshake_core::motion::{parse_recorded_line, GateSettings, Shake};
use ecoshake_core::{now_ms, Config, Input, MotionGate, MotionSample, SensorAccess};

use super::{finish, open_app, print_json, CmdResult};

#[derive(Subcommand)]
pub enum MotionAction {
    /// Feed one accelerometer sample (gravity included, m/s²)
    Sample {
        #[arg(long, allow_hyphen_values = true)]
        x: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        y: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        z: Option<f64>,
        /// Sample time in epoch milliseconds (defaults to now)
        #[arg(long)]
        at_ms: Option<u64>,
        /// Outcome of the sensor permission prompt
        #[arg(long, default_value = "not-required")]
        permission: SensorAccess,
    },
    /// Run a recording through the shake detector and list accepted shakes
    ///
    /// One sample per line as `t_ms x y z`, `-` for a missing axis.
    /// Blank lines and lines starting with `#` are ignored.
    Replay {
        file: PathBuf,
        /// Override the configured threshold
        #[arg(long)]
        threshold: Option<f64>,
        /// Override the configured cooldown
        #[arg(long)]
        cooldown_ms: Option<u64>,
    },
}

pub fn run(action: MotionAction) -> CmdResult {
    match action {
        MotionAction::Sample {
            x,
            y,
            z,
            at_ms,
            permission,
        } => sample(MotionSample::new(x, y, z), at_ms.unwrap_or_else(now_ms), permission),
        MotionAction::Replay {
            file,
            threshold,
            cooldown_ms,
        } => replay(&file, threshold, cooldown_ms),
    }
}

fn sample(sample: MotionSample, at_ms: u64, permission: SensorAccess) -> CmdResult {
    let mut app = open_app()?;

    // Arming lasts for this invocation only and is not reported unless refused.
    let mut arming = app.handle(Input::EnableShake, at_ms);
    arming.extend(app.handle(Input::PermissionResolved(permission), at_ms));
    if !app.arm_state().is_armed() {
        return finish(&app, &arming);
    }

    let outcome = app.handle(Input::Motion(sample), at_ms);
    if outcome.is_empty() {
        tracing::debug!(at_ms, "no shake: below threshold, in cooldown, or suppressed");
    }
    finish(&app, &outcome)
}

fn replay(file: &Path, threshold: Option<f64>, cooldown_ms: Option<u64>) -> CmdResult {
    let config = Config::load()?;
    let defaults = config.gate_settings();
    let settings = GateSettings {
        threshold: threshold.unwrap_or(defaults.threshold),
        cooldown_ms: cooldown_ms.unwrap_or(defaults.cooldown_ms),
    };

    let content = std::fs::read_to_string(file)?;
    let mut gate = MotionGate::new(settings);
    let mut shakes: Vec<Shake> = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (at_ms, sample) = parse_recorded_line(line)
            .map_err(|e| format!("{}:{}: {e}", file.display(), lineno + 1))?;
        if let Some(shake) = gate.sample(&sample, at_ms, false) {
            shakes.push(shake);
        }
    }

    print_json(&shakes)?;
    Ok(())
}
