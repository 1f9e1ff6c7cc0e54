//! Shake detection.
//!
//! The gate turns a stream of accelerometer samples into discrete shake
//! events. It owns the only piece of state involved, the timestamp of the
//! last accepted shake, and the caller passes the current time on every
//! sample so the gate never reads a clock itself.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Magnitude (m/s², gravity included) a sample must reach to count as a shake.
pub const DEFAULT_SHAKE_THRESHOLD: f64 = 25.0;

/// Minimum spacing between two accepted shakes.
pub const DEFAULT_COOLDOWN_MS: u64 = 1000;

/// One 3-axis reading. Any axis may be unavailable on a given device.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Acceleration {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub z: Option<f64>,
}

impl Acceleration {
    pub fn new(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Self {
        Self { x, y, z }
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self::new(Some(x), Some(y), Some(z))
    }

    /// Euclidean magnitude. Missing axes count as zero.
    pub fn magnitude(&self) -> f64 {
        let x = self.x.unwrap_or(0.0);
        let y = self.y.unwrap_or(0.0);
        let z = self.z.unwrap_or(0.0);
        (x * x + y * y + z * z).sqrt()
    }
}

/// A motion event as delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionSample {
    /// `None` when the platform delivered an event without a gravity-inclusive
    /// reading; such samples are ignored.
    pub including_gravity: Option<Acceleration>,
}

impl MotionSample {
    pub fn new(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Self {
        Self {
            including_gravity: Some(Acceleration::new(x, y, z)),
        }
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            including_gravity: Some(Acceleration::xyz(x, y, z)),
        }
    }

    pub fn empty() -> Self {
        Self {
            including_gravity: None,
        }
    }
}

impl FromStr for MotionSample {
    type Err = ValidationError;

    /// Parse `x y z`, where `-` marks a missing axis.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(ValidationError::InvalidValue {
                field: "motion sample".into(),
                message: format!("expected 3 axes, got {}", parts.len()),
            });
        }
        let x = parse_axis("x", parts[0])?;
        let y = parse_axis("y", parts[1])?;
        let z = parse_axis("z", parts[2])?;
        Ok(Self::new(x, y, z))
    }
}

fn parse_axis(name: &str, raw: &str) -> Result<Option<f64>, ValidationError> {
    if raw == "-" {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|e| ValidationError::InvalidValue {
            field: format!("axis {name}"),
            message: format!("'{raw}': {e}"),
        })
}

/// Parse a recorded line of the form `t_ms x y z`.
pub fn parse_recorded_line(line: &str) -> Result<(u64, MotionSample), ValidationError> {
    let line = line.trim();
    let (at, rest) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "recorded sample".into(),
            message: format!("expected 't_ms x y z', got '{line}'"),
        })?;
    let at_ms = at.parse::<u64>().map_err(|e| ValidationError::InvalidValue {
        field: "t_ms".into(),
        message: format!("'{at}': {e}"),
    })?;
    Ok((at_ms, rest.parse()?))
}

/// An accepted shake.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shake {
    pub magnitude: f64,
    pub at_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateSettings {
    pub threshold: f64,
    pub cooldown_ms: u64,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SHAKE_THRESHOLD,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
        }
    }
}

/// Threshold-plus-cooldown shake detector.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionGate {
    settings: GateSettings,
    /// Epoch milliseconds of the last accepted shake.
    #[serde(default)]
    last_shake_ms: Option<u64>,
}

impl MotionGate {
    pub fn new(settings: GateSettings) -> Self {
        Self {
            settings,
            last_shake_ms: None,
        }
    }

    /// Rebuild a gate whose last accepted shake happened at `last_shake_ms`.
    pub fn resume(settings: GateSettings, last_shake_ms: Option<u64>) -> Self {
        Self {
            settings,
            last_shake_ms,
        }
    }

    pub fn settings(&self) -> GateSettings {
        self.settings
    }

    pub fn last_shake_ms(&self) -> Option<u64> {
        self.last_shake_ms
    }

    /// Feed one sample taken at `now_ms`.
    ///
    /// While `session_active` is true the gate is fully suppressed: nothing
    /// is emitted and the cooldown timestamp is left untouched.
    pub fn sample(
        &mut self,
        sample: &MotionSample,
        now_ms: u64,
        session_active: bool,
    ) -> Option<Shake> {
        if session_active {
            return None;
        }
        let accel = sample.including_gravity?;
        let magnitude = accel.magnitude();

        if magnitude >= self.settings.threshold && self.cooldown_elapsed(now_ms) {
            self.last_shake_ms = Some(now_ms);
            return Some(Shake {
                magnitude,
                at_ms: now_ms,
            });
        }
        None
    }

    fn cooldown_elapsed(&self, now_ms: u64) -> bool {
        match self.last_shake_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > self.settings.cooldown_ms,
        }
    }
}
