//! Sensor permission negotiation.
//!
//! Some platforms deliver motion events unconditionally, others require a
//! one-shot asynchronous grant first. The host performs the request; the core
//! only records the outcome and decides whether the gate is armed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Outcome of the platform capability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SensorAccess {
    /// The platform delivers motion events without asking.
    NotRequired,
    Granted,
    Denied,
    /// The permission request itself errored.
    Failed { reason: String },
}

impl SensorAccess {
    pub fn allows_motion(&self) -> bool {
        matches!(self, SensorAccess::NotRequired | SensorAccess::Granted)
    }
}

impl fmt::Display for SensorAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorAccess::NotRequired => write!(f, "not-required"),
            SensorAccess::Granted => write!(f, "granted"),
            SensorAccess::Denied => write!(f, "denied"),
            SensorAccess::Failed { reason } => write!(f, "failed ({reason})"),
        }
    }
}

impl FromStr for SensorAccess {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not-required" | "not_required" => Ok(SensorAccess::NotRequired),
            "granted" => Ok(SensorAccess::Granted),
            "denied" => Ok(SensorAccess::Denied),
            "error" | "failed" => Ok(SensorAccess::Failed {
                reason: "permission request errored".into(),
            }),
            other => Err(ValidationError::InvalidValue {
                field: "sensor access".into(),
                message: format!("unknown outcome '{other}'"),
            }),
        }
    }
}

/// Whether motion samples reach the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmState {
    /// Shake detection not requested, or disabled.
    #[default]
    Unarmed,
    /// Waiting on the permission outcome. No detection happens meanwhile.
    Pending,
    Armed,
    /// Permission refused or errored. Terminal for the running instance;
    /// manual triggering is the only way to start a challenge.
    Refused,
}

impl ArmState {
    pub fn is_armed(self) -> bool {
        self == ArmState::Armed
    }
}
