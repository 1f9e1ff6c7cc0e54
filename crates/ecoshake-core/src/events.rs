use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::challenge::{LifecycleState, SessionView, TriggerSource};
use crate::history::HistoryEntry;
use crate::motion::{ArmState, SensorAccess};

/// Every state change in the system produces an Event.
/// The shell prints or forwards them; effect planning is derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ShakeDetected {
        magnitude: f64,
        at: DateTime<Utc>,
    },
    ChallengeTriggered {
        session_id: Uuid,
        challenge_id: String,
        title: String,
        description: String,
        duration_secs: u32,
        source: TriggerSource,
        at: DateTime<Utc>,
    },
    CountdownTicked {
        session_id: Uuid,
        remaining_secs: u32,
    },
    /// Countdown hit zero. The session stays open until the user acts.
    CountdownExpired {
        session_id: Uuid,
        at: DateTime<Utc>,
    },
    ChallengeCompleted {
        session_id: Uuid,
        entry: HistoryEntry,
    },
    ChallengeSkipped {
        session_id: Uuid,
        entry: HistoryEntry,
    },
    /// Dismissed without a history record.
    ChallengeCancelled {
        session_id: Uuid,
        challenge_id: String,
        at: DateTime<Utc>,
    },
    GrowthStageReached {
        stage: String,
        completed: usize,
        at: DateTime<Utc>,
    },
    SensorArmRequested {
        at: DateTime<Utc>,
    },
    SensorArmed {
        access: SensorAccess,
        at: DateTime<Utc>,
    },
    SensorRefused {
        access: SensorAccess,
        at: DateTime<Utc>,
    },
    SensorDisarmed {
        at: DateTime<Utc>,
    },
    /// History was appended in memory but the write to storage failed.
    HistoryNotSaved {
        reason: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: LifecycleState,
        session: Option<SessionView>,
        arm: ArmState,
        completed: usize,
        total: usize,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The history record carried by a resolution event, if any.
    pub fn history_entry(&self) -> Option<&HistoryEntry> {
        match self {
            Event::ChallengeCompleted { entry, .. } | Event::ChallengeSkipped { entry, .. } => {
                Some(entry)
            }
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Event::ShakeDetected { .. } => "ShakeDetected",
            Event::ChallengeTriggered { .. } => "ChallengeTriggered",
            Event::CountdownTicked { .. } => "CountdownTicked",
            Event::CountdownExpired { .. } => "CountdownExpired",
            Event::ChallengeCompleted { .. } => "ChallengeCompleted",
            Event::ChallengeSkipped { .. } => "ChallengeSkipped",
            Event::ChallengeCancelled { .. } => "ChallengeCancelled",
            Event::GrowthStageReached { .. } => "GrowthStageReached",
            Event::SensorArmRequested { .. } => "SensorArmRequested",
            Event::SensorArmed { .. } => "SensorArmed",
            Event::SensorRefused { .. } => "SensorRefused",
            Event::SensorDisarmed { .. } => "SensorDisarmed",
            Event::HistoryNotSaved { .. } => "HistoryNotSaved",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}
