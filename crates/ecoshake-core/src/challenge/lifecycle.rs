//! Challenge lifecycle state machine.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --trigger--> Active --tick--> Active (countdown, freezes at 0)
//! Active --complete|skip|cancel--> Idle
//! ```
//!
//! Like the rest of the core this is driven from outside: the caller
//! delivers ticks once per second and passes the current time into every
//! command. Each command returns `Some(Event)` when something changed.

use serde::{Deserialize, Serialize};

use super::session::{ActiveSession, TickOutcome};
use crate::catalog::Challenge;
use crate::events::Event;
use crate::history::{millis_to_utc, HistoryEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Idle,
    Active,
}

/// What started a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerSource {
    Shake,
    Manual,
}

/// How the user closed a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Logged as completed; advances the tree.
    Complete,
    /// Logged as not completed.
    Skip,
    /// Discarded silently.
    Cancel,
}

/// Holds at most one [`ActiveSession`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChallengeLifecycle {
    #[serde(default)]
    session: Option<ActiveSession>,
}

impl ChallengeLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> LifecycleState {
        if self.session.is_some() {
            LifecycleState::Active
        } else {
            LifecycleState::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&ActiveSession> {
        self.session.as_ref()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Open a session for `challenge`. A no-op while one is already open.
    pub fn trigger(
        &mut self,
        challenge: &Challenge,
        source: TriggerSource,
        now_ms: u64,
    ) -> Option<Event> {
        if self.session.is_some() {
            return None;
        }
        let session = ActiveSession::new(challenge.clone(), now_ms);
        let event = Event::ChallengeTriggered {
            session_id: session.id(),
            challenge_id: challenge.id.clone(),
            title: challenge.title.clone(),
            description: challenge.description.clone(),
            duration_secs: challenge.duration_secs,
            source,
            at: millis_to_utc(now_ms),
        };
        self.session = Some(session);
        Some(event)
    }

    /// Deliver one countdown second.
    pub fn tick(&mut self, now_ms: u64) -> Option<Event> {
        let session = self.session.as_mut()?;
        match session.tick() {
            TickOutcome::Ticked { remaining_secs } => Some(Event::CountdownTicked {
                session_id: session.id(),
                remaining_secs,
            }),
            TickOutcome::Expired => Some(Event::CountdownExpired {
                session_id: session.id(),
                at: millis_to_utc(now_ms),
            }),
            TickOutcome::Frozen => None,
        }
    }

    /// Close the open session. A no-op while idle.
    pub fn resolve(&mut self, resolution: Resolution, now_ms: u64) -> Option<Event> {
        let mut session = self.session.take()?;
        session.deactivate();
        let session_id = session.id();
        let event = match resolution {
            Resolution::Complete => Event::ChallengeCompleted {
                session_id,
                entry: HistoryEntry::record(session.challenge(), true, now_ms),
            },
            Resolution::Skip => Event::ChallengeSkipped {
                session_id,
                entry: HistoryEntry::record(session.challenge(), false, now_ms),
            },
            Resolution::Cancel => Event::ChallengeCancelled {
                session_id,
                challenge_id: session.challenge().id.clone(),
                at: millis_to_utc(now_ms),
            },
        };
        Some(event)
    }
}
