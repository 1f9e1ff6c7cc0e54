use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Challenge;

/// Result of delivering one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Ticked { remaining_secs: u32 },
    /// This tick brought the countdown to zero.
    Expired,
    /// Countdown already at zero or session inactive; nothing changed.
    Frozen,
}

/// The challenge currently presented to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSession {
    id: Uuid,
    challenge: Challenge,
    remaining_secs: u32,
    active: bool,
    /// Epoch milliseconds.
    started_at_ms: u64,
}

impl ActiveSession {
    pub fn new(challenge: Challenge, started_at_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            remaining_secs: challenge.duration_secs,
            challenge,
            active: true,
            started_at_ms,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn started_at_ms(&self) -> u64 {
        self.started_at_ms
    }

    /// The 1 s timer only needs to run while this is true.
    pub fn countdown_running(&self) -> bool {
        self.active && self.remaining_secs > 0
    }

    /// 0.0 .. 100.0 elapsed share of the challenge duration.
    pub fn progress_pct(&self) -> f64 {
        let total = self.challenge.duration_secs;
        if total == 0 {
            return 100.0;
        }
        f64::from(total.saturating_sub(self.remaining_secs)) / f64::from(total) * 100.0
    }

    /// `m:ss`
    pub fn clock_text(&self) -> String {
        format!("{}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id,
            challenge_id: self.challenge.id.clone(),
            title: self.challenge.title.clone(),
            description: self.challenge.description.clone(),
            duration_secs: self.challenge.duration_secs,
            remaining_secs: self.remaining_secs,
            progress_pct: self.progress_pct(),
            clock: self.clock_text(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Decrement by one second. Never goes below zero and never resolves.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.countdown_running() {
            return TickOutcome::Frozen;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    /// Stop accepting ticks. Called as the session is being resolved.
    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Serializable projection of a session for snapshots and CLI output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub challenge_id: String,
    pub title: String,
    pub description: String,
    pub duration_secs: u32,
    pub remaining_secs: u32,
    pub progress_pct: f64,
    pub clock: String,
}
