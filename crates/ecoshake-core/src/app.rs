//! Application controller.
//!
//! [`ShakeApp`] is the single update function of the system. Every external
//! stimulus (a motion sample, a countdown tick, a button press, a permission
//! outcome) arrives as an [`Input`] together with the current time, and the
//! controller answers with an [`Outcome`]: the events that happened and the
//! effects the shell should carry out. History is written to storage
//! synchronously whenever it changes.
//!
//! ```ignore
//! let mut app = ShakeApp::new(Database::open()?, Catalog::builtin(), &config);
//! app.handle(Input::EnableShake, now_ms());
//! // platform answers the permission request:
//! app.handle(Input::PermissionResolved(SensorAccess::Granted), now_ms());
//! // for every motion event:
//! let outcome = app.handle(Input::Motion(sample), now_ms());
//! ```

use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::challenge::{ActiveSession, ChallengeLifecycle, Resolution, TriggerSource};
use crate::error::StorageError;
use crate::events::Event;
use crate::feedback::{plan, Effect, FeedbackSettings};
use crate::history::{millis_to_utc, History};
use crate::motion::{ArmState, MotionGate, MotionSample, SensorAccess};
use crate::progression::Progression;
use crate::storage::{Config, HistoryStore, KeyValueStore};

/// Period of the countdown timer.
pub const COUNTDOWN_INTERVAL_MS: u64 = 1000;

/// Key the controller state is parked under between CLI invocations.
pub const SNAPSHOT_KEY: &str = "ecoshake-controller";

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Motion(MotionSample),
    /// One second of countdown elapsed.
    Tick,
    /// The "random challenge" button.
    RandomChallenge,
    Complete,
    Skip,
    Cancel,
    /// The "enable shake" button. Starts permission negotiation.
    EnableShake,
    PermissionResolved(SensorAccess),
    DisableShake,
}

/// Events and effect requests produced by one input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub events: Vec<Event>,
    pub effects: Vec<Effect>,
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.effects.is_empty()
    }

    pub fn extend(&mut self, other: Outcome) {
        self.events.extend(other.events);
        self.effects.extend(other.effects);
    }
}

/// The parts of the controller that outlive one CLI invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSnapshot {
    #[serde(default)]
    pub last_shake_ms: Option<u64>,
    #[serde(default)]
    pub lifecycle: ChallengeLifecycle,
}

pub struct ShakeApp<S: KeyValueStore> {
    catalog: Catalog,
    gate: MotionGate,
    lifecycle: ChallengeLifecycle,
    history: History,
    store: HistoryStore<S>,
    arm: ArmState,
    feedback: FeedbackSettings,
    rng: Mcg128Xsl64,
}

impl<S: KeyValueStore> ShakeApp<S> {
    /// Build the controller and read the persisted history once.
    pub fn new(store: S, catalog: Catalog, config: &Config) -> Self {
        Self::with_rng(store, catalog, config, Mcg128Xsl64::from_entropy())
    }

    /// Deterministic challenge draws, for tests and replays.
    pub fn seeded(store: S, catalog: Catalog, config: &Config, seed: u64) -> Self {
        Self::with_rng(store, catalog, config, Mcg128Xsl64::seed_from_u64(seed))
    }

    fn with_rng(store: S, catalog: Catalog, config: &Config, rng: Mcg128Xsl64) -> Self {
        let store = HistoryStore::new(store);
        let history = store.load();
        tracing::debug!(entries = history.len(), "history loaded");
        Self {
            catalog,
            gate: MotionGate::new(config.gate_settings()),
            lifecycle: ChallengeLifecycle::new(),
            history,
            store,
            arm: ArmState::Unarmed,
            feedback: config.feedback,
            rng,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn session(&self) -> Option<&ActiveSession> {
        self.lifecycle.session()
    }

    pub fn arm_state(&self) -> ArmState {
        self.arm
    }

    pub fn gate(&self) -> &MotionGate {
        &self.gate
    }

    pub fn progression(&self) -> Progression {
        Progression::for_completed(self.history.completed_count())
    }

    pub fn store(&self) -> &S {
        self.store.store()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now_ms: u64) -> Event {
        let summary = self.history.summary();
        Event::StateSnapshot {
            state: self.lifecycle.state(),
            session: self.lifecycle.session().map(ActiveSession::view),
            arm: self.arm,
            completed: summary.completed,
            total: summary.total,
            at: millis_to_utc(now_ms),
        }
    }

    // ── Update ───────────────────────────────────────────────────────

    pub fn handle(&mut self, input: Input, now_ms: u64) -> Outcome {
        let mut out = Outcome::default();
        match input {
            Input::Motion(sample) => self.on_motion(&sample, now_ms, &mut out),
            Input::Tick => self.on_tick(now_ms, &mut out),
            Input::RandomChallenge => self.start_challenge(TriggerSource::Manual, now_ms, &mut out),
            Input::Complete => self.resolve(Resolution::Complete, now_ms, &mut out),
            Input::Skip => self.resolve(Resolution::Skip, now_ms, &mut out),
            Input::Cancel => self.resolve(Resolution::Cancel, now_ms, &mut out),
            Input::EnableShake => self.enable_shake(now_ms, &mut out),
            Input::PermissionResolved(access) => self.permission_resolved(access, now_ms, &mut out),
            Input::DisableShake => self.disable_shake(now_ms, &mut out),
        }
        out
    }

    /// Release the countdown timer and motion subscription before the
    /// controller goes away. The open session, if any, is left as is.
    pub fn shutdown(&self) -> Outcome {
        let mut out = Outcome::default();
        if let Some(session) = self.lifecycle.session() {
            if session.countdown_running() {
                out.effects.push(Effect::StopCountdown {
                    session_id: session.id(),
                });
            }
        }
        if self.arm.is_armed() {
            out.effects.push(Effect::UnsubscribeMotion);
        }
        out
    }

    // ── Persistence of controller state ──────────────────────────────

    pub fn save_state(&self) -> Result<(), StorageError> {
        let snapshot = AppSnapshot {
            last_shake_ms: self.gate.last_shake_ms(),
            lifecycle: self.lifecycle.clone(),
        };
        let json = serde_json::to_string(&snapshot).map_err(|source| StorageError::Encode {
            key: SNAPSHOT_KEY.to_string(),
            source,
        })?;
        self.store.store().set(SNAPSHOT_KEY, &json)
    }

    /// Restore state parked by [`save_state`](Self::save_state). Unreadable
    /// state is dropped with a warning. Arming is per process and is not
    /// restored.
    pub fn restore_state(&mut self) {
        let raw = match self.store.store().get(SNAPSHOT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read controller state");
                return;
            }
        };
        match serde_json::from_str::<AppSnapshot>(&raw) {
            Ok(snapshot) => {
                self.gate = MotionGate::resume(self.gate.settings(), snapshot.last_shake_ms);
                self.lifecycle = snapshot.lifecycle;
            }
            Err(e) => tracing::warn!(error = %e, "discarding unreadable controller state"),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn emit(&self, event: Event, out: &mut Outcome) {
        out.effects.extend(plan(&event, &self.feedback));
        out.events.push(event);
    }

    fn on_motion(&mut self, sample: &MotionSample, now_ms: u64, out: &mut Outcome) {
        if !self.arm.is_armed() {
            return;
        }
        let Some(shake) = self
            .gate
            .sample(sample, now_ms, self.lifecycle.is_active())
        else {
            return;
        };
        tracing::debug!(magnitude = shake.magnitude, "shake detected");
        out.events.push(Event::ShakeDetected {
            magnitude: shake.magnitude,
            at: millis_to_utc(shake.at_ms),
        });
        self.start_challenge(TriggerSource::Shake, now_ms, out);
    }

    fn start_challenge(&mut self, source: TriggerSource, now_ms: u64, out: &mut Outcome) {
        if self.lifecycle.is_active() {
            tracing::debug!(?source, "trigger ignored, a challenge is already open");
            return;
        }
        let challenge = self.catalog.pick(&mut self.rng);
        let Some(event) = self.lifecycle.trigger(challenge, source, now_ms) else {
            return;
        };
        tracing::debug!(challenge = %challenge.id, ?source, "challenge started");
        if let Some(session) = self.lifecycle.session() {
            out.effects.push(Effect::StartCountdown {
                session_id: session.id(),
                interval_ms: COUNTDOWN_INTERVAL_MS,
            });
        }
        self.emit(event, out);
    }

    fn on_tick(&mut self, now_ms: u64, out: &mut Outcome) {
        let Some(event) = self.lifecycle.tick(now_ms) else {
            return;
        };
        if let Event::CountdownExpired { session_id, .. } = &event {
            tracing::debug!(%session_id, "countdown reached zero, waiting for the user");
            out.effects.push(Effect::StopCountdown {
                session_id: *session_id,
            });
        }
        self.emit(event, out);
    }

    fn resolve(&mut self, resolution: Resolution, now_ms: u64, out: &mut Outcome) {
        let Some((session_id, countdown_running)) = self
            .lifecycle
            .session()
            .map(|s| (s.id(), s.countdown_running()))
        else {
            tracing::debug!(?resolution, "nothing to resolve");
            return;
        };
        let Some(event) = self.lifecycle.resolve(resolution, now_ms) else {
            return;
        };
        tracing::debug!(%session_id, ?resolution, "challenge resolved");

        if countdown_running {
            out.effects.push(Effect::StopCountdown { session_id });
        }

        let entry = event.history_entry().cloned();
        self.emit(event, out);

        if let Some(entry) = entry {
            let before = self.history.completed_count();
            self.history.append(entry);
            if let Err(e) = self.store.save(&self.history) {
                tracing::error!(error = %e, "failed to persist history");
                out.events.push(Event::HistoryNotSaved {
                    reason: e.to_string(),
                    at: millis_to_utc(now_ms),
                });
            }
            let after = self.history.completed_count();
            if let Some(stage) = Progression::crossed(before, after) {
                self.emit(
                    Event::GrowthStageReached {
                        stage: stage.name.to_string(),
                        completed: after,
                        at: millis_to_utc(now_ms),
                    },
                    out,
                );
            }
        }
    }

    fn enable_shake(&mut self, now_ms: u64, out: &mut Outcome) {
        match self.arm {
            ArmState::Unarmed => {
                self.arm = ArmState::Pending;
                out.events.push(Event::SensorArmRequested {
                    at: millis_to_utc(now_ms),
                });
                out.effects.push(Effect::RequestPermission);
            }
            ArmState::Refused => {
                tracing::debug!("motion access was refused, only manual challenges are available");
            }
            ArmState::Pending | ArmState::Armed => {}
        }
    }

    fn permission_resolved(&mut self, access: SensorAccess, now_ms: u64, out: &mut Outcome) {
        if self.arm != ArmState::Pending {
            tracing::debug!(%access, "permission outcome without a pending request");
            return;
        }
        let at = millis_to_utc(now_ms);
        if access.allows_motion() {
            tracing::info!(%access, "shake detection armed");
            self.arm = ArmState::Armed;
            out.effects.push(Effect::SubscribeMotion);
            self.emit(Event::SensorArmed { access, at }, out);
        } else {
            if let SensorAccess::Failed { reason } = &access {
                tracing::warn!(%reason, "permission request failed");
            } else {
                tracing::info!(%access, "motion access refused");
            }
            self.arm = ArmState::Refused;
            self.emit(Event::SensorRefused { access, at }, out);
        }
    }

    fn disable_shake(&mut self, now_ms: u64, out: &mut Outcome) {
        let was = self.arm;
        match was {
            ArmState::Armed | ArmState::Pending => {
                self.arm = ArmState::Unarmed;
                if was == ArmState::Armed {
                    out.effects.push(Effect::UnsubscribeMotion);
                }
                out.events.push(Event::SensorDisarmed {
                    at: millis_to_utc(now_ms),
                });
            }
            ArmState::Unarmed | ArmState::Refused => {}
        }
    }
}
