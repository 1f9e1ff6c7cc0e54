//! # EcoShake Core Library
//!
//! Core logic for EcoShake, a shake-to-challenge app that hands out small
//! eco-friendly tasks and grows a virtual tree as they get done. The CLI and
//! any other shell sit on top of the same library.
//!
//! ## Architecture
//!
//! - **Motion Gate**: turns accelerometer samples into discrete shakes using
//!   a magnitude threshold and a cooldown window
//! - **Challenge Lifecycle**: an Idle/Active state machine with a per-session
//!   countdown that the caller advances by delivering ticks
//! - **Feedback**: effect requests (haptics, tones, notifications, watering
//!   animation) planned from events and executed by the shell
//! - **Storage**: SQLite key-value persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`ShakeApp`]: the controller tying everything together
//! - [`MotionGate`]: shake detection
//! - [`ChallengeLifecycle`]: session state machine
//! - [`History`]: resolved-challenge log and its derived counters
//! - [`Config`]: application configuration management

pub mod app;
pub mod catalog;
pub mod challenge;
pub mod error;
pub mod events;
pub mod feedback;
pub mod history;
pub mod motion;
pub mod progression;
pub mod storage;

pub use app::{AppSnapshot, Input, Outcome, ShakeApp};
pub use catalog::{Catalog, Challenge};
pub use challenge::{ActiveSession, ChallengeLifecycle, LifecycleState, Resolution, SessionView, TriggerSource};
pub use error::{ConfigError, CoreError, FeedbackError, StorageError, ValidationError};
pub use events::Event;
pub use feedback::{Effect, EffectExecutor, FeedbackSettings, FeedbackSink};
pub use history::{History, HistoryEntry, HistorySummary};
pub use motion::{ArmState, MotionGate, MotionSample, SensorAccess};
pub use progression::{GrowthStage, Progression, GROWTH_STAGES};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};

/// Current time as epoch milliseconds, the unit every command takes.
pub fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}
