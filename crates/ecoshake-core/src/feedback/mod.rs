//! Fire-and-forget feedback: haptics, tones, notifications, animations.

mod effect;
mod executor;
mod log;
mod plan;

pub use effect::{Channel, Effect, NotifyLevel};
pub use executor::{EffectExecutor, FeedbackSink, SilentSink};
pub use log::{EffectLog, EffectResult, ExecutionStatus};
pub use plan::{plan, FeedbackSettings};
