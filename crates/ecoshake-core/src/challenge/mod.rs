mod lifecycle;
mod session;

pub use lifecycle::{ChallengeLifecycle, LifecycleState, Resolution, TriggerSource};
pub use session::{ActiveSession, SessionView, TickOutcome};
