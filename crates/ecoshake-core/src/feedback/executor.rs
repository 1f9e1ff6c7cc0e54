//! Feedback execution.
//!
//! Runs the feedback effects of a batch against a [`FeedbackSink`]. Channel
//! failures are logged and recorded, never returned: the lifecycle does not
//! wait on or inspect feedback.

use super::effect::{Channel, Effect, NotifyLevel};
use super::log::{EffectLog, EffectResult, ExecutionStatus};
use crate::error::FeedbackError;

/// Platform side of the feedback channels.
pub trait FeedbackSink {
    fn vibrate(&mut self, pattern_ms: &[u32]) -> Result<(), FeedbackError>;

    fn tone(&mut self, frequency_hz: u32, duration_ms: u32, delay_ms: u32)
        -> Result<(), FeedbackError>;

    fn notify(
        &mut self,
        level: NotifyLevel,
        title: &str,
        description: Option<&str>,
        duration_ms: Option<u32>,
    ) -> Result<(), FeedbackError>;

    fn water(&mut self, duration_ms: u32) -> Result<(), FeedbackError>;
}

/// Sink for headless use: accepts everything, does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl FeedbackSink for SilentSink {
    fn vibrate(&mut self, _pattern_ms: &[u32]) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn tone(&mut self, _: u32, _: u32, _: u32) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn notify(
        &mut self,
        _: NotifyLevel,
        _: &str,
        _: Option<&str>,
        _: Option<u32>,
    ) -> Result<(), FeedbackError> {
        Ok(())
    }

    fn water(&mut self, _: u32) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Executes feedback effects and logs results
pub struct EffectExecutor {
    /// Whether to actually execute effects (false for dry-run)
    dry_run: bool,
}

impl EffectExecutor {
    pub fn new() -> Self {
        Self { dry_run: false }
    }

    /// Create a dry-run executor (doesn't touch the sink)
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }

    /// Execute every feedback effect in `effects`. Runtime effects are
    /// recorded as skipped; the shell handles those itself.
    pub fn execute_batch(&self, sink: &mut dyn FeedbackSink, effects: &[Effect]) -> EffectLog {
        let results = effects
            .iter()
            .map(|effect| self.execute(sink, effect))
            .collect();
        EffectLog::new(results)
    }

    fn execute(&self, sink: &mut dyn FeedbackSink, effect: &Effect) -> EffectResult {
        let effect_type = effect.type_name().to_string();

        if !effect.is_feedback() {
            return EffectResult {
                effect_type,
                status: ExecutionStatus::Skipped {
                    reason: "runtime effect".to_string(),
                },
            };
        }

        if self.dry_run {
            return EffectResult {
                effect_type,
                status: ExecutionStatus::Skipped {
                    reason: "dry-run mode".to_string(),
                },
            };
        }

        let outcome = match effect {
            Effect::Vibrate { pattern_ms } => sink.vibrate(pattern_ms),
            Effect::Tone {
                frequency_hz,
                duration_ms,
                delay_ms,
            } => sink.tone(*frequency_hz, *duration_ms, *delay_ms),
            Effect::Notify {
                level,
                title,
                description,
                duration_ms,
            } => sink.notify(*level, title, description.as_deref(), *duration_ms),
            Effect::Water { duration_ms } => sink.water(*duration_ms),
            _ => Ok(()),
        };

        let channel = effect.channel().map_or("none", Channel::name);
        let status = match outcome {
            Ok(()) => ExecutionStatus::Success,
            Err(e @ FeedbackError::Unsupported { .. }) => {
                tracing::debug!(effect = %effect_type, channel, error = %e, "feedback channel unavailable");
                ExecutionStatus::Failed {
                    reason: e.to_string(),
                }
            }
            Err(e) => {
                tracing::warn!(effect = %effect_type, channel, error = %e, "feedback effect failed");
                ExecutionStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        EffectResult {
            effect_type,
            status,
        }
    }
}

impl Default for EffectExecutor {
    fn default() -> Self {
        Self::new()
    }
}
