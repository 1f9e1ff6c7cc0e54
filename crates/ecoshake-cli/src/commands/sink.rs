use std::io::{IsTerminal, Write};

use ecoshake_core::error::FeedbackError;
use ecoshake_core::feedback::{Channel, NotifyLevel};
use ecoshake_core::FeedbackSink;

/// Renders feedback as lines on stderr. Tones ring the terminal bell when
/// stderr is a terminal and are unsupported otherwise.
pub struct TerminalSink {
    bell: bool,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self {
            bell: std::io::stderr().is_terminal(),
        }
    }
}

impl FeedbackSink for TerminalSink {
    fn vibrate(&mut self, pattern_ms: &[u32]) -> Result<(), FeedbackError> {
        let pattern: Vec<String> = pattern_ms.iter().map(u32::to_string).collect();
        eprintln!("~ bzz {}", pattern.join("-"));
        Ok(())
    }

    fn tone(&mut self, frequency_hz: u32, _duration_ms: u32, delay_ms: u32) -> Result<(), FeedbackError> {
        if !self.bell {
            return Err(FeedbackError::Unsupported {
                channel: Channel::Audio.name(),
            });
        }
        // One bell per chord.
        if delay_ms == 0 {
            let mut err = std::io::stderr();
            write!(err, "\x07").map_err(|e| FeedbackError::Failed {
                channel: Channel::Audio.name(),
                message: e.to_string(),
            })?;
        }
        tracing::trace!(frequency_hz, delay_ms, "tone");
        Ok(())
    }

    fn notify(
        &mut self,
        level: NotifyLevel,
        title: &str,
        description: Option<&str>,
        _duration_ms: Option<u32>,
    ) -> Result<(), FeedbackError> {
        let marker = match level {
            NotifyLevel::Success => "✔",
            NotifyLevel::Info => "ℹ",
            NotifyLevel::Error => "✖",
        };
        match description {
            Some(description) => eprintln!("{marker} {title}: {description}"),
            None => eprintln!("{marker} {title}"),
        }
        Ok(())
    }

    fn water(&mut self, duration_ms: u32) -> Result<(), FeedbackError> {
        eprintln!("💧 watering the tree ({:.1}s)", f64::from(duration_ms) / 1000.0);
        Ok(())
    }
}
