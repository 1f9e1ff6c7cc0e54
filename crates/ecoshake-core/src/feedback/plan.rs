//! Which feedback each event produces.

use serde::{Deserialize, Serialize};

use super::effect::{Effect, NotifyLevel};
use crate::events::Event;
use crate::motion::SensorAccess;

const TRIGGER_VIBRATION: [u32; 5] = [100, 50, 100, 50, 100];
const CONFIRM_VIBRATION: [u32; 3] = [200, 100, 200];
const CELEBRATION_VIBRATION: [u32; 5] = [200, 100, 200, 100, 400];

/// (frequency Hz, duration ms, delay ms)
const TRIGGER_TONES: [(u32, u32, u32); 2] = [(800, 100, 0), (1000, 100, 150)];
const CELEBRATION_TONES: [(u32, u32, u32); 3] = [(600, 100, 0), (800, 100, 100), (1000, 200, 200)];

const WATERING_MS: u32 = 2000;

/// Per-channel switches, stored under `[feedback]` in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSettings {
    #[serde(default = "default_true")]
    pub vibration: bool,
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default = "default_true")]
    pub notifications: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            vibration: true,
            sound: true,
            notifications: true,
        }
    }
}

/// Feedback effects for one event, filtered by `settings`.
pub fn plan(event: &Event, settings: &FeedbackSettings) -> Vec<Effect> {
    let mut out = Planner {
        settings,
        effects: Vec::new(),
    };

    match event {
        Event::ChallengeTriggered { title, .. } => {
            out.vibrate(&TRIGGER_VIBRATION);
            out.tones(&TRIGGER_TONES);
            out.notify(
                NotifyLevel::Success,
                "Challenge Triggered!",
                Some(title.clone()),
                Some(2000),
            );
        }
        Event::ChallengeCompleted { .. } => {
            out.vibrate(&CONFIRM_VIBRATION);
            out.effects.push(Effect::Water {
                duration_ms: WATERING_MS,
            });
            out.vibrate(&CELEBRATION_VIBRATION);
            out.tones(&CELEBRATION_TONES);
            out.notify(
                NotifyLevel::Success,
                "Awesome! Challenge Completed! 🎉",
                Some("Your tree has been watered".into()),
                Some(3000),
            );
        }
        Event::ChallengeSkipped { .. } => {
            out.notify(
                NotifyLevel::Info,
                "No worries, try again next time",
                None,
                Some(2000),
            );
        }
        Event::SensorArmed { .. } => {
            out.notify(
                NotifyLevel::Success,
                "Shake enabled! Start shaking your phone",
                None,
                None,
            );
        }
        Event::SensorRefused { access, .. } => {
            let title = match access {
                SensorAccess::Failed { .. } => "Permission request failed",
                _ => "Motion sensor permission required for shake functionality",
            };
            // Shown even with notifications switched off.
            out.effects.push(Effect::notify(NotifyLevel::Error, title));
        }
        _ => {}
    }

    out.effects
}

struct Planner<'a> {
    settings: &'a FeedbackSettings,
    effects: Vec<Effect>,
}

impl Planner<'_> {
    fn vibrate(&mut self, pattern: &[u32]) {
        if self.settings.vibration {
            self.effects.push(Effect::Vibrate {
                pattern_ms: pattern.to_vec(),
            });
        }
    }

    fn tones(&mut self, tones: &[(u32, u32, u32)]) {
        if !self.settings.sound {
            return;
        }
        for &(frequency_hz, duration_ms, delay_ms) in tones {
            self.effects.push(Effect::Tone {
                frequency_hz,
                duration_ms,
                delay_ms,
            });
        }
    }

    fn notify(
        &mut self,
        level: NotifyLevel,
        title: &str,
        description: Option<String>,
        duration_ms: Option<u32>,
    ) {
        if self.settings.notifications {
            self.effects.push(Effect::Notify {
                level,
                title: title.to_string(),
                description,
                duration_ms,
            });
        }
    }
}
