//! Effect requests.
//!
//! The core never touches hardware or timers. It returns effects and the
//! shell carries them out, or ignores the ones the platform cannot do.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    Success,
    Info,
    Error,
}

/// Feedback channel an effect belongs to. Runtime effects have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Haptic,
    Audio,
    Notification,
    Animation,
}

impl Channel {
    pub fn name(self) -> &'static str {
        match self {
            Channel::Haptic => "haptic",
            Channel::Audio => "audio",
            Channel::Notification => "notification",
            Channel::Animation => "animation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Effect {
    /// Alternating on/off durations in milliseconds, starting with "on".
    Vibrate { pattern_ms: Vec<u32> },
    /// Sine tone, started `delay_ms` after the request.
    Tone {
        frequency_hz: u32,
        duration_ms: u32,
        delay_ms: u32,
    },
    Notify {
        level: NotifyLevel,
        title: String,
        description: Option<String>,
        duration_ms: Option<u32>,
    },
    /// Watering animation on the tree.
    Water { duration_ms: u32 },
    /// Begin delivering countdown ticks for this session.
    StartCountdown { session_id: Uuid, interval_ms: u64 },
    /// Release the countdown timer of this session.
    StopCountdown { session_id: Uuid },
    /// Ask the platform for motion sensor access.
    RequestPermission,
    SubscribeMotion,
    UnsubscribeMotion,
}

impl Effect {
    pub fn notify(level: NotifyLevel, title: impl Into<String>) -> Self {
        Effect::Notify {
            level,
            title: title.into(),
            description: None,
            duration_ms: None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Effect::Vibrate { .. } => "Vibrate",
            Effect::Tone { .. } => "Tone",
            Effect::Notify { .. } => "Notify",
            Effect::Water { .. } => "Water",
            Effect::StartCountdown { .. } => "StartCountdown",
            Effect::StopCountdown { .. } => "StopCountdown",
            Effect::RequestPermission => "RequestPermission",
            Effect::SubscribeMotion => "SubscribeMotion",
            Effect::UnsubscribeMotion => "UnsubscribeMotion",
        }
    }

    /// `None` for effects that drive the runtime rather than the user.
    pub fn channel(&self) -> Option<Channel> {
        match self {
            Effect::Vibrate { .. } => Some(Channel::Haptic),
            Effect::Tone { .. } => Some(Channel::Audio),
            Effect::Notify { .. } => Some(Channel::Notification),
            Effect::Water { .. } => Some(Channel::Animation),
            _ => None,
        }
    }

    pub fn is_feedback(&self) -> bool {
        self.channel().is_some()
    }
}
