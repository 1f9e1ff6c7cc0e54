mod gate;
mod permission;

pub use gate::{
    parse_recorded_line, Acceleration, GateSettings, MotionGate, MotionSample, Shake,
    DEFAULT_COOLDOWN_MS, DEFAULT_SHAKE_THRESHOLD,
};
pub use permission::{ArmState, SensorAccess};
