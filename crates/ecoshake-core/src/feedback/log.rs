//! Effect execution logging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of executing a single effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectResult {
    /// Type of effect that was executed
    pub effect_type: String,
    /// Execution status
    pub status: ExecutionStatus,
}

/// Status of effect execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    Success,
    /// The channel failed or is unsupported. Never retried.
    Failed { reason: String },
    Skipped { reason: String },
}

/// Log of one executed batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectLog {
    pub executed_at: DateTime<Utc>,
    pub results: Vec<EffectResult>,
}

impl EffectLog {
    pub fn new(results: Vec<EffectResult>) -> Self {
        Self {
            executed_at: Utc::now(),
            results,
        }
    }

    pub fn success_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, ExecutionStatus::Success))
            .count()
    }

    pub fn failure_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, ExecutionStatus::Failed { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, ExecutionStatus::Skipped { .. }))
            .count()
    }
}
