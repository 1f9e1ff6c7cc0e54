//! Append-only log of resolved challenges.
//!
//! The serialized form is a bare JSON array so that a log written by an
//! older client is read back unchanged:
//!
//! ```json
//! [{"id":"3","title":"Unplug Unnecessary Outlets","completed":true,"timestamp":1718000000000}]
//! ```

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Challenge;

/// One resolved session. The title is captured at resolution time and never
/// re-joined against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub title: String,
    pub completed: bool,
    /// Epoch milliseconds.
    pub timestamp: u64,
}

impl HistoryEntry {
    pub fn record(challenge: &Challenge, completed: bool, timestamp: u64) -> Self {
        Self {
            id: challenge.id.clone(),
            title: challenge.title.clone(),
            completed,
            timestamp,
        }
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        millis_to_utc(self.timestamp)
    }

    /// `MM/DD HH:MM` in local time.
    pub fn display_time(&self) -> String {
        self.recorded_at()
            .with_timezone(&Local)
            .format("%m/%d %H:%M")
            .to_string()
    }
}

/// Completed versus total resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistorySummary {
    pub completed: usize,
    pub total: usize,
}

/// Ordered history. Insertion order is chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    /// The only mutation the log supports.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.completed).count()
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            completed: self.completed_count(),
            total: self.len(),
        }
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

pub(crate) fn millis_to_utc(ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default()
}
