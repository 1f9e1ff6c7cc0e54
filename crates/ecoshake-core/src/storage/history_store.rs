use super::database::KeyValueStore;
use crate::error::StorageError;
use crate::history::History;

/// Fixed key the history array lives under.
pub const HISTORY_KEY: &str = "shake-challenge-history";

/// Reads and overwrites the history array in a [`KeyValueStore`].
pub struct HistoryStore<S> {
    store: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the persisted history.
    ///
    /// Missing, unreadable or malformed data all yield an empty history; the
    /// failure is logged and never returned.
    pub fn load(&self) -> History {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return History::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read history, starting empty");
                return History::new();
            }
        };

        match History::from_json(&raw) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse stored history, starting empty");
                History::new()
            }
        }
    }

    /// Full overwrite of the stored history.
    pub fn save(&self, history: &History) -> Result<(), StorageError> {
        let json = history.to_json().map_err(|source| StorageError::Encode {
            key: HISTORY_KEY.to_string(),
            source,
        })?;
        self.store.set(HISTORY_KEY, &json)
    }
}
