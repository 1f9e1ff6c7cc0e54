mod config;
pub mod database;
mod history_store;

pub use config::{CatalogConfig, Config, MotionConfig};
pub use database::{Database, KeyValueStore, MemoryStore};
pub use history_store::{HistoryStore, HISTORY_KEY};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/ecoshake[-dev]/` based on ECOSHAKE_ENV.
///
/// Set ECOSHAKE_ENV=dev to use the development data directory, or
/// ECOSHAKE_HOME to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("ECOSHAKE_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("ECOSHAKE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("ecoshake-dev")
            } else {
                base_dir.join("ecoshake")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
