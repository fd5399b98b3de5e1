//! The single-record call history file.

use std::path::{Path, PathBuf};

use carecall_types::{HistoryRecord, PreviousHistory};

use crate::error::StoreError;

/// Reads and overwrites the history record of the last completed call.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the previous call's record.
    ///
    /// Never fails: a missing file yields [`PreviousHistory::Missing`] and a
    /// file that cannot be read or parsed yields
    /// [`PreviousHistory::Unreadable`] after logging the cause.
    pub fn load_previous(&self) -> PreviousHistory {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return PreviousHistory::Missing;
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read history file");
                return PreviousHistory::Unreadable;
            }
        };

        match serde_json::from_str::<HistoryRecord>(&contents) {
            Ok(record) => PreviousHistory::Record(record),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to parse history file");
                PreviousHistory::Unreadable
            }
        }
    }

    /// Overwrites the stored record, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory or file cannot be written.
    pub fn save(&self, record: &HistoryRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, json)?;
        tracing::debug!(
            path = %self.path.display(),
            messages = record.last_messages.len(),
            "saved call history"
        );
        Ok(())
    }
}
