//! Append-only CSV log of caller requests.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use carecall_types::RequestLogEntry;
use chrono::{Local, NaiveDateTime};

use crate::error::StoreError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const HEADER: [&str; 2] = ["timestamp", "detail"];

/// Appends caller-reported issues as `timestamp,detail` rows.
#[derive(Debug, Clone)]
pub struct RequestLog {
    path: PathBuf,
}

impl RequestLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `detail` stamped with the current local time.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` or `StoreError::Csv` if the row cannot be
    /// written.
    pub fn append(&self, detail: &str) -> Result<RequestLogEntry, StoreError> {
        self.append_at(detail, Local::now().naive_local())
    }

    /// Appends `detail` with an explicit timestamp. The header row is
    /// written only when the file does not exist yet.
    pub fn append_at(
        &self,
        detail: &str,
        at: NaiveDateTime,
    ) -> Result<RequestLogEntry, StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let write_header = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if write_header {
            writer.write_record(HEADER)?;
        }

        let entry = RequestLogEntry {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            detail: detail.to_string(),
        };
        writer.write_record([entry.timestamp.as_str(), entry.detail.as_str()])?;
        writer.flush()?;

        tracing::info!(path = %self.path.display(), detail, "logged caller request");
        Ok(entry)
    }

    /// Reads every logged row in file order. A missing file is an empty log.
    pub fn entries(&self) -> Result<Vec<RequestLogEntry>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut entries = Vec::new();
        for row in reader.deserialize() {
            entries.push(row?);
        }
        Ok(entries)
    }
}
