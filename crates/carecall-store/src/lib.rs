//! Flat-file persistence for the CareCall agent.
//!
//! Three stores live under a single data directory:
//!
//! | Store | File | Access pattern |
//! |-------|------|----------------|
//! | [`HistoryStore`] | `history/history.json` | overwritten on every completed call |
//! | [`RequestLog`] | `requests/requests.csv` | append-only rows |
//!
//! Persona instructions are read by [`PromptLoader`] from a separate prompts
//! directory of TOML documents.
//!
//! There is no locking. The files assume a single call in flight at a time.

mod error;
mod history;
mod layout;
mod prompt;
mod requests;

pub use error::StoreError;
pub use history::HistoryStore;
pub use layout::DataLayout;
pub use prompt::PromptLoader;
pub use requests::RequestLog;

/// The stores a call session writes to.
#[derive(Debug, Clone)]
pub struct Stores {
    pub history: HistoryStore,
    pub requests: RequestLog,
}

impl Stores {
    /// Opens both stores under `layout`. No files are touched until the
    /// first read or write.
    pub fn new(layout: &DataLayout) -> Self {
        Self {
            history: HistoryStore::new(layout.history_file()),
            requests: RequestLog::new(layout.requests_file()),
        }
    }
}
