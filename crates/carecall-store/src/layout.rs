use std::path::{Path, PathBuf};

/// Directory layout for persisted call data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn history_file(&self) -> PathBuf {
        self.root.join("history").join("history.json")
    }

    pub fn requests_file(&self) -> PathBuf {
        self.root.join("requests").join("requests.csv")
    }
}
