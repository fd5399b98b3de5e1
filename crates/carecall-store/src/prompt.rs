//! Per-persona instruction documents.

use std::path::{Path, PathBuf};

use carecall_types::PersonaKind;
use serde::Deserialize;

use crate::error::StoreError;

#[derive(Debug, Deserialize)]
struct PromptDocument {
    #[serde(default)]
    instructions: String,
}

/// Loads the `instructions` field from TOML prompt documents.
#[derive(Debug, Clone)]
pub struct PromptLoader {
    dir: PathBuf,
}

impl PromptLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads `file` from the prompts directory and returns its
    /// `instructions`. A document without the field yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file cannot be read and
    /// `StoreError::Prompt` if it is not valid TOML.
    pub fn load(&self, file: &str) -> Result<String, StoreError> {
        let contents = std::fs::read_to_string(self.dir.join(file))?;
        let doc: PromptDocument = toml::from_str(&contents)?;
        Ok(doc.instructions)
    }

    /// Instructions for `persona`, or an empty string if its document is
    /// missing or malformed.
    pub fn instructions_for(&self, persona: PersonaKind) -> String {
        let file = persona.prompt_file();
        match self.load(file) {
            Ok(instructions) => instructions,
            Err(e) => {
                tracing::error!(file, error = %e, "failed to load prompt file");
                String::new()
            }
        }
    }
}
