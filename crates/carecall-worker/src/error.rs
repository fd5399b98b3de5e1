use carecall_agent::AgentError;
use carecall_store::StoreError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that stop the worker.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("console i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// A console line named a tool but its arguments could not be mapped.
    #[error("bad input for /{tool}: {reason}")]
    ConsoleInput { tool: String, reason: String },
}
