//! Error types for the persistence layer.

/// Errors that can occur reading or writing CareCall data files.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A filesystem operation failed.
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A request-log row could not be written or parsed.
    #[error("request log error: {0}")]
    Csv(#[from] csv::Error),

    /// A prompt document is not valid TOML.
    #[error("prompt parse error: {0}")]
    Prompt(#[from] toml::de::Error),
}
