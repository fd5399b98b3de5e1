//! Error types for the persona runtime.

use carecall_types::{PersonaKind, Transition};

/// Errors returned to the session driver.
///
/// Capability failures the caller should hear about (persistence, SIP) are
/// handled inside the capability and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The model asked for a capability the active persona does not expose.
    #[error("persona {persona} has no tool named {tool}")]
    UnknownTool { persona: PersonaKind, tool: String },

    /// Tool arguments are missing a field or have the wrong shape.
    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// A handoff was requested that the transition table does not allow.
    #[error("no handoff from {from} on {transition:?}")]
    InvalidHandoff {
        from: PersonaKind,
        transition: Transition,
    },

    /// The speech pipeline failed.
    #[error("speech pipeline error: {0}")]
    Speech(String),

    /// The call already ended; no further callbacks are accepted.
    #[error("call session has ended")]
    SessionEnded,
}
