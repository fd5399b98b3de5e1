//! Shared types for the CareCall welfare-check agent.
//!
//! This crate holds the data model every other CareCall crate speaks:
//! conversation items and contexts, the fixed set of personas and their
//! transition table, the persisted history record, and request-log rows.
//!
//! Nothing here performs I/O. Persistence lives in `carecall-store`, the
//! platform boundary in `carecall-voice`, and behavior in `carecall-agent`.

mod chat;
mod history;
mod persona;

pub use chat::{ChatContext, ChatItem, ChatRole};
pub use history::{
    HistoryMessage, HistoryRecord, PreviousHistory, RequestLogEntry, HISTORY_MESSAGE_LIMIT,
    HISTORY_NOTE,
};
pub use persona::{ParsePersonaError, PersonaKind, Transition};
