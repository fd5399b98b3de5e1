//! Persona runtime for the CareCall welfare-check agent.
//!
//! A call is handled by a [`CallSession`] that owns two personas:
//!
//! | Persona | Capabilities |
//! |---------|--------------|
//! | [`IntakeAgent`] | `verify_identity` |
//! | [`CheckInAgent`] | `register_request`, `transfer_call_to_human`, `end_call` |
//!
//! The session starts in intake. A verified caller is handed off to
//! check-in, which inherits a bounded tail of the intake conversation (see
//! [`carryover`]). Speech, turn detection and the language model sit behind
//! the [`SpeechSession`] trait; room and SIP operations behind
//! [`carecall_voice::PlatformApi`].
//!
//! The external event loop drives a session by calling
//! [`CallSession::start`], [`CallSession::user_said`] and
//! [`CallSession::invoke`]. All three take `&mut self`, so exactly one
//! callback runs at a time.

pub mod carryover;
pub mod error;
pub mod persona;
pub mod session;
pub mod speech;
pub mod tools;

pub use carryover::{carry_over, truncate_items, TruncateOptions, CARRYOVER_LIMIT};
pub use error::AgentError;
pub use persona::{AgentState, CheckInAgent, IntakeAgent, Persona};
pub use session::{CallSession, SessionServices};
pub use speech::{RecordingSpeech, SpeechSession};
pub use tools::{ToolCall, ToolOutcome, ToolParam, ToolSpec};
