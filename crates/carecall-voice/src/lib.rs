//! LiveKit platform boundary for the CareCall agent.
//!
//! Everything the agent asks of the hosted voice platform goes through the
//! [`PlatformApi`] trait: announcing participant attributes, deleting the
//! call's room, dispatching the agent to a room, and dialing a SIP leg.
//! [`LiveKitPlatform`] implements it against the LiveKit server API;
//! [`MockPlatform`] records calls in memory for tests and offline runs.
//!
//! A [`CallHandle`] binds the platform to one active call and owns the
//! delayed, cancellable room teardown ([`TeardownHandle`]).

pub mod call;
pub mod config;
pub mod error;
pub mod livekit;
pub mod mock;
pub mod phone;
pub mod platform;
pub mod teardown;

pub use call::CallHandle;
pub use config::{LiveKitConfig, TelephonyConfig, MASKED_OPERATOR_PHONE};
pub use error::VoiceError;
pub use livekit::LiveKitPlatform;
pub use mock::{MockPlatform, PlatformCall};
pub use phone::validate_e164;
pub use platform::{AgentDispatch, DispatchRequest, PlatformApi, SipCallRequest, SipParticipant};
pub use teardown::{schedule_teardown, TeardownHandle, DEFAULT_TEARDOWN_GRACE};
