//! The capability interface the agent consumes from the voice platform.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::VoiceError;

/// Request to assign a named agent to a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub agent_name: String,
    pub room: String,
    pub metadata: String,
}

/// A created agent dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AgentDispatch {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "agentName")]
    pub agent_name: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub metadata: String,
}

/// Request to dial a phone number into a room over a SIP trunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SipCallRequest {
    pub trunk_id: String,
    pub call_to: String,
    pub room_name: String,
    pub participant_identity: String,
    pub participant_name: Option<String>,
    pub krisp_enabled: bool,
}

/// The SIP participant created for an outbound leg.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SipParticipant {
    pub participant_id: String,
    pub participant_identity: String,
    pub room_name: String,
    pub sip_call_id: String,
}

/// Operations the agent needs from the hosted voice platform.
///
/// Wire behavior belongs to the platform; implementations only translate
/// these calls and map failures into [`VoiceError`].
#[async_trait]
pub trait PlatformApi: Send + Sync + std::fmt::Debug {
    /// Replaces attributes on a participant in `room`.
    async fn set_participant_attributes(
        &self,
        room: &str,
        identity: &str,
        attributes: HashMap<String, String>,
    ) -> Result<(), VoiceError>;

    /// Deletes `room`, disconnecting every participant.
    async fn delete_room(&self, room: &str) -> Result<(), VoiceError>;

    /// Assigns an agent to a room. The room is created on demand.
    async fn create_dispatch(&self, request: DispatchRequest) -> Result<AgentDispatch, VoiceError>;

    /// Places an outbound SIP call into a room.
    async fn create_sip_participant(
        &self,
        request: SipCallRequest,
    ) -> Result<SipParticipant, VoiceError>;
}
