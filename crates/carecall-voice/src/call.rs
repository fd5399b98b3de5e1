use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::VoiceError;
use crate::platform::{PlatformApi, SipCallRequest, SipParticipant};
use crate::teardown::{schedule_teardown, TeardownHandle, DEFAULT_TEARDOWN_GRACE};

/// Attribute key under which the active persona is announced.
pub const AGENT_ATTRIBUTE: &str = "agent";

/// The platform bound to one active call's room.
#[derive(Debug, Clone)]
pub struct CallHandle {
    platform: Arc<dyn PlatformApi>,
    room_name: String,
    local_identity: String,
    teardown_grace: Duration,
}

impl CallHandle {
    pub fn new(
        platform: Arc<dyn PlatformApi>,
        room_name: impl Into<String>,
        local_identity: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            room_name: room_name.into(),
            local_identity: local_identity.into(),
            teardown_grace: DEFAULT_TEARDOWN_GRACE,
        }
    }

    pub fn with_teardown_grace(mut self, grace: Duration) -> Self {
        self.teardown_grace = grace;
        self
    }

    pub fn room_name(&self) -> &str {
        &self.room_name
    }

    pub fn local_identity(&self) -> &str {
        &self.local_identity
    }

    pub fn teardown_grace(&self) -> Duration {
        self.teardown_grace
    }

    pub fn platform(&self) -> &Arc<dyn PlatformApi> {
        &self.platform
    }

    /// Sets the `agent` attribute on the agent's own participant.
    pub async fn announce_agent(&self, agent_name: &str) -> Result<(), VoiceError> {
        let attributes = HashMap::from([(AGENT_ATTRIBUTE.to_string(), agent_name.to_string())]);
        self.platform
            .set_participant_attributes(&self.room_name, &self.local_identity, attributes)
            .await
    }

    /// Dials `call_to` over `trunk_id` into this call's room.
    pub async fn dial_into_room(
        &self,
        trunk_id: &str,
        call_to: &str,
        participant_identity: &str,
        participant_name: &str,
    ) -> Result<SipParticipant, VoiceError> {
        self.platform
            .create_sip_participant(SipCallRequest {
                trunk_id: trunk_id.to_string(),
                call_to: call_to.to_string(),
                room_name: self.room_name.clone(),
                participant_identity: participant_identity.to_string(),
                participant_name: Some(participant_name.to_string()),
                krisp_enabled: true,
            })
            .await
    }

    /// Schedules deletion of the room after the teardown grace period.
    pub fn hangup(&self) -> TeardownHandle {
        schedule_teardown(
            Arc::clone(&self.platform),
            self.room_name.clone(),
            self.teardown_grace,
        )
    }
}
