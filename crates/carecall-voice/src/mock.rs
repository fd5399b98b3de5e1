use crate::error::VoiceError;
use crate::platform::{AgentDispatch, DispatchRequest, PlatformApi, SipCallRequest, SipParticipant};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// A platform operation recorded by [`MockPlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    SetAttributes {
        room: String,
        identity: String,
        attributes: HashMap<String, String>,
    },
    DeleteRoom {
        room: String,
    },
    CreateDispatch(DispatchRequest),
    CreateSipParticipant(SipCallRequest),
}

/// An in-memory platform for tests and offline runs.
///
/// Every call is recorded in order and succeeds unless a failure was
/// requested with [`MockPlatform::fail_sip`].
#[derive(Debug, Default)]
pub struct MockPlatform {
    calls: Mutex<Vec<PlatformCall>>,
    fail_sip: AtomicBool,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent SIP participant creation fail.
    pub fn fail_sip(&self) {
        self.fail_sip.store(true, Ordering::SeqCst);
    }

    /// Returns a snapshot of recorded calls.
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn deleted_rooms(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::DeleteRoom { room } => Some(room),
                _ => None,
            })
            .collect()
    }

    pub fn sip_requests(&self) -> Vec<SipCallRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::CreateSipParticipant(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: PlatformCall) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }
}

#[async_trait]
impl PlatformApi for MockPlatform {
    async fn set_participant_attributes(
        &self,
        room: &str,
        identity: &str,
        attributes: HashMap<String, String>,
    ) -> Result<(), VoiceError> {
        self.record(PlatformCall::SetAttributes {
            room: room.to_string(),
            identity: identity.to_string(),
            attributes,
        });
        Ok(())
    }

    async fn delete_room(&self, room: &str) -> Result<(), VoiceError> {
        self.record(PlatformCall::DeleteRoom {
            room: room.to_string(),
        });
        Ok(())
    }

    async fn create_dispatch(&self, request: DispatchRequest) -> Result<AgentDispatch, VoiceError> {
        let dispatch = AgentDispatch {
            id: format!("AD_{}", request.room),
            agent_name: request.agent_name.clone(),
            room: request.room.clone(),
            metadata: request.metadata.clone(),
        };
        self.record(PlatformCall::CreateDispatch(request));
        Ok(dispatch)
    }

    async fn create_sip_participant(
        &self,
        request: SipCallRequest,
    ) -> Result<SipParticipant, VoiceError> {
        self.record(PlatformCall::CreateSipParticipant(request.clone()));
        if self.fail_sip.load(Ordering::SeqCst) {
            return Err(VoiceError::Sip("trunk rejected the call".to_string()));
        }
        Ok(SipParticipant {
            participant_id: format!("PA_{}", request.participant_identity),
            participant_identity: request.participant_identity,
            room_name: request.room_name,
            sip_call_id: "SCL_mock".to_string(),
        })
    }
}
