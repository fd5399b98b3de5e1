//! Outbound dialer: dispatches the care agent to a fresh room and dials the
//! callee into it over the outbound SIP trunk.

use carecall_voice::{
    validate_e164, AgentDispatch, DispatchRequest, LiveKitConfig, PlatformApi, SipCallRequest,
    SipParticipant, VoiceError,
};
use thiserror::Error;

/// Agent the dispatch assigns to the call room.
pub const AGENT_NAME: &str = "senior-care-agent";

/// Prefix of rooms created for dialed calls.
pub const ROOM_PREFIX: &str = "cli-call-";

/// Participant identity of the dialed callee.
pub const CALLEE_IDENTITY: &str = "phone_user";

#[derive(Debug, Error)]
pub enum DialError {
    #[error("SIP_OUTBOUND_TRUNK_ID is not set")]
    MissingTrunk,

    #[error("LIVEKIT_URL is not set")]
    MissingLiveKit,

    #[error(transparent)]
    Voice(#[from] VoiceError),
}

/// Settings the dialer reads from the environment.
#[derive(Debug, Clone, Default)]
pub struct DialerConfig {
    pub livekit: LiveKitConfig,
    pub outbound_trunk_id: Option<String>,
}

impl DialerConfig {
    /// Reads `LIVEKIT_URL`, `LIVEKIT_API_KEY`, `LIVEKIT_API_SECRET` and
    /// `SIP_OUTBOUND_TRUNK_ID` through `var`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            livekit: LiveKitConfig::new(
                var("LIVEKIT_URL").unwrap_or_default(),
                var("LIVEKIT_API_KEY").unwrap_or_default(),
                var("LIVEKIT_API_SECRET").unwrap_or_default(),
            ),
            outbound_trunk_id: var("SIP_OUTBOUND_TRUNK_ID").filter(|id| !id.trim().is_empty()),
        }
    }

    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }
}

/// A trunk id and validated number, ready to dial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialTarget {
    pub trunk_id: String,
    pub number: String,
}

/// Checks everything `make-call` needs before touching the platform: the
/// trunk id, then the number, then the LiveKit URL.
///
/// # Errors
///
/// Returns the first failing check as a `DialError`.
pub fn preflight(config: &DialerConfig, raw_number: &str) -> Result<DialTarget, DialError> {
    let trunk_id = config
        .outbound_trunk_id
        .clone()
        .ok_or(DialError::MissingTrunk)?;
    let number = validate_e164(raw_number)?;
    if !config.livekit.is_enabled() {
        return Err(DialError::MissingLiveKit);
    }
    Ok(DialTarget { trunk_id, number })
}

/// What a successful dial created.
#[derive(Debug, Clone)]
pub struct PlacedCall {
    pub room: String,
    pub dispatch: AgentDispatch,
    pub participant: SipParticipant,
}

/// Room name for a call to `number`.
pub fn room_for(number: &str) -> String {
    format!("{ROOM_PREFIX}{number}")
}

/// Dispatches [`AGENT_NAME`] to the room for `raw_number` and dials the
/// number into it.
///
/// The trunk and the number are checked before anything is created.
///
/// # Errors
///
/// Returns `DialError::MissingTrunk` without a trunk id, `DialError::Voice`
/// for a malformed number or a failed platform call.
pub async fn make_call(
    platform: &dyn PlatformApi,
    trunk_id: Option<&str>,
    raw_number: &str,
) -> Result<PlacedCall, DialError> {
    let trunk_id = trunk_id.ok_or(DialError::MissingTrunk)?;
    let number = validate_e164(raw_number)?;

    let room = room_for(&number);
    let metadata = serde_json::json!({ "phone_number": number }).to_string();

    tracing::info!(agent = AGENT_NAME, room = %room, "creating agent dispatch");
    let dispatch = platform
        .create_dispatch(DispatchRequest {
            agent_name: AGENT_NAME.to_string(),
            room: room.clone(),
            metadata,
        })
        .await?;
    tracing::info!(dispatch_id = %dispatch.id, "created dispatch");

    tracing::info!(number = %number, "dialing");
    let participant = platform
        .create_sip_participant(SipCallRequest {
            trunk_id: trunk_id.to_string(),
            call_to: number,
            room_name: room.clone(),
            participant_identity: CALLEE_IDENTITY.to_string(),
            participant_name: None,
            krisp_enabled: false,
        })
        .await?;
    tracing::info!(
        participant_id = %participant.participant_id,
        sip_call_id = %participant.sip_call_id,
        "created SIP participant"
    );

    Ok(PlacedCall {
        room,
        dispatch,
        participant,
    })
}
