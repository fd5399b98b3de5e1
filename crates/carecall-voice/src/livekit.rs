use crate::config::LiveKitConfig;
use crate::error::VoiceError;
use crate::platform::{AgentDispatch, DispatchRequest, PlatformApi, SipCallRequest, SipParticipant};
use async_trait::async_trait;
use livekit_api::access_token::{AccessToken, VideoGrants};
use livekit_api::services::room::{RoomClient, UpdateParticipantOptions};
use livekit_api::services::sip::{CreateSIPParticipantOptions, SIPClient};
use std::collections::HashMap;
use std::time::Duration;

const DISPATCH_PATH: &str = "/twirp/livekit.AgentDispatchService/CreateDispatch";
const DISPATCH_TOKEN_TTL: Duration = Duration::from_secs(600);

/// [`PlatformApi`] backed by the LiveKit server API.
///
/// Room and SIP calls go through the `livekit-api` service clients. Agent
/// dispatch has no client there, so it is posted as JSON to the Twirp
/// endpoint with a room-admin token.
#[derive(Debug)]
pub struct LiveKitPlatform {
    config: LiveKitConfig,
    room_client: RoomClient,
    sip_client: SIPClient,
    http: reqwest::Client,
}

impl LiveKitPlatform {
    pub fn new(config: LiveKitConfig) -> Self {
        let room_client =
            RoomClient::with_api_key(&config.url, &config.api_key, &config.api_secret);
        let sip_client = SIPClient::with_api_key(&config.url, &config.api_key, &config.api_secret);
        Self {
            config,
            room_client,
            sip_client,
            http: reqwest::Client::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    fn dispatch_token(&self, room: &str) -> Result<String, VoiceError> {
        let token = AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_grants(VideoGrants {
                room_admin: true,
                room: room.to_string(),
                ..Default::default()
            })
            .with_ttl(DISPATCH_TOKEN_TTL);

        token.to_jwt().map_err(VoiceError::AccessToken)
    }
}

#[async_trait]
impl PlatformApi for LiveKitPlatform {
    async fn set_participant_attributes(
        &self,
        room: &str,
        identity: &str,
        attributes: HashMap<String, String>,
    ) -> Result<(), VoiceError> {
        let options = UpdateParticipantOptions {
            attributes,
            ..Default::default()
        };

        self.room_client
            .update_participant(room, identity, options)
            .await
            .map(|_| ())
            .map_err(|e| VoiceError::RoomService(e.to_string()))
    }

    async fn delete_room(&self, room: &str) -> Result<(), VoiceError> {
        self.room_client
            .delete_room(room)
            .await
            .map_err(|e| VoiceError::RoomService(e.to_string()))
    }

    async fn create_dispatch(&self, request: DispatchRequest) -> Result<AgentDispatch, VoiceError> {
        if !self.is_enabled() {
            return Err(VoiceError::Config("LiveKit URL is not configured".to_string()));
        }

        let token = self.dispatch_token(&request.room)?;
        let url = format!("{}{}", self.config.http_url(), DISPATCH_PATH);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| VoiceError::Dispatch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::Dispatch(format!("{status}: {body}")));
        }

        response
            .json::<AgentDispatch>()
            .await
            .map_err(|e| VoiceError::Dispatch(format!("invalid dispatch response: {e}")))
    }

    async fn create_sip_participant(
        &self,
        request: SipCallRequest,
    ) -> Result<SipParticipant, VoiceError> {
        let options = CreateSIPParticipantOptions {
            participant_identity: request.participant_identity,
            participant_name: request.participant_name,
            enable_krisp: Some(request.krisp_enabled),
            ..Default::default()
        };

        let info = self
            .sip_client
            .create_sip_participant(
                request.trunk_id,
                request.call_to,
                request.room_name,
                options,
                None,
            )
            .await
            .map_err(|e| VoiceError::Sip(e.to_string()))?;

        Ok(SipParticipant {
            participant_id: info.participant_id,
            participant_identity: info.participant_identity,
            room_name: info.room_name,
            sip_call_id: info.sip_call_id,
        })
    }
}
