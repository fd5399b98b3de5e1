use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("LiveKit access token error: {0}")]
    AccessToken(#[from] livekit_api::access_token::AccessTokenError),

    #[error("Room service error: {0}")]
    RoomService(String),

    #[error("SIP service error: {0}")]
    Sip(String),

    #[error("Agent dispatch error: {0}")]
    Dispatch(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),
}
