use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator number used when `HUMAN_AGENT_PHONE` is not configured.
pub const MASKED_OPERATOR_PHONE: &str = "+821000000000";

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct LiveKitConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing)]
    pub api_secret: String,
}

impl fmt::Debug for LiveKitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveKitConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

impl LiveKitConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.url.is_empty()
    }

    /// Returns the server URL with a websocket scheme mapped to HTTP, for
    /// Twirp requests.
    pub fn http_url(&self) -> String {
        let url = self.url.trim_end_matches('/');
        if let Some(rest) = url.strip_prefix("wss://") {
            format!("https://{rest}")
        } else if let Some(rest) = url.strip_prefix("ws://") {
            format!("http://{rest}")
        } else {
            url.to_string()
        }
    }
}

/// SIP settings for outbound legs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelephonyConfig {
    /// LiveKit outbound SIP trunk id. Escalation and dialing are unavailable
    /// without it.
    #[serde(default)]
    pub outbound_trunk_id: Option<String>,

    /// Number of the human operator calls are escalated to.
    #[serde(default)]
    pub human_agent_phone: Option<String>,
}

impl TelephonyConfig {
    /// The configured trunk id, treating an empty string as unset.
    pub fn trunk_id(&self) -> Option<&str> {
        self.outbound_trunk_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }

    /// The operator number, or [`MASKED_OPERATOR_PHONE`] when unset.
    pub fn operator_phone(&self) -> &str {
        self.human_agent_phone
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(MASKED_OPERATOR_PHONE)
    }
}
