//! Worker configuration loading from file and environment variables.

use std::path::PathBuf;
use std::time::Duration;

use carecall_voice::{LiveKitConfig, TelephonyConfig, DEFAULT_TEARDOWN_GRACE};
use serde::Deserialize;
use thiserror::Error;

/// Top-level worker configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// LiveKit server credentials.
    #[serde(default)]
    pub livekit: LiveKitConfig,

    /// Outbound SIP trunk and operator number.
    #[serde(default)]
    pub telephony: TelephonyConfig,

    /// Data and prompt directories.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Agent identity within a call.
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Where persisted files and persona prompts live.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root of `history/` and `requests/`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory holding `intake_prompt.toml` and `check_in_prompt.toml`.
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "carecall_agent=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// How the agent presents itself in a call room.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Participant identity of the agent inside the room.
    #[serde(default = "default_agent_identity")]
    pub identity: String,

    /// Milliseconds between a hangup request and room deletion.
    #[serde(default = "default_teardown_grace_ms")]
    pub teardown_grace_ms: u64,
}

impl AgentConfig {
    pub fn teardown_grace(&self) -> Duration {
        Duration::from_millis(self.teardown_grace_ms)
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_prompts_dir() -> PathBuf {
    PathBuf::from("prompts")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_agent_identity() -> String {
    "carecall-agent".to_string()
}

fn default_teardown_grace_ms() -> u64 {
    DEFAULT_TEARDOWN_GRACE.as_millis() as u64
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            prompts_dir: default_prompts_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            identity: default_agent_identity(),
            teardown_grace_ms: default_teardown_grace_ms(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting required by the selected mode is missing.
    #[error("missing setting: {0}")]
    Missing(&'static str),
}

/// Loads configuration from a TOML file, falling back to defaults, then
/// applies overrides from the process environment.
///
/// Environment variable overrides:
/// - `LIVEKIT_URL`, `LIVEKIT_API_KEY`, `LIVEKIT_API_SECRET` override `livekit.*`
/// - `SIP_OUTBOUND_TRUNK_ID` overrides `telephony.outbound_trunk_id`
/// - `HUMAN_AGENT_PHONE` overrides `telephony.human_agent_phone`
/// - `CARECALL_DATA_DIR` overrides `storage.data_dir`
/// - `CARECALL_PROMPTS_DIR` overrides `storage.prompts_dir`
/// - `CARECALL_LOG_LEVEL` overrides `logging.level`
/// - `CARECALL_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `CARECALL_TEARDOWN_GRACE_MS` overrides `agent.teardown_grace_ms`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Applies environment overrides read through `var`.
pub fn apply_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(url) = var("LIVEKIT_URL") {
        config.livekit.url = url;
    }
    if let Some(key) = var("LIVEKIT_API_KEY") {
        config.livekit.api_key = key;
    }
    if let Some(secret) = var("LIVEKIT_API_SECRET") {
        config.livekit.api_secret = secret;
    }
    if let Some(trunk) = var("SIP_OUTBOUND_TRUNK_ID") {
        config.telephony.outbound_trunk_id = Some(trunk);
    }
    if let Some(phone) = var("HUMAN_AGENT_PHONE") {
        config.telephony.human_agent_phone = Some(phone);
    }
    if let Some(dir) = var("CARECALL_DATA_DIR") {
        config.storage.data_dir = PathBuf::from(dir);
    }
    if let Some(dir) = var("CARECALL_PROMPTS_DIR") {
        config.storage.prompts_dir = PathBuf::from(dir);
    }
    if let Some(level) = var("CARECALL_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = var("CARECALL_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(grace) = var("CARECALL_TEARDOWN_GRACE_MS") {
        match grace.parse() {
            Ok(ms) => config.agent.teardown_grace_ms = ms,
            Err(_) => tracing::warn!(value = %grace, "ignoring invalid CARECALL_TEARDOWN_GRACE_MS"),
        }
    }
}
