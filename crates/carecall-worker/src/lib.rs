//! CareCall worker: wires configuration, stores and the LiveKit platform
//! into a call session and drives it from the console.

pub mod config;
pub mod console;
mod error;

pub use error::WorkerError;

use std::io::Write;
use std::sync::Arc;

use carecall_agent::{CallSession, SessionServices, SpeechSession};
use carecall_store::{DataLayout, PromptLoader, Stores};
use carecall_voice::{CallHandle, LiveKitPlatform, PlatformApi};

use crate::config::{Config, ConfigError};

/// Opens the stores configured in `config`.
pub fn stores(config: &Config) -> Stores {
    Stores::new(&DataLayout::new(&config.storage.data_dir))
}

/// Builds a session for one call. Without a `call` the session runs
/// offline: teardown is a no-op and transfers are refused.
pub fn open_session(
    config: &Config,
    speech: Arc<dyn SpeechSession>,
    call: Option<CallHandle>,
) -> CallSession {
    let mut services = SessionServices::new(speech, stores(config), config.telephony.clone());
    if let Some(call) = call {
        services = services.with_call(call);
    }
    CallSession::new(services, &PromptLoader::new(&config.storage.prompts_dir))
}

/// Binds to an existing LiveKit room using the configured credentials.
///
/// # Errors
///
/// Returns `ConfigError::Missing` when no LiveKit URL is configured.
pub fn connect_room(config: &Config, room: &str) -> Result<CallHandle, ConfigError> {
    if !config.livekit.is_enabled() {
        return Err(ConfigError::Missing("livekit.url"));
    }
    let platform: Arc<dyn PlatformApi> = Arc::new(LiveKitPlatform::new(config.livekit.clone()));
    tracing::info!(room, url = %config.livekit.url, "binding session to livekit room");
    Ok(CallHandle::new(platform, room, &config.agent.identity)
        .with_teardown_grace(config.agent.teardown_grace()))
}

/// Writes every logged request to `out`, one tab-separated row per line.
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns `WorkerError` if the log cannot be read or `out` fails.
pub fn list_requests(config: &Config, out: &mut impl Write) -> Result<usize, WorkerError> {
    let entries = stores(config).requests.entries()?;
    for entry in &entries {
        writeln!(out, "{}\t{}", entry.timestamp, entry.detail)?;
    }
    Ok(entries.len())
}
