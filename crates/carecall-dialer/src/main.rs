//! `make-call`: place an outbound welfare-check call.
//!
//! ```text
//! make-call +821012345678
//! ```

use std::process::ExitCode;

use carecall_dialer::{make_call, preflight, DialError, DialerConfig};
use carecall_voice::LiveKitPlatform;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "make-call", version, about = "Make a phone call using LiveKit SIP")]
struct Cli {
    /// Phone number in E.164 format (e.g., +821012345678).
    phone_number: String,
}

async fn run(cli: Cli) -> Result<(), DialError> {
    let config = DialerConfig::from_env();
    let target = preflight(&config, &cli.phone_number)?;

    let platform = LiveKitPlatform::new(config.livekit);
    let placed = make_call(&platform, Some(&target.trunk_id), &target.number).await?;
    tracing::info!(room = %placed.room, "call placed");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("failed to load .env: {e}");
        }
    }

    let filter = EnvFilter::try_from_env("CARECALL_LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "make-call failed");
            ExitCode::FAILURE
        }
    }
}
