//! CareCall worker binary.
//!
//! Loads configuration and `.env`, initialises structured logging, and runs
//! one welfare-check call driven from the terminal.

use std::process::ExitCode;
use std::sync::Arc;

use carecall_agent::SpeechSession;
use carecall_worker::config::{self, Config};
use carecall_worker::console::{self, ConsoleSpeech};
use carecall_worker::WorkerError;
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "carecall-worker", version, about = "Welfare-check call agent")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a call offline in the terminal.
    Console,
    /// Run a call bound to an existing LiveKit room.
    Room {
        /// Room name, e.g. `cli-call-+821012345678`.
        name: String,
    },
    /// Print the request log.
    Requests,
}

fn resolve_config_path(cli: Option<String>) -> (String, &'static str) {
    if let Some(path) = cli.filter(|value| !value.trim().is_empty()) {
        return (path, "cli-arg");
    }

    if let Ok(path) = std::env::var("CARECALL_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (path, "env-var");
        }
    }

    ("carecall.toml".to_string(), "default")
}

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn run(config: &Config, command: Command) -> Result<(), WorkerError> {
    match command {
        Command::Requests => {
            let count = carecall_worker::list_requests(config, &mut std::io::stdout())?;
            tracing::info!(count, "listed request log");
        }
        Command::Console => {
            let speech: Arc<dyn SpeechSession> = Arc::new(ConsoleSpeech::stdout());
            let mut session = carecall_worker::open_session(config, speech, None);
            console::drive(&mut session, BufReader::new(tokio::io::stdin())).await?;
        }
        Command::Room { name } => {
            let call = carecall_worker::connect_room(config, &name)?;
            let speech: Arc<dyn SpeechSession> = Arc::new(ConsoleSpeech::stdout());
            let mut session = carecall_worker::open_session(config, speech, Some(call));
            console::drive(&mut session, BufReader::new(tokio::io::stdin())).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("failed to load .env: {e}");
        }
    }

    let cli = Cli::parse();
    let (config_path, config_source) = resolve_config_path(cli.config);

    let config = match config::load_config(Some(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration from {config_path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    tracing::info!(
        source = config_source,
        path = %config_path,
        "resolved startup configuration path"
    );

    let command = cli.command.unwrap_or(Command::Console);
    match run(&config, command).await {
        Ok(()) => {
            tracing::info!("carecall worker finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "carecall worker failed");
            ExitCode::FAILURE
        }
    }
}
