//! Terminal driver for a call session.
//!
//! Each input line is one event:
//!
//! | Line | Effect |
//! |------|--------|
//! | `some text` | caller turn |
//! | `/agent some text` | agent turn produced by the model |
//! | `/<tool>` | tool call with no arguments |
//! | `/<tool> {"key": "value"}` | tool call with JSON arguments |
//! | `/<tool> value` | tool call whose single parameter is `value` |
//! | `/quit` | leave without ending the call |
//!
//! Agent speech is written to the console output.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use carecall_agent::{AgentError, CallSession, SpeechSession, ToolCall, ToolSpec};
use carecall_types::ChatContext;
use serde_json::{Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::WorkerError;

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Blank,
    Quit,
    Utterance(String),
    AgentTurn(String),
    Tool { name: String, args: String },
}

/// Classifies a console line.
pub fn parse_line(line: &str) -> ConsoleInput {
    let line = line.trim();
    if line.is_empty() {
        return ConsoleInput::Blank;
    }
    let Some(command) = line.strip_prefix('/') else {
        return ConsoleInput::Utterance(line.to_string());
    };
    let (name, args) = match command.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (command, ""),
    };
    match name {
        "quit" => ConsoleInput::Quit,
        "agent" => ConsoleInput::AgentTurn(args.to_string()),
        _ => ConsoleInput::Tool {
            name: name.to_string(),
            args: args.to_string(),
        },
    }
}

/// Builds a tool call from console arguments, using `tools` to name a
/// single bare argument.
pub fn tool_call(name: &str, args: &str, tools: &[ToolSpec]) -> Result<ToolCall, WorkerError> {
    let bad = |reason: String| WorkerError::ConsoleInput {
        tool: name.to_string(),
        reason,
    };

    if args.is_empty() {
        return Ok(ToolCall::new(name, Value::Object(Map::new())));
    }
    if args.starts_with('{') {
        let value: Value = serde_json::from_str(args).map_err(|e| bad(e.to_string()))?;
        if !value.is_object() {
            return Err(bad("arguments must be a JSON object".to_string()));
        }
        return Ok(ToolCall::new(name, value));
    }

    let spec = tools
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| bad("not available to the active agent".to_string()))?;
    match spec.parameters {
        [param] => {
            let mut map = Map::new();
            map.insert(param.name.to_string(), Value::String(args.to_string()));
            Ok(ToolCall::new(name, Value::Object(map)))
        }
        params => Err(bad(format!(
            "expected a JSON object for {} parameters",
            params.len()
        ))),
    }
}

/// Reads events from `input` until the call ends, `/quit` is entered or the
/// input is exhausted. A pending room teardown is awaited before returning.
///
/// Tool failures and malformed lines are logged and skipped.
///
/// # Errors
///
/// Returns `WorkerError` if reading input fails or the speech pipeline
/// rejects a caller turn.
pub async fn drive<R>(session: &mut CallSession, input: R) -> Result<(), WorkerError>
where
    R: AsyncBufRead + Unpin,
{
    session.start().await?;

    let mut lines = input.lines();
    while !session.is_ended() {
        let Some(line) = lines.next_line().await? else {
            tracing::info!("console input closed");
            break;
        };
        match parse_line(&line) {
            ConsoleInput::Blank => {}
            ConsoleInput::Quit => break,
            ConsoleInput::Utterance(text) => session.user_said(&text).await?,
            ConsoleInput::AgentTurn(text) => session.agent_said(&text),
            ConsoleInput::Tool { name, args } => {
                let tools = session.persona(session.active()).tools();
                let call = match tool_call(&name, &args, tools) {
                    Ok(call) => call,
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring console line");
                        continue;
                    }
                };
                match session.invoke(call).await {
                    Ok(outcome) => tracing::debug!(?outcome, tool = %name, "tool finished"),
                    Err(e) => tracing::warn!(error = %e, tool = %name, "tool call failed"),
                }
            }
        }
    }

    if let Some(teardown) = session.services_mut().take_teardown() {
        teardown.wait().await;
    }
    Ok(())
}

/// Speech session that prints agent speech to a writer.
pub struct ConsoleSpeech {
    out: Mutex<Box<dyn Write + Send>>,
    audio_enabled: AtomicBool,
}

impl ConsoleSpeech {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            audio_enabled: AtomicBool::new(true),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    fn write_line(&self, line: &str) -> Result<(), AgentError> {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(out, "{line}").map_err(|e| AgentError::Speech(e.to_string()))
    }
}

#[async_trait]
impl SpeechSession for ConsoleSpeech {
    async fn say(&self, text: &str) -> Result<(), AgentError> {
        if self.audio_enabled() {
            self.write_line(&format!("agent: {text}"))
        } else {
            self.write_line(&format!("agent (muted): {text}"))
        }
    }

    async fn generate_reply(
        &self,
        chat_ctx: &ChatContext,
        _instructions: &str,
        tools: &[ToolSpec],
    ) -> Result<Option<String>, AgentError> {
        let names: Vec<&str> = tools.iter().map(|t| t.name).collect();
        tracing::debug!(items = chat_ctx.len(), "model turn requested");
        self.write_line(&format!("[model turn; tools: {}]", names.join(", ")))?;
        Ok(None)
    }

    async fn wait_for_playout(&self) {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = out.flush() {
            tracing::warn!(error = %e, "failed to flush console output");
        }
    }

    fn set_audio_enabled(&self, enabled: bool) {
        self.audio_enabled.store(enabled, Ordering::SeqCst);
    }

    fn audio_enabled(&self) -> bool {
        self.audio_enabled.load(Ordering::SeqCst)
    }
}
