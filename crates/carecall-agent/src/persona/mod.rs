//! Persona behavior shared by every agent.
//!
//! On entry each persona announces itself to the room, rebuilds its
//! context from its own history plus the previous persona's tail, and
//! declares its role in a fresh system message before the first reply.

mod check_in;
mod intake;

pub use check_in::CheckInAgent;
pub use intake::IntakeAgent;

use async_trait::async_trait;
use carecall_types::{ChatContext, ChatItem, ChatRole, PersonaKind};

use crate::carryover::carry_over;
use crate::error::AgentError;
use crate::session::SessionServices;
use crate::tools::{ToolCall, ToolOutcome, ToolSpec};

/// Summary of the session's user data, appended to every role message.
pub const USER_DATA_SUMMARY: &str = "User data: Senior welfare check system";

/// The mutable state every persona carries.
#[derive(Debug, Clone)]
pub struct AgentState {
    pub kind: PersonaKind,
    pub instructions: String,
    pub chat_ctx: ChatContext,
}

impl AgentState {
    pub fn new(kind: PersonaKind, instructions: impl Into<String>) -> Self {
        Self {
            kind,
            instructions: instructions.into(),
            chat_ctx: ChatContext::new(),
        }
    }
}

#[async_trait]
pub trait Persona: Send + Sync {
    fn state(&self) -> &AgentState;

    fn state_mut(&mut self) -> &mut AgentState;

    /// Capability table exposed to the model while this persona is active.
    fn tools(&self) -> &'static [ToolSpec];

    fn kind(&self) -> PersonaKind {
        self.state().kind
    }

    /// Runs when the persona becomes active. `previous` holds the items of
    /// the persona that was active before, if any.
    async fn on_enter(
        &mut self,
        previous: Option<&[ChatItem]>,
        services: &mut SessionServices,
    ) -> Result<(), AgentError> {
        let tools = self.tools();
        enter(self.state_mut(), previous, services).await;
        generate_reply(self.state_mut(), tools, services).await
    }

    /// Dispatches a capability invocation to its handler.
    async fn call_tool(
        &mut self,
        call: &ToolCall,
        services: &mut SessionServices,
    ) -> Result<ToolOutcome, AgentError>;
}

/// Entry steps common to every persona. Nothing here aborts entry: a failed
/// attribute update is logged and the persona proceeds.
pub(crate) async fn enter(
    state: &mut AgentState,
    previous: Option<&[ChatItem]>,
    services: &SessionServices,
) {
    let agent_name = state.kind.agent_name();
    tracing::info!(agent = agent_name, "entering persona");

    if let Some(call) = services.call() {
        if let Err(e) = call.announce_agent(agent_name).await {
            tracing::warn!(agent = agent_name, error = %e, "failed to set agent attribute");
        }
    }

    let mut chat_ctx = state.chat_ctx.clone();
    if let Some(items) = previous {
        let carried = carry_over(&mut chat_ctx, items);
        tracing::debug!(agent = agent_name, carried, "carried over previous context");
    }
    chat_ctx.add_message(
        ChatRole::System,
        format!("You are the {agent_name}. {USER_DATA_SUMMARY}"),
    );
    state.chat_ctx = chat_ctx;
}

/// Speaks `text` and records it as an assistant turn.
pub(crate) async fn say(
    state: &mut AgentState,
    services: &SessionServices,
    text: &str,
) -> Result<(), AgentError> {
    services.speech.say(text).await?;
    state.chat_ctx.add_message(ChatRole::Assistant, text);
    Ok(())
}

/// Asks the pipeline for the next turn and records any reply it returns.
pub(crate) async fn generate_reply(
    state: &mut AgentState,
    tools: &[ToolSpec],
    services: &SessionServices,
) -> Result<(), AgentError> {
    let reply = services
        .speech
        .generate_reply(&state.chat_ctx, &state.instructions, tools)
        .await?;
    if let Some(text) = reply {
        state.chat_ctx.add_message(ChatRole::Assistant, text);
    }
    Ok(())
}
