use async_trait::async_trait;
use carecall_types::{PersonaKind, Transition};

use super::{say, AgentState, Persona};
use crate::error::AgentError;
use crate::session::SessionServices;
use crate::tools::{lookup, ToolCall, ToolOutcome, ToolParam, ToolSpec};

/// Spellings accepted for the single known caller.
///
/// Placeholder policy. A production check needs an authoritative identity
/// store, fuzzy or phonetic matching for speech-recognition errors, and a
/// bounded retry before hanging up.
const ACCEPTED_NAMES: [&str; 3] = ["Ben", "Ben Kim", "ben"];

const CONFIRMED: &str = "Confirmed. We'd like to ask you about your health.";
const REJECTED: &str = "End the call because you failed to verify your identity.";

const VERIFY_IDENTITY: &str = "verify_identity";

static TOOLS: [ToolSpec; 1] = [ToolSpec {
    name: VERIFY_IDENTITY,
    description: "Verify the caller's identity from the name they say.",
    parameters: &[ToolParam {
        name: "name",
        description: "The caller's name exactly as spoken.",
    }],
}];

/// Returns true when `name` is an accepted spelling. Matching is exact.
pub fn is_verified_name(name: &str) -> bool {
    ACCEPTED_NAMES.contains(&name)
}

/// First persona of every call: confirms who is on the line.
#[derive(Debug, Clone)]
pub struct IntakeAgent {
    state: AgentState,
}

impl IntakeAgent {
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            state: AgentState::new(PersonaKind::Intake, instructions),
        }
    }

    async fn verify_identity(
        &mut self,
        name: &str,
        services: &mut SessionServices,
    ) -> Result<ToolOutcome, AgentError> {
        if is_verified_name(name) {
            tracing::info!("caller identity verified");
            say(&mut self.state, services, CONFIRMED).await?;
            return Ok(ToolOutcome::Handoff(Transition::IdentityVerified));
        }

        tracing::info!(name, "caller identity rejected");
        if let Err(e) = say(&mut self.state, services, REJECTED).await {
            tracing::warn!(error = %e, "failed to speak rejection");
        }
        services.hangup();
        Ok(ToolOutcome::CallEnded)
    }
}

#[async_trait]
impl Persona for IntakeAgent {
    fn state(&self) -> &AgentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AgentState {
        &mut self.state
    }

    fn tools(&self) -> &'static [ToolSpec] {
        &TOOLS
    }

    async fn call_tool(
        &mut self,
        call: &ToolCall,
        services: &mut SessionServices,
    ) -> Result<ToolOutcome, AgentError> {
        let spec = lookup(&TOOLS, PersonaKind::Intake, &call.name)?;
        match spec.name {
            VERIFY_IDENTITY => {
                let name = call.str_arg("name")?;
                self.verify_identity(name, services).await
            }
            other => Err(AgentError::UnknownTool {
                persona: PersonaKind::Intake,
                tool: other.to_string(),
            }),
        }
    }
}
