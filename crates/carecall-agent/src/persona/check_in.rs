use async_trait::async_trait;
use carecall_types::{ChatItem, ChatRole, HistoryRecord, PersonaKind};

use super::{enter, generate_reply, say, AgentState, Persona};
use crate::error::AgentError;
use crate::session::SessionServices;
use crate::tools::{lookup, ToolCall, ToolOutcome, ToolParam, ToolSpec};

const REGISTER_REQUEST: &str = "register_request";
const TRANSFER_CALL_TO_HUMAN: &str = "transfer_call_to_human";
const END_CALL: &str = "end_call";

const TRANSFER_UNAVAILABLE: &str = "I can't transfer the call right now.";
const TRANSFERRING: &str = "Transferring you to a human agent now. Please hold.";
const TRANSFER_FAILED: &str = "Sorry, something went wrong transferring the call.";
const GOODBYE: &str = "End the call. Have a good day.";

const HUMAN_AGENT_NAME: &str = "Human Agent";

static TOOLS: [ToolSpec; 3] = [
    ToolSpec {
        name: REGISTER_REQUEST,
        description: "Use it to log a customer's complaint or request, which will be \
                      forwarded to a human agent for further action.",
        parameters: &[ToolParam {
            name: "detail",
            description: "The complaint or request in the caller's words.",
        }],
    },
    ToolSpec {
        name: TRANSFER_CALL_TO_HUMAN,
        description: "Transfer the call to a human agent, called after confirming with \
                      the user. Please call this when emergency happens.",
        parameters: &[],
    },
    ToolSpec {
        name: END_CALL,
        description: "Called when the user wants to end the call",
        parameters: &[],
    },
];

/// Health-check persona. Logs requests, escalates to a human operator, and
/// closes the call with a history summary.
#[derive(Debug, Clone)]
pub struct CheckInAgent {
    state: AgentState,
}

impl CheckInAgent {
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            state: AgentState::new(PersonaKind::CheckIn, instructions),
        }
    }

    fn register_request(&mut self, detail: &str, services: &SessionServices) -> ToolOutcome {
        if let Err(e) = services.stores.requests.append(detail) {
            tracing::error!(error = %e, "failed to write request log");
        }
        ToolOutcome::Reply(format!(
            "We've received your request for ‘{detail}’ and will forward it to the appropriate person."
        ))
    }

    async fn transfer_call_to_human(
        &mut self,
        services: &mut SessionServices,
    ) -> Result<ToolOutcome, AgentError> {
        let phone = services.telephony.operator_phone().to_string();
        let trunk_id = services.telephony.trunk_id().map(str::to_string);

        let (Some(call), Some(trunk_id)) = (services.call().cloned(), trunk_id) else {
            tracing::warn!(
                has_call = services.call().is_some(),
                "transfer requested without a call or outbound trunk"
            );
            say(&mut self.state, services, TRANSFER_UNAVAILABLE).await?;
            return Ok(ToolOutcome::Silent);
        };

        tracing::info!(phone = %phone, room = call.room_name(), "transferring call to human agent");
        say(&mut self.state, services, TRANSFERRING).await?;

        let hex = uuid::Uuid::new_v4().simple().to_string();
        let identity = format!("transfer_{}", &hex[..8]);

        match call
            .dial_into_room(&trunk_id, &phone, &identity, HUMAN_AGENT_NAME)
            .await
        {
            Ok(participant) => {
                tracing::info!(
                    participant = %participant.participant_identity,
                    sip_call_id = %participant.sip_call_id,
                    "human agent leg created"
                );
                services.speech.set_audio_enabled(false);
                Ok(ToolOutcome::Reply(format!(
                    "I've transferred you to a human agent at {phone}. Please hold while we connect you."
                )))
            }
            Err(e) => {
                tracing::error!(error = %e, "error transferring call");
                say(&mut self.state, services, TRANSFER_FAILED).await?;
                Ok(ToolOutcome::Silent)
            }
        }
    }

    async fn end_call(&mut self, services: &mut SessionServices) -> Result<ToolOutcome, AgentError> {
        services.speech.wait_for_playout().await;

        let record = HistoryRecord::from_items(self.state.chat_ctx.items());
        if let Err(e) = services.stores.history.save(&record) {
            tracing::error!(error = %e, "error saving history");
        }

        if let Err(e) = say(&mut self.state, services, GOODBYE).await {
            tracing::warn!(error = %e, "failed to speak goodbye");
        }
        services.hangup();
        Ok(ToolOutcome::CallEnded)
    }
}

#[async_trait]
impl Persona for CheckInAgent {
    fn state(&self) -> &AgentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AgentState {
        &mut self.state
    }

    fn tools(&self) -> &'static [ToolSpec] {
        &TOOLS
    }

    /// Adds the previous call's history as a system message before the
    /// first reply.
    async fn on_enter(
        &mut self,
        previous: Option<&[ChatItem]>,
        services: &mut SessionServices,
    ) -> Result<(), AgentError> {
        enter(&mut self.state, previous, services).await;

        let history = services.stores.history.load_previous();
        self.state.chat_ctx.add_message(
            ChatRole::System,
            format!("Partial history of recent conversations:\n{}", history.render()),
        );

        generate_reply(&mut self.state, &TOOLS, services).await
    }

    async fn call_tool(
        &mut self,
        call: &ToolCall,
        services: &mut SessionServices,
    ) -> Result<ToolOutcome, AgentError> {
        let spec = lookup(&TOOLS, PersonaKind::CheckIn, &call.name)?;
        match spec.name {
            REGISTER_REQUEST => {
                let detail = call.str_arg("detail")?;
                Ok(self.register_request(detail, services))
            }
            TRANSFER_CALL_TO_HUMAN => self.transfer_call_to_human(services).await,
            END_CALL => self.end_call(services).await,
            other => Err(AgentError::UnknownTool {
                persona: PersonaKind::CheckIn,
                tool: other.to_string(),
            }),
        }
    }
}
