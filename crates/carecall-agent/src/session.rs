//! The per-call session orchestrator.

use std::sync::Arc;

use carecall_store::{PromptLoader, Stores};
use carecall_types::{ChatContext, ChatItem, ChatRole, PersonaKind};
use carecall_voice::{CallHandle, TeardownHandle, TelephonyConfig};

use crate::error::AgentError;
use crate::persona::{generate_reply, CheckInAgent, IntakeAgent, Persona};
use crate::speech::SpeechSession;
use crate::tools::{ToolCall, ToolOutcome};

/// Collaborators handed to every persona callback.
pub struct SessionServices {
    pub speech: Arc<dyn SpeechSession>,
    pub stores: Stores,
    pub telephony: TelephonyConfig,
    call: Option<CallHandle>,
    teardown: Option<TeardownHandle>,
}

impl SessionServices {
    pub fn new(speech: Arc<dyn SpeechSession>, stores: Stores, telephony: TelephonyConfig) -> Self {
        Self {
            speech,
            stores,
            telephony,
            call: None,
            teardown: None,
        }
    }

    /// Binds the session to a live call.
    pub fn with_call(mut self, call: CallHandle) -> Self {
        self.call = Some(call);
        self
    }

    pub fn call(&self) -> Option<&CallHandle> {
        self.call.as_ref()
    }

    /// Schedules deletion of the call's room.
    ///
    /// Returns false without doing anything when there is no active call.
    /// A second request while one is pending keeps the first.
    pub fn hangup(&mut self) -> bool {
        let Some(call) = &self.call else {
            tracing::debug!("no active call, skipping teardown");
            return false;
        };
        if self.teardown.is_none() {
            self.teardown = Some(call.hangup());
        }
        true
    }

    pub fn teardown(&self) -> Option<&TeardownHandle> {
        self.teardown.as_ref()
    }

    pub fn take_teardown(&mut self) -> Option<TeardownHandle> {
        self.teardown.take()
    }
}

/// State of one call: both personas, which one is active, and which one
/// was active before it.
pub struct CallSession {
    intake: IntakeAgent,
    check_in: CheckInAgent,
    active: PersonaKind,
    previous: Option<PersonaKind>,
    services: SessionServices,
    started: bool,
    ended: bool,
}

impl CallSession {
    /// Creates a session with persona instructions read from `prompts`.
    pub fn new(services: SessionServices, prompts: &PromptLoader) -> Self {
        Self::with_personas(
            IntakeAgent::new(prompts.instructions_for(PersonaKind::Intake)),
            CheckInAgent::new(prompts.instructions_for(PersonaKind::CheckIn)),
            services,
        )
    }

    pub fn with_personas(
        intake: IntakeAgent,
        check_in: CheckInAgent,
        services: SessionServices,
    ) -> Self {
        Self {
            intake,
            check_in,
            active: PersonaKind::INITIAL,
            previous: None,
            services,
            started: false,
            ended: false,
        }
    }

    pub fn active(&self) -> PersonaKind {
        self.active
    }

    pub fn previous(&self) -> Option<PersonaKind> {
        self.previous
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn services(&self) -> &SessionServices {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut SessionServices {
        &mut self.services
    }

    pub fn persona(&self, kind: PersonaKind) -> &dyn Persona {
        match kind {
            PersonaKind::Intake => &self.intake,
            PersonaKind::CheckIn => &self.check_in,
        }
    }

    pub fn chat_ctx(&self, kind: PersonaKind) -> &ChatContext {
        &self.persona(kind).state().chat_ctx
    }

    /// Enters the initial persona. Calling it twice is a no-op.
    pub async fn start(&mut self) -> Result<(), AgentError> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        tracing::info!(persona = %self.active, "starting call session");
        let (persona, services) = self.active_parts();
        persona.on_enter(None, services).await
    }

    /// Records a finished caller turn and asks for the next agent turn.
    pub async fn user_said(&mut self, text: &str) -> Result<(), AgentError> {
        self.ensure_open()?;
        let (persona, services) = self.active_parts();
        persona
            .state_mut()
            .chat_ctx
            .add_message(ChatRole::User, text);
        let tools = persona.tools();
        generate_reply(persona.state_mut(), tools, services).await
    }

    /// Records an agent turn produced asynchronously by the pipeline.
    pub fn agent_said(&mut self, text: &str) {
        let (persona, _) = self.active_parts();
        persona
            .state_mut()
            .chat_ctx
            .add_message(ChatRole::Assistant, text);
    }

    /// Runs a capability of the active persona and applies its outcome.
    pub async fn invoke(&mut self, call: ToolCall) -> Result<ToolOutcome, AgentError> {
        self.ensure_open()?;
        let from = self.active;
        tracing::info!(persona = %from, tool = %call.name, "invoking tool");

        let (persona, services) = self.active_parts();
        persona.state_mut().chat_ctx.push(ChatItem::function_call(
            call.call_id.clone(),
            call.name.clone(),
            call.arguments.to_string(),
        ));

        let outcome = match persona.call_tool(&call, services).await {
            Ok(outcome) => outcome,
            Err(e) => {
                persona.state_mut().chat_ctx.push(ChatItem::function_call_output(
                    call.call_id.clone(),
                    e.to_string(),
                    true,
                ));
                return Err(e);
            }
        };
        persona.state_mut().chat_ctx.push(ChatItem::function_call_output(
            call.call_id.clone(),
            outcome.output_text(),
            false,
        ));

        match &outcome {
            ToolOutcome::Reply(_) => {
                if services.speech.audio_enabled() {
                    let tools = persona.tools();
                    generate_reply(persona.state_mut(), tools, services).await?;
                }
            }
            ToolOutcome::Handoff(transition) => {
                let to = from
                    .next(*transition)
                    .ok_or(AgentError::InvalidHandoff {
                        from,
                        transition: *transition,
                    })?;
                self.hand_off(to).await?;
            }
            ToolOutcome::Silent => {}
            ToolOutcome::CallEnded => {
                tracing::info!(persona = %from, "call ended");
                self.ended = true;
            }
        }

        Ok(outcome)
    }

    async fn hand_off(&mut self, to: PersonaKind) -> Result<(), AgentError> {
        let from = self.active;
        tracing::info!(from = %from, to = %to, "handing off call");
        self.previous = Some(from);
        self.active = to;

        let (next, previous, services): (&mut dyn Persona, &dyn Persona, &mut SessionServices) =
            match to {
                PersonaKind::Intake => (&mut self.intake, &self.check_in, &mut self.services),
                PersonaKind::CheckIn => (&mut self.check_in, &self.intake, &mut self.services),
            };
        next.on_enter(Some(previous.state().chat_ctx.items()), services)
            .await
    }

    fn active_parts(&mut self) -> (&mut dyn Persona, &mut SessionServices) {
        match self.active {
            PersonaKind::Intake => (&mut self.intake, &mut self.services),
            PersonaKind::CheckIn => (&mut self.check_in, &mut self.services),
        }
    }

    fn ensure_open(&self) -> Result<(), AgentError> {
        if self.ended {
            Err(AgentError::SessionEnded)
        } else {
            Ok(())
        }
    }
}
