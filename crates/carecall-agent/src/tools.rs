//! Capability descriptions and invocation results.

use carecall_types::{PersonaKind, Transition};
use serde_json::{json, Value};

use crate::error::AgentError;

/// A string parameter of a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolParam {
    pub name: &'static str,
    pub description: &'static str,
}

/// A capability a persona exposes to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: &'static [ToolParam],
}

impl ToolSpec {
    /// Function-calling schema for the model: every parameter is a required
    /// string.
    pub fn json_schema(&self) -> Value {
        let properties: serde_json::Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| {
                (
                    p.name.to_string(),
                    json!({ "type": "string", "description": p.description }),
                )
            })
            .collect();
        let required: Vec<&str> = self.parameters.iter().map(|p| p.name).collect();

        json!({
            "type": "function",
            "name": self.name,
            "description": self.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}

/// A capability invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub call_id: String,
    pub name: String,
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        Self {
            call_id: format!("call_{}", &hex[..12]),
            name: name.into(),
            arguments,
        }
    }

    /// Returns the string argument `key`.
    pub fn str_arg(&self, key: &str) -> Result<&str, AgentError> {
        self.arguments
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| AgentError::InvalidArguments {
                tool: self.name.clone(),
                reason: format!("missing string argument `{key}`"),
            })
    }
}

/// What a capability handler produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Text returned to the model as the function output.
    Reply(String),
    /// Control moves to the persona the transition table selects.
    Handoff(Transition),
    /// Nothing is returned to the model.
    Silent,
    /// The call is over and teardown has been requested.
    CallEnded,
}

impl ToolOutcome {
    /// The function output recorded in the chat context.
    pub fn output_text(&self) -> String {
        match self {
            Self::Reply(text) => text.clone(),
            Self::Handoff(transition) => format!("handoff: {transition:?}"),
            Self::Silent => String::new(),
            Self::CallEnded => "call ended".to_string(),
        }
    }
}

/// Finds `name` in a persona's capability table.
pub(crate) fn lookup<'a>(
    table: &'a [ToolSpec],
    persona: PersonaKind,
    name: &str,
) -> Result<&'a ToolSpec, AgentError> {
    table
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| AgentError::UnknownTool {
            persona,
            tool: name.to_string(),
        })
}
