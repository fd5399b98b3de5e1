//! Conversation items and the per-persona chat context.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Speaker role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions injected by the runtime.
    System,
    /// The caller.
    User,
    /// The agent.
    Assistant,
}

impl ChatRole {
    /// Returns the wire label for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single entry in a conversation context.
///
/// Every item carries a stable `id`. Ids survive copying between personas,
/// which is what lets a handoff detect items it has already carried over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatItem {
    /// A text message from the system, the caller, or the agent.
    Message {
        id: String,
        role: ChatRole,
        content: String,
    },
    /// A capability invocation requested by the model.
    FunctionCall {
        id: String,
        call_id: String,
        name: String,
        arguments: String,
    },
    /// The result returned to the model for a prior function call.
    FunctionCallOutput {
        id: String,
        call_id: String,
        output: String,
        is_error: bool,
    },
}

/// Generates a fresh item identifier (`item_` followed by 12 hex digits).
pub(crate) fn new_item_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("item_{}", &hex[..12])
}

impl ChatItem {
    /// Builds a message item with a freshly generated id.
    pub fn message(role: ChatRole, content: impl Into<String>) -> Self {
        Self::Message {
            id: new_item_id(),
            role,
            content: content.into(),
        }
    }

    /// Builds a function-call item with a freshly generated id.
    pub fn function_call(
        call_id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self::FunctionCall {
            id: new_item_id(),
            call_id: call_id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Builds a function-call-output item with a freshly generated id.
    pub fn function_call_output(
        call_id: impl Into<String>,
        output: impl Into<String>,
        is_error: bool,
    ) -> Self {
        Self::FunctionCallOutput {
            id: new_item_id(),
            call_id: call_id.into(),
            output: output.into(),
            is_error,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Message { id, .. }
            | Self::FunctionCall { id, .. }
            | Self::FunctionCallOutput { id, .. } => id,
        }
    }

    /// True for both function calls and their outputs.
    pub fn is_function_call(&self) -> bool {
        matches!(
            self,
            Self::FunctionCall { .. } | Self::FunctionCallOutput { .. }
        )
    }

    /// Returns the role for message items, `None` otherwise.
    pub fn role(&self) -> Option<ChatRole> {
        match self {
            Self::Message { role, .. } => Some(*role),
            _ => None,
        }
    }

    /// Returns the text for message items, `None` otherwise.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Message { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn is_system_message(&self) -> bool {
        self.role() == Some(ChatRole::System)
    }
}

/// Ordered conversation items owned by one persona.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatContext {
    items: Vec<ChatItem>,
}

impl ChatContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ChatItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: ChatItem) {
        self.items.push(item);
    }

    /// Appends a message with a fresh id and returns a reference to it.
    pub fn add_message(&mut self, role: ChatRole, content: impl Into<String>) -> &ChatItem {
        self.items.push(ChatItem::message(role, content));
        // Just pushed, so the vector is non-empty.
        &self.items[self.items.len() - 1]
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    /// Appends every item whose id is not already present, preserving order.
    ///
    /// Returns the number of items actually appended.
    pub fn extend_dedup<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = ChatItem>,
    {
        let mut seen: HashSet<String> = self.items.iter().map(|i| i.id().to_string()).collect();
        let before = self.items.len();
        for item in items {
            if seen.insert(item.id().to_string()) {
                self.items.push(item);
            }
        }
        self.items.len() - before
    }
}

impl From<Vec<ChatItem>> for ChatContext {
    fn from(items: Vec<ChatItem>) -> Self {
        Self { items }
    }
}
