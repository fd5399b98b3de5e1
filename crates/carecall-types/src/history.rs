//! Persisted call summaries and request-log rows.

use serde::{Deserialize, Serialize};

use crate::chat::{ChatItem, ChatRole};

/// Maximum number of messages kept in a [`HistoryRecord`].
pub const HISTORY_MESSAGE_LIMIT: usize = 10;

/// Note stored alongside every history record.
pub const HISTORY_NOTE: &str = "Messages of last conversations";

/// One message in a history record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Summary of the most recently completed call.
///
/// There is only ever one record on disk; each completed call overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub last_messages: Vec<HistoryMessage>,
    #[serde(default)]
    pub note: String,
}

impl HistoryRecord {
    /// Builds a record from the trailing user/assistant messages of `items`.
    ///
    /// System messages, function calls and empty messages are skipped. At
    /// most [`HISTORY_MESSAGE_LIMIT`] messages are kept, in original order.
    pub fn from_items(items: &[ChatItem]) -> Self {
        let messages: Vec<HistoryMessage> = items
            .iter()
            .filter_map(|item| match item {
                ChatItem::Message { role, content, .. }
                    if matches!(role, ChatRole::User | ChatRole::Assistant)
                        && !content.is_empty() =>
                {
                    Some(HistoryMessage {
                        role: *role,
                        content: content.clone(),
                    })
                }
                _ => None,
            })
            .collect();

        let skip = messages.len().saturating_sub(HISTORY_MESSAGE_LIMIT);
        Self {
            last_messages: messages.into_iter().skip(skip).collect(),
            note: HISTORY_NOTE.to_string(),
        }
    }
}

/// Result of looking up the previous call's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviousHistory {
    /// No history file exists yet.
    Missing,
    /// A history file exists but could not be read or parsed.
    Unreadable,
    /// The stored record.
    Record(HistoryRecord),
}

impl PreviousHistory {
    pub const MISSING_TEXT: &'static str = "There is no previous conversation data.";
    pub const UNREADABLE_TEXT: &'static str = "Failed to load previous conversation data.";

    /// Renders the history as text for injection into a prompt: the JSON
    /// record, or a sentinel sentence.
    pub fn render(&self) -> String {
        match self {
            Self::Missing => Self::MISSING_TEXT.to_string(),
            Self::Unreadable => Self::UNREADABLE_TEXT.to_string(),
            Self::Record(record) => serde_json::to_string(record)
                .unwrap_or_else(|_| Self::UNREADABLE_TEXT.to_string()),
        }
    }
}

/// One row of the request log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestLogEntry {
    pub timestamp: String,
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(n: usize) -> Vec<ChatItem> {
        (0..n)
            .map(|i| {
                let role = if i % 2 == 0 {
                    ChatRole::User
                } else {
                    ChatRole::Assistant
                };
                ChatItem::message(role, format!("m{i}"))
            })
            .collect()
    }

    #[test]
    fn keeps_last_ten_in_order() {
        let record = HistoryRecord::from_items(&conversation(12));
        let contents: Vec<&str> = record
            .last_messages
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(
            contents,
            vec!["m2", "m3", "m4", "m5", "m6", "m7", "m8", "m9", "m10", "m11"]
        );
        assert_eq!(record.note, HISTORY_NOTE);
    }

    #[test]
    fn skips_system_calls_and_empty_messages() {
        let items = vec![
            ChatItem::message(ChatRole::System, "You are the CheckInAgent."),
            ChatItem::message(ChatRole::User, ""),
            ChatItem::function_call("c1", "register_request", "{}"),
            ChatItem::function_call_output("c1", "ok", false),
            ChatItem::message(ChatRole::User, "I feel fine"),
        ];
        let record = HistoryRecord::from_items(&items);
        assert_eq!(record.last_messages.len(), 1);
        assert_eq!(record.last_messages[0].role, ChatRole::User);
    }

    #[test]
    fn record_json_shape() {
        let record = HistoryRecord::from_items(&conversation(2));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["last_messages"][0]["role"], "user");
        assert_eq!(json["last_messages"][1]["role"], "assistant");
        assert_eq!(json["note"], HISTORY_NOTE);
    }

    #[test]
    fn previous_history_sentinels() {
        assert_eq!(
            PreviousHistory::Missing.render(),
            "There is no previous conversation data."
        );
        assert_eq!(
            PreviousHistory::Unreadable.render(),
            "Failed to load previous conversation data."
        );
        let rendered = PreviousHistory::Record(HistoryRecord::from_items(&conversation(1))).render();
        assert!(rendered.contains("\"last_messages\""));
    }
}
