//! Chat message types for the assistant conversation.

use crate::ids::MessageId;

/// Role of a message in the conversation. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    /// User message (prompt).
    User,
    /// Assistant message (answer).
    Assistant,
}

/// One conversational turn.
///
/// User messages are complete when created. Assistant messages start empty and
/// are filled by the reveal until they equal the received answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Stable identity for the lifetime of the message.
    pub id: MessageId,
    /// Role of this message.
    pub role: ChatRole,
    /// Message content.
    pub content: String,
    /// Citations attached to an assistant answer. Always `None` for user messages.
    pub sources: Option<Vec<String>>,
    /// Unix timestamp (milliseconds) when message was created.
    pub timestamp_ms: i64,
}

impl ChatMessage {
    fn new(role: ChatRole, content: String, sources: Option<Vec<String>>) -> Self {
        Self {
            id: MessageId::generate(),
            role,
            content,
            sources,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content.into(), None)
    }

    /// Create an empty assistant message carrying the answer's citations.
    pub fn assistant_placeholder(sources: Vec<String>) -> Self {
        Self::new(ChatRole::Assistant, String::new(), Some(sources))
    }

    /// Returns true for user messages.
    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }

    /// Citations, or an empty slice when there are none.
    pub fn sources(&self) -> &[String] {
        self.sources.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let msg = ChatMessage::user("hello");
        assert_eq!(msg.role, ChatRole::User);
        assert_eq!(msg.content, "hello");
        assert!(msg.sources.is_none());
        assert!(msg.timestamp_ms > 0);
    }

    #[test]
    fn test_assistant_placeholder_starts_empty() {
        let msg = ChatMessage::assistant_placeholder(vec!["doc1".to_string()]);
        assert_eq!(msg.role, ChatRole::Assistant);
        assert!(msg.content.is_empty());
        assert_eq!(msg.sources(), ["doc1".to_string()]);
    }
}
