//! Conversation message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One message in an agent conversation.
///
/// Server copies carry the row id and conversation id. Copies appended
/// locally while a stream is in flight are provisional (empty `id`) and are
/// replaced wholesale by the authoritative fetch after completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub conversation_id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Provisional message appended locally during an active exchange.
    pub fn local(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            conversation_id: String::new(),
            role,
            content: content.into(),
            metadata: serde_json::Value::Null,
            created_at: Utc::now(),
        }
    }

    /// Whether this copy came from the backend rather than a local append.
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&MessageRole::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&MessageRole::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_local_message_is_provisional() {
        let msg = ChatMessage::local(MessageRole::User, "hello");
        assert!(!msg.is_persisted());
        assert_eq!(msg.content, "hello");
        assert_eq!(msg.role, MessageRole::User);
        assert!(msg.metadata.is_null());
    }

    #[test]
    fn test_deserialize_backend_row() {
        let json = r#"{
            "id": "m-1",
            "conversation_id": "c-1",
            "role": "assistant",
            "content": "Hi there",
            "metadata": {"model": "gamma-1"},
            "created_at": "2026-02-01T12:00:00Z"
        }"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert!(msg.is_persisted());
        assert_eq!(msg.role, MessageRole::Assistant);
        assert_eq!(msg.metadata["model"], "gamma-1");
    }

    #[test]
    fn test_deserialize_minimal_row() {
        // Optional columns may be absent from older rows.
        let json = r#"{"role":"user","content":"q"}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.content, "q");
        assert!(msg.id.is_empty());
    }
}
