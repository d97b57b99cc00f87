use serde::{Deserialize, Serialize};

use super::ContentType;
use crate::sync::timestamp::{self, OriginTimestamp, UnparseableTimestamp};
use crate::typing::{TypingCommand, TypingCommandError};

/// A clipboard entry as reported by the remote store.
///
/// Entries are immutable; a newer entry supersedes the previous "latest" one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub content: String,

    #[serde(default)]
    pub content_type: ContentType,

    /// Creation time in whatever encoding the store uses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ClipboardEntry {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            id: None,
            content: content.into(),
            content_type: ContentType::Text,
            timestamp: None,
        }
    }

    /// Decode the command payload carried in `content`.
    pub fn typing_command(&self) -> Result<TypingCommand, TypingCommandError> {
        TypingCommand::decode(&self.content)
    }

    /// Normalized creation time.
    ///
    /// `None` when the store did not report one.
    pub fn origin_timestamp(&self) -> Option<Result<OriginTimestamp, UnparseableTimestamp>> {
        self.timestamp.as_deref().map(timestamp::normalize)
    }
}

/// Request body for creating an entry on the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClipboardEntry {
    pub content: String,
    pub content_type: ContentType,
}

impl NewClipboardEntry {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: ContentType::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_store_payload() {
        let json = r#"{
            "id": 7,
            "content": "hello",
            "content_type": "text",
            "timestamp": "2024-01-01T10:00:00.123456"
        }"#;

        let entry: ClipboardEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.id, Some(7));
        assert_eq!(entry.content, "hello");
        assert_eq!(entry.content_type, ContentType::Text);
        assert!(matches!(entry.origin_timestamp(), Some(Ok(_))));
    }

    #[test]
    fn test_missing_content_type_defaults_to_text() {
        let entry: ClipboardEntry = serde_json::from_str(r#"{"content":"x"}"#).unwrap();
        assert_eq!(entry.content_type, ContentType::Text);
        assert!(entry.origin_timestamp().is_none());
    }

    #[test]
    fn test_new_entry_body_shape() {
        let body = serde_json::to_value(NewClipboardEntry::text("abc")).unwrap();
        assert_eq!(body, serde_json::json!({"content": "abc", "content_type": "text"}));
    }
}
