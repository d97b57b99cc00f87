use serde::{Deserialize, Serialize};

/// Kind of payload carried by a [`super::ClipboardEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Plain clipboard text.
    #[default]
    Text,

    /// JSON-encoded [`crate::typing::TypingCommand`].
    TypingCommand,

    /// Anything else the store may report (images, future kinds). Never applied.
    #[serde(other)]
    Unsupported,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::TypingCommand => "typing_command",
            Self::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
