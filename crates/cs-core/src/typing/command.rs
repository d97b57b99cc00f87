use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::CommandId;

/// The only action a typing command may carry.
pub const SIMULATE_TYPING_ACTION: &str = "simulate_typing";

/// Remote request to type `content` on the receiving machine.
///
/// Travels as the JSON `content` of a clipboard entry whose content type is
/// `typing_command`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingCommand {
    pub command_id: CommandId,
    pub content: String,
    /// Inter-character delay in milliseconds. Non-positive means "use the default".
    pub typing_speed: Option<i64>,
    pub action: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypingCommandError {
    #[error("typing command payload is not valid JSON: {0}")]
    Malformed(String),

    #[error("unsupported typing command action: {0:?}")]
    UnsupportedAction(Option<String>),

    #[error("typing command has no command_id")]
    MissingCommandId,
}

#[derive(Deserialize)]
struct RawTypingCommand {
    #[serde(default)]
    command_id: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    typing_speed: Option<f64>,
    #[serde(default)]
    action: Option<String>,
}

impl TypingCommand {
    pub fn new(
        command_id: impl Into<CommandId>,
        content: impl Into<String>,
        typing_speed: Option<i64>,
    ) -> Self {
        Self {
            command_id: command_id.into(),
            content: content.into(),
            typing_speed,
            action: SIMULATE_TYPING_ACTION.to_string(),
        }
    }

    /// Decode a command from the entry payload.
    pub fn decode(payload: &str) -> Result<Self, TypingCommandError> {
        let raw: RawTypingCommand = serde_json::from_str(payload)
            .map_err(|e| TypingCommandError::Malformed(e.to_string()))?;

        if raw.action.as_deref() != Some(SIMULATE_TYPING_ACTION) {
            return Err(TypingCommandError::UnsupportedAction(raw.action));
        }

        let command_id = raw
            .command_id
            .map(CommandId::from)
            .filter(|id| !id.is_blank())
            .ok_or(TypingCommandError::MissingCommandId)?;

        Ok(Self {
            command_id,
            content: raw.content.unwrap_or_default(),
            typing_speed: raw.typing_speed.map(|ms| ms.round() as i64),
            action: SIMULATE_TYPING_ACTION.to_string(),
        })
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
