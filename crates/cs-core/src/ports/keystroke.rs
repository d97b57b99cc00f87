use std::time::Duration;

use async_trait::async_trait;

use super::errors::KeystrokeError;
use crate::typing::TypingRequest;

/// Emits text as simulated keystrokes into the focused window.
#[async_trait]
pub trait KeystrokeEmitterPort: Send + Sync {
    async fn emit(&self, text: &str, per_char_delay: Duration) -> Result<(), KeystrokeError>;
}

/// Handler registered by a host shell that owns keystroke emission itself.
///
/// The host decides focus handling; no grace delay is applied before handing off.
#[async_trait]
pub trait TypingHostHandler: Send + Sync {
    async fn handle_typing(&self, request: TypingRequest) -> Result<(), KeystrokeError>;
}
