//! Remote typing commands and the request handed to keystroke emitters.

mod command;

use std::time::Duration;

pub use command::{TypingCommand, TypingCommandError, SIMULATE_TYPING_ACTION};

use crate::ids::CommandId;

/// Default inter-character delay when neither the command nor settings specify one.
pub const DEFAULT_TYPING_SPEED_MS: u64 = 100;

/// A resolved request to emit keystrokes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingRequest {
    /// Originating remote command, if any.
    pub command_id: Option<CommandId>,
    pub content: String,
    pub per_char_delay: Duration,
}

/// Inter-character delay for `speed_ms`, falling back to `default` for missing
/// or non-positive speeds.
pub fn resolve_per_char_delay(speed_ms: Option<i64>, default: Duration) -> Duration {
    match speed_ms {
        Some(ms) if ms > 0 => Duration::from_millis(ms as u64),
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_speed_falls_back_to_default() {
        let default = Duration::from_millis(100);

        assert_eq!(resolve_per_char_delay(Some(20), default), Duration::from_millis(20));
        assert_eq!(resolve_per_char_delay(Some(0), default), default);
        assert_eq!(resolve_per_char_delay(Some(-5), default), default);
        assert_eq!(resolve_per_char_delay(None, default), default);
    }
}
