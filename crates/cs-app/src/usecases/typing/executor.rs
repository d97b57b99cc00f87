//! Typing executor: turns accepted commands into keystrokes.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, Instrument};

use cs_core::ids::CommandId;
use cs_core::ports::{KeystrokeEmitterPort, KeystrokeError, TypingHostHandler};
use cs_core::typing::{resolve_per_char_delay, TypingCommand, TypingRequest};

/// How keystrokes reach the OS. Chosen once at wiring time.
#[derive(Clone)]
pub enum TypingCapability {
    /// A host shell registered a handler and owns emission.
    HostDelegated(Arc<dyn TypingHostHandler>),
    /// Emit directly after a focus grace delay.
    Direct(Arc<dyn KeystrokeEmitterPort>),
}

impl std::fmt::Debug for TypingCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HostDelegated(_) => f.write_str("HostDelegated"),
            Self::Direct(_) => f.write_str("Direct"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypingOutcome {
    Typed { chars: usize },
    SkippedEmpty,
}

/// Emits command content as keystrokes.
///
/// ## Behavior
/// - Missing or non-positive speeds fall back to `default_speed`
/// - Empty content is skipped without touching the capability
/// - The direct path waits `focus_delay` first; the host path hands off immediately
/// - Cancellation aborts the wait or the emission with [`KeystrokeError::Cancelled`]
pub struct TypingExecutor {
    capability: TypingCapability,
    default_speed: Duration,
    focus_delay: Duration,
}

impl TypingExecutor {
    pub fn new(capability: TypingCapability, default_speed: Duration, focus_delay: Duration) -> Self {
        Self {
            capability,
            default_speed,
            focus_delay,
        }
    }

    pub fn resolve_delay(&self, speed_ms: Option<i64>) -> Duration {
        resolve_per_char_delay(speed_ms, self.default_speed)
    }

    pub async fn execute_command(
        &self,
        command: &TypingCommand,
        cancel: &CancellationToken,
    ) -> Result<TypingOutcome, KeystrokeError> {
        self.execute(
            Some(command.command_id.clone()),
            &command.content,
            command.typing_speed,
            cancel,
        )
        .await
    }

    pub async fn execute(
        &self,
        command_id: Option<CommandId>,
        content: &str,
        speed_ms: Option<i64>,
        cancel: &CancellationToken,
    ) -> Result<TypingOutcome, KeystrokeError> {
        let per_char_delay = self.resolve_delay(speed_ms);
        let span = info_span!(
            "usecase.typing.execute",
            command_id = command_id.as_ref().map(|id| id.as_str()).unwrap_or("-"),
            chars = content.chars().count(),
            per_char_delay_ms = per_char_delay.as_millis() as u64,
            capability = ?self.capability,
        );

        async {
            if content.is_empty() {
                debug!("Skipping typing of empty content");
                return Ok(TypingOutcome::SkippedEmpty);
            }

            let chars = content.chars().count();
            let emission = async {
                match &self.capability {
                    TypingCapability::HostDelegated(handler) => {
                        handler
                            .handle_typing(TypingRequest {
                                command_id: command_id.clone(),
                                content: content.to_string(),
                                per_char_delay,
                            })
                            .await
                    }
                    TypingCapability::Direct(emitter) => {
                        tokio::time::sleep(self.focus_delay).await;
                        emitter.emit(content, per_char_delay).await
                    }
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => Err(KeystrokeError::Cancelled),
                result = emission => result,
            }?;

            info!(chars, "Typing finished");
            Ok(TypingOutcome::Typed { chars })
        }
        .instrument(span)
        .await
    }
}
