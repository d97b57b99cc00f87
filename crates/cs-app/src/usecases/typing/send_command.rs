//! Use case for asking another agent to type text.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, info_span, Instrument};

use cs_core::ids::ClientId;
use cs_core::ports::{
    IssuedTypingCommand, NewTypingCommand, RemoteAccountPort, RemoteStoreError, SettingsPort,
};

#[derive(Debug, Error)]
pub enum SendTypingCommandError {
    #[error("nothing to type")]
    EmptyContent,

    #[error("target client id is empty")]
    MissingTarget,

    #[error(transparent)]
    Remote(#[from] RemoteStoreError),

    #[error("failed to load settings: {0:#}")]
    Settings(anyhow::Error),
}

/// Issues a typing command for `target`.
///
/// A missing or zero speed falls back to `typing.default_speed_ms` from settings.
pub struct SendTypingCommand {
    account: Arc<dyn RemoteAccountPort>,
    settings: Arc<dyn SettingsPort>,
}

impl SendTypingCommand {
    pub fn new(account: Arc<dyn RemoteAccountPort>, settings: Arc<dyn SettingsPort>) -> Self {
        Self { account, settings }
    }

    pub async fn execute(
        &self,
        target: ClientId,
        content: String,
        speed_ms: Option<u64>,
    ) -> Result<IssuedTypingCommand, SendTypingCommandError> {
        let span = info_span!("usecase.typing.send_command", target = %target);

        async {
            if content.is_empty() {
                return Err(SendTypingCommandError::EmptyContent);
            }
            if target.is_blank() {
                return Err(SendTypingCommandError::MissingTarget);
            }

            let typing_speed = match speed_ms.filter(|ms| *ms > 0) {
                Some(ms) => ms,
                None => {
                    self.settings
                        .load()
                        .await
                        .map_err(SendTypingCommandError::Settings)?
                        .typing
                        .default_speed_ms
                }
            };

            let issued = self
                .account
                .send_typing_command(&NewTypingCommand {
                    client_id: target,
                    content,
                    typing_speed,
                })
                .await?;

            info!(command_id = %issued.command_id, typing_speed, "Typing command issued");
            Ok(issued)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemorySettings;
    use cs_core::settings::Settings;
    use cs_infra::InMemoryRemoteStore;
    use cs_core::ports::RemoteStorePort;

    fn use_case(store: Arc<InMemoryRemoteStore>, default_speed: u64) -> SendTypingCommand {
        let mut settings = Settings::default();
        settings.typing.default_speed_ms = default_speed;
        SendTypingCommand::new(store, Arc::new(MemorySettings::new(settings)))
    }

    #[tokio::test]
    async fn publishes_command_with_explicit_speed() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let issued = use_case(store.clone(), 100)
            .execute(ClientId::new("bob-1"), "hello".into(), Some(30))
            .await
            .unwrap();

        let latest = store.pull_latest().await.unwrap().unwrap();
        let command = latest.typing_command().unwrap();
        assert_eq!(command.command_id, issued.command_id);
        assert_eq!(command.typing_speed, Some(30));
    }

    #[tokio::test]
    async fn missing_speed_uses_settings_default() {
        let store = Arc::new(InMemoryRemoteStore::new());
        use_case(store.clone(), 75)
            .execute(ClientId::new("bob-1"), "hello".into(), None)
            .await
            .unwrap();

        let latest = store.pull_latest().await.unwrap().unwrap();
        assert_eq!(latest.typing_command().unwrap().typing_speed, Some(75));
    }

    #[tokio::test]
    async fn empty_content_is_rejected_locally() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let err = use_case(store.clone(), 100)
            .execute(ClientId::new("bob-1"), String::new(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, SendTypingCommandError::EmptyContent));
        assert!(store.entries().is_empty());
    }
}
