//! Use case for opening a session with the remote store.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, info_span, Instrument};

use cs_core::ids::ClientId;
use cs_core::ports::{RemoteAccountPort, RemoteStoreError, SessionRequest, SettingsPort};

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("username and password are required")]
    MissingCredentials,

    #[error("invalid username or password")]
    Rejected,

    #[error(transparent)]
    Remote(RemoteStoreError),

    #[error("settings error: {0:#}")]
    Settings(anyhow::Error),
}

impl From<RemoteStoreError> for LoginError {
    fn from(err: RemoteStoreError) -> Self {
        match err {
            RemoteStoreError::Unauthorized => LoginError::Rejected,
            other => LoginError::Remote(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub client_id: ClientId,
    /// A new client id was generated for this login.
    pub client_id_rotated: bool,
}

/// Logs in and persists the account identity.
///
/// ## Behavior
/// - Reuses the stored client id for the same account across restarts
/// - Generates a fresh `<username>-<uuid>` id when none is stored or the
///   username differs from the stored one
/// - On success saves username, client id, client name and session token;
///   the password is never saved
/// - When a server URL is set it is saved with the token, so the token is never
///   replayed against a different server
pub struct LoginUseCase {
    account: Arc<dyn RemoteAccountPort>,
    settings: Arc<dyn SettingsPort>,
    default_client_name: String,
    server_url: Option<String>,
}

impl LoginUseCase {
    pub fn new(
        account: Arc<dyn RemoteAccountPort>,
        settings: Arc<dyn SettingsPort>,
        default_client_name: impl Into<String>,
    ) -> Self {
        Self {
            account,
            settings,
            default_client_name: default_client_name.into(),
            server_url: None,
        }
    }

    /// Server the session is opened against, persisted on success.
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    pub async fn execute(&self, username: &str, password: &str) -> Result<LoginOutcome, LoginError> {
        let span = info_span!("usecase.account.login", username = %username);

        async {
            let username = username.trim();
            if username.is_empty() || password.is_empty() {
                return Err(LoginError::MissingCredentials);
            }

            let mut settings = self.settings.load().await.map_err(LoginError::Settings)?;

            let same_account = settings.account.username.as_deref() == Some(username);
            let (client_id, rotated) = match settings.account.client_id.clone() {
                Some(id) if same_account && !id.is_blank() => (id, false),
                _ => (ClientId::generate(username), true),
            };
            let client_name = settings
                .account
                .client_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| self.default_client_name.clone());

            let grant = self
                .account
                .create_session(&SessionRequest {
                    username: username.to_string(),
                    password: password.to_string(),
                    client_id: client_id.clone(),
                    client_name: client_name.clone(),
                })
                .await?;

            settings.account.username = Some(username.to_string());
            settings.account.client_id = Some(client_id.clone());
            settings.account.client_name = Some(client_name);
            settings.account.session_token = Some(grant.token);
            if let Some(url) = &self.server_url {
                settings.server.url = url.clone();
            }
            self.settings
                .save(&settings)
                .await
                .map_err(LoginError::Settings)?;

            info!(client_id = %client_id, rotated, "Logged in");
            Ok(LoginOutcome {
                client_id,
                client_id_rotated: rotated,
            })
        }
        .instrument(span)
        .await
    }
}
