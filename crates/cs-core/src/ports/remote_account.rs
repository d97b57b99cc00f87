use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::RemoteStoreError;
use crate::ids::{ClientId, CommandId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of `POST /session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub username: String,
    pub password: String,
    pub client_id: ClientId,
    pub client_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGrant {
    pub token: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Another agent registered under the same account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteClient {
    pub client_id: ClientId,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub last_seen: Option<String>,
}

/// Body of `POST /typing-commands`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTypingCommand {
    pub client_id: ClientId,
    pub content: String,
    pub typing_speed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedTypingCommand {
    pub command_id: CommandId,
}

/// Account-level operations on the remote store.
#[async_trait]
pub trait RemoteAccountPort: Send + Sync {
    async fn register(&self, credentials: &Credentials) -> Result<(), RemoteStoreError>;

    /// Open a session; the returned token is also installed for later calls.
    async fn create_session(
        &self,
        request: &SessionRequest,
    ) -> Result<SessionGrant, RemoteStoreError>;

    async fn list_clients(&self) -> Result<Vec<RemoteClient>, RemoteStoreError>;

    async fn send_typing_command(
        &self,
        command: &NewTypingCommand,
    ) -> Result<IssuedTypingCommand, RemoteStoreError>;
}
