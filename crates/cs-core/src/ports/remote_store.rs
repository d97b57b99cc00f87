use async_trait::async_trait;

use super::errors::RemoteStoreError;
use crate::clipboard::ClipboardEntry;
use crate::sync::ConnectionHealth;

/// Authenticated access to the shared clipboard store.
#[async_trait]
pub trait RemoteStorePort: Send + Sync {
    /// Publish `content` as a new text entry.
    async fn push(&self, content: &str) -> Result<(), RemoteStoreError>;

    /// Latest entry for the session's user. `Ok(None)` means the store is empty.
    async fn pull_latest(&self) -> Result<Option<ClipboardEntry>, RemoteStoreError>;

    /// Bounded-timeout liveness check, independent of the session.
    async fn probe(&self) -> ConnectionHealth;
}
