use std::sync::Arc;

use tracing::{debug, info_span, Instrument};

use cs_core::ports::{RemoteAccountPort, RemoteClient, RemoteStoreError};

/// Lists the agents registered under the current account.
pub struct ListClients {
    account: Arc<dyn RemoteAccountPort>,
}

impl ListClients {
    pub fn new(account: Arc<dyn RemoteAccountPort>) -> Self {
        Self { account }
    }

    pub async fn execute(&self) -> Result<Vec<RemoteClient>, RemoteStoreError> {
        async {
            let clients = self.account.list_clients().await?;
            debug!(count = clients.len(), "Listed clients");
            Ok(clients)
        }
        .instrument(info_span!("usecase.account.list_clients"))
        .await
    }
}
