use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use cs_core::ports::{Credentials, RemoteAccountPort, RemoteStoreError};

/// Creates an account on the remote store.
pub struct RegisterUseCase {
    account: Arc<dyn RemoteAccountPort>,
}

impl RegisterUseCase {
    pub fn new(account: Arc<dyn RemoteAccountPort>) -> Self {
        Self { account }
    }

    pub async fn execute(&self, credentials: &Credentials) -> Result<(), RemoteStoreError> {
        let span = info_span!("usecase.account.register", username = %credentials.username);

        async {
            self.account.register(credentials).await?;
            info!("Account registered");
            Ok(())
        }
        .instrument(span)
        .await
    }
}
