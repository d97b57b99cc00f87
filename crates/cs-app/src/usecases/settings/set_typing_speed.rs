use std::sync::Arc;

use anyhow::{ensure, Result};
use tracing::{info, info_span, Instrument};

use cs_core::ports::SettingsPort;

/// Persists the default inter-character typing delay.
pub struct SetTypingSpeed {
    settings: Arc<dyn SettingsPort>,
}

impl SetTypingSpeed {
    pub fn new(settings: Arc<dyn SettingsPort>) -> Self {
        Self { settings }
    }

    pub async fn execute(&self, speed_ms: u64) -> Result<()> {
        let span = info_span!("usecase.settings.set_typing_speed", speed_ms);

        async {
            ensure!(speed_ms > 0, "typing speed must be a positive number of milliseconds");

            let mut settings = self.settings.load().await?;
            let old = settings.typing.default_speed_ms;
            settings.typing.default_speed_ms = speed_ms;
            self.settings.save(&settings).await?;

            info!(old, new = speed_ms, "Default typing speed updated");
            Ok(())
        }
        .instrument(span)
        .await
    }
}
