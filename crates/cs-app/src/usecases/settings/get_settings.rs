use std::sync::Arc;

use anyhow::Result;
use tracing::{info_span, Instrument};

use cs_core::ports::SettingsPort;
use cs_core::settings::Settings;

pub struct GetSettings {
    settings: Arc<dyn SettingsPort>,
}

impl GetSettings {
    pub fn new(settings: Arc<dyn SettingsPort>) -> Self {
        Self { settings }
    }

    pub async fn execute(&self) -> Result<Settings> {
        self.settings
            .load()
            .instrument(info_span!("usecase.get_settings.execute"))
            .await
    }
}
