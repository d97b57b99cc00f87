//! Dependency wiring: turns loaded settings into concrete adapters and use cases.

use std::sync::Arc;

use anyhow::Context;
use cs_app::{
    ClipboardReconciler, SyncAgent, SyncAgentConfig, TypingCapability, TypingExecutor,
};
use cs_core::{
    ports::{ClockPort, RemoteStorePort, SettingsPort},
    settings::Settings,
    sync::StalenessFilter,
};
use cs_infra::{FileSettingsRepository, HttpRemoteStore, HttpRemoteStoreConfig, SystemClock};
use cs_platform::{EnigoKeystrokeEmitter, LocalClipboard};
use tracing::debug;

use super::config::{CliOverrides, ResolvedPaths};

/// Everything a command needs, resolved once per invocation.
pub struct AppContext {
    pub paths: ResolvedPaths,
    pub settings_repo: Arc<FileSettingsRepository>,
    /// Loaded settings with CLI overrides applied.
    pub settings: Settings,
}

impl AppContext {
    pub async fn load(paths: ResolvedPaths, overrides: &CliOverrides) -> anyhow::Result<Self> {
        let settings_repo = Arc::new(FileSettingsRepository::new(paths.settings_path.clone()));
        let mut settings = settings_repo
            .load()
            .await
            .context("failed to load settings")?;
        overrides.apply(&mut settings)?;

        debug!(
            path = %paths.settings_path.display(),
            server = %settings.server.url,
            "Settings loaded"
        );

        Ok(Self {
            paths,
            settings_repo,
            settings,
        })
    }

    pub fn settings_port(&self) -> Arc<dyn SettingsPort> {
        self.settings_repo.clone()
    }

    /// HTTP store for the configured server, carrying the stored session token.
    pub fn http_store(&self) -> anyhow::Result<Arc<HttpRemoteStore>> {
        let store = HttpRemoteStore::new(HttpRemoteStoreConfig::from(&self.settings.server))
            .with_context(|| format!("invalid server url: {}", self.settings.server.url))?
            .with_token(self.settings.account.session_token.clone());
        Ok(Arc::new(store))
    }

    pub fn typing_executor(&self) -> Arc<TypingExecutor> {
        let typing = &self.settings.typing;
        Arc::new(TypingExecutor::new(
            TypingCapability::Direct(Arc::new(EnigoKeystrokeEmitter::new())),
            typing.default_speed(),
            typing.focus_delay(),
        ))
    }

    /// Build the sync agent against `remote`.
    ///
    /// `require_session` is false for offline runs, which have no account.
    pub fn sync_agent(
        &self,
        remote: Arc<dyn RemoteStorePort>,
        require_session: bool,
    ) -> anyhow::Result<SyncAgent> {
        let clipboard = Arc::new(LocalClipboard::new().context("failed to open the clipboard")?);
        let commands = &self.settings.commands;
        let reconciler = Arc::new(ClipboardReconciler::new(
            remote.clone(),
            clipboard,
            self.typing_executor(),
            StalenessFilter::new(commands.stale_grace(), commands.naive_timestamps),
        ));

        let config = SyncAgentConfig {
            require_session,
            ..SyncAgentConfig::from(&self.settings)
        };
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

        Ok(SyncAgent::new(
            remote,
            reconciler,
            self.settings_port(),
            clock,
            config,
        ))
    }
}

/// Name reported to the server for this machine when none is configured.
pub fn default_client_name() -> String {
    gethostname::gethostname()
        .into_string()
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "clipsync".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn paths_for(dir: &tempfile::TempDir) -> ResolvedPaths {
        ResolvedPaths {
            settings_path: dir.path().join("config.toml"),
            logs_dir: None,
        }
    }

    #[tokio::test]
    async fn load_applies_server_override_without_saving_it() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("config.toml")).unwrap();
        writeln!(file, "[server]\nurl = \"http://stored.example/api\"").unwrap();

        let overrides = CliOverrides {
            server_url: Some("http://flag.example/api".into()),
        };
        let ctx = AppContext::load(paths_for(&dir), &overrides).await.unwrap();

        assert_eq!(ctx.settings.server.url, "http://flag.example/api");
        let stored = ctx.settings_port().load().await.unwrap();
        assert_eq!(stored.server.url, "http://stored.example/api");
    }

    #[tokio::test]
    async fn http_store_carries_stored_token() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = AppContext::load(paths_for(&dir), &CliOverrides::default())
            .await
            .unwrap();

        assert!(!ctx.http_store().unwrap().has_token());

        ctx.settings.account.session_token = Some("abc".into());
        let store = ctx.http_store().unwrap();
        assert!(store.has_token());
        assert_eq!(store.endpoint("/health"), "http://localhost:5000/api/health");
    }

    #[test]
    fn default_client_name_is_never_blank() {
        assert!(!default_client_name().trim().is_empty());
    }
}
