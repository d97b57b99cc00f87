//! # Configuration resolution
//!
//! Decides where the settings file and logs live and applies one-shot CLI
//! overrides on top of the loaded [`Settings`]. Loading and saving the file
//! itself is done by `FileSettingsRepository`.

use std::path::PathBuf;

use anyhow::{bail, Context};
use cs_core::{ports::AppDirsPort, settings::Settings};

/// Where this invocation reads settings from and writes logs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub settings_path: PathBuf,
    /// `None` when no per-user data directory is available.
    pub logs_dir: Option<PathBuf>,
}

/// Resolve file locations.
///
/// `--config` wins for the settings file; logs always go to the per-user data
/// directory when one exists.
pub fn resolve_paths(
    config_override: Option<PathBuf>,
    app_dirs: &dyn AppDirsPort,
) -> anyhow::Result<ResolvedPaths> {
    let dirs = app_dirs.get_app_dirs();

    let settings_path = match (config_override, &dirs) {
        (Some(path), _) => path,
        (None, Ok(dirs)) => dirs.settings_path(),
        (None, Err(err)) => {
            return Err(anyhow::anyhow!("{err}"))
                .context("cannot locate the settings file; pass --config <path>")
        }
    };

    Ok(ResolvedPaths {
        settings_path,
        logs_dir: dirs.ok().map(|d| d.logs_dir()),
    })
}

/// Overrides that apply to a single invocation.
///
/// Only `login` writes the server URL back, together with the new token.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub server_url: Option<String>,
}

impl CliOverrides {
    pub fn apply(&self, settings: &mut Settings) -> anyhow::Result<()> {
        if let Some(url) = &self.server_url {
            let url = url.trim();
            if url.is_empty() {
                bail!("--server must not be empty");
            }
            settings.server.url = url.to_string();
        }
        Ok(())
    }
}
