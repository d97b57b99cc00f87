use std::path::PathBuf;

use cs_core::{
    app_dirs::AppDirs,
    ports::{AppDirsError, AppDirsPort},
};

const DATA_DIR_NAME: &str = "clipsync";

/// Selects a separate data directory (`clipsync-<profile>`) so two agents can
/// run side by side on one machine.
pub const PROFILE_ENV: &str = "CLIPSYNC_PROFILE";

/// Per-user data directory, optionally split by profile.
#[derive(Debug, Clone, Default)]
pub struct UserDataDirs {
    base: Option<PathBuf>,
    profile: Option<String>,
}

impl UserDataDirs {
    /// System data-local directory, profile taken from `CLIPSYNC_PROFILE`.
    pub fn from_env() -> Self {
        let profile = std::env::var(PROFILE_ENV).ok();
        Self::default().with_profile(profile.as_deref())
    }

    /// Resolve under `base` instead of the system data-local directory.
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Blank profiles mean "no profile". Path separators are replaced so the
    /// profile can never leave the base directory.
    pub fn with_profile(mut self, profile: Option<&str>) -> Self {
        self.profile = profile
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| p.replace(['/', '\\'], "_").replace("..", "_"));
        self
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    fn dir_name(&self) -> String {
        match &self.profile {
            Some(profile) => format!("{DATA_DIR_NAME}-{profile}"),
            None => DATA_DIR_NAME.to_string(),
        }
    }
}

impl AppDirsPort for UserDataDirs {
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
        let base = self
            .base
            .clone()
            .or_else(dirs::data_local_dir)
            .ok_or(AppDirsError::DataLocalDirUnavailable)?;

        Ok(AppDirs {
            app_data_root: base.join(self.dir_name()),
        })
    }
}
