use std::path::PathBuf;

/// Resolved per-user directories. Pure facts, no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub app_data_root: PathBuf,
}

impl AppDirs {
    pub fn settings_path(&self) -> PathBuf {
        self.app_data_root.join("config.toml")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.app_data_root.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_dirs_derives_file_locations() {
        let dirs = AppDirs {
            app_data_root: PathBuf::from("/tmp/clipsync"),
        };
        assert_eq!(dirs.settings_path(), PathBuf::from("/tmp/clipsync/config.toml"));
        assert_eq!(dirs.logs_dir(), PathBuf::from("/tmp/clipsync/logs"));
    }
}
