use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ids::ClientId;
use crate::sync::NaiveTimestampZone;

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Floor for the sync loop's sleeps; a zero interval would spin against the server.
pub const MIN_SYNC_PAUSE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base URL of the store API, e.g. `http://localhost:5000/api`.
    pub url: String,
    pub request_timeout_ms: u64,
    pub probe_timeout_ms: u64,
}

/// Identity of this install. Passwords are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSettings {
    pub username: Option<String>,
    pub client_id: Option<ClientId>,
    pub session_token: Option<String>,
    pub client_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    pub interval_ms: u64,
    /// Sleep after a tick that failed at the tick boundary.
    pub error_cooldown_ms: u64,
    pub failure_threshold: u32,
    pub stop_join_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingSettings {
    pub default_speed_ms: u64,
    /// Wait before direct keystroke emission so the user can focus a window.
    pub focus_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandSettings {
    pub stale_grace_secs: u64,
    pub dedup_capacity: usize,
    pub naive_timestamps: NaiveTimestampZone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub account: AccountSettings,

    #[serde(default)]
    pub sync: SyncSettings,

    #[serde(default)]
    pub typing: TypingSettings,

    #[serde(default)]
    pub commands: CommandSettings,
}

fn current_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

impl ServerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl SyncSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms).max(MIN_SYNC_PAUSE)
    }

    pub fn error_cooldown(&self) -> Duration {
        Duration::from_millis(self.error_cooldown_ms).max(MIN_SYNC_PAUSE)
    }

    pub fn stop_join_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_join_timeout_ms)
    }
}

impl TypingSettings {
    pub fn default_speed(&self) -> Duration {
        Duration::from_millis(self.default_speed_ms)
    }

    pub fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.focus_delay_ms)
    }
}

impl CommandSettings {
    pub fn stale_grace(&self) -> Duration {
        Duration::from_secs(self.stale_grace_secs)
    }
}

impl AccountSettings {
    pub fn has_session(&self) -> bool {
        self.session_token
            .as_deref()
            .is_some_and(|token| !token.trim().is_empty())
    }
}
