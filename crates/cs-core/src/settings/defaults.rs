use super::model::*;
use crate::sync::{
    NaiveTimestampZone, DEFAULT_DEDUP_CAPACITY, DEFAULT_FAILURE_THRESHOLD, DEFAULT_STALE_GRACE,
};
use crate::typing::DEFAULT_TYPING_SPEED_MS;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000/api";

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_ms: 5_000,
            probe_timeout_ms: 3_000,
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            interval_ms: 2_000,
            error_cooldown_ms: 5_000,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            stop_join_timeout_ms: 5_000,
        }
    }
}

impl Default for TypingSettings {
    fn default() -> Self {
        Self {
            default_speed_ms: DEFAULT_TYPING_SPEED_MS,
            focus_delay_ms: 3_000,
        }
    }
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            stale_grace_secs: DEFAULT_STALE_GRACE.as_secs(),
            dedup_capacity: DEFAULT_DEDUP_CAPACITY,
            naive_timestamps: NaiveTimestampZone::Utc,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            server: ServerSettings::default(),
            account: AccountSettings::default(),
            sync: SyncSettings::default(),
            typing: TypingSettings::default(),
            commands: CommandSettings::default(),
        }
    }
}
