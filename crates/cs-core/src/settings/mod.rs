pub mod defaults;
pub mod model;

pub use model::{
    AccountSettings, CommandSettings, ServerSettings, Settings, SyncSettings, TypingSettings,
    CURRENT_SCHEMA_VERSION, MIN_SYNC_PAUSE,
};
