pub mod remote;
pub mod settings;
pub mod time;

pub use remote::{HttpRemoteStore, HttpRemoteStoreConfig, InMemoryRemoteStore};
pub use settings::FileSettingsRepository;
pub use time::SystemClock;
