//! Port interfaces for the application layer
//!
//! Ports define the contract between the sync rules and the adapters that
//! talk to the remote store, the OS clipboard and the keystroke injector.
//! Use cases depend only on these traits.

pub mod app_dirs;
mod clock;
pub mod errors;
pub mod keystroke;
pub mod local_clipboard;
pub mod remote_account;
pub mod remote_store;
pub mod settings;

pub use app_dirs::AppDirsPort;
pub use clock::ClockPort;
pub use errors::{AppDirsError, KeystrokeError, RemoteStoreError};
pub use keystroke::{KeystrokeEmitterPort, TypingHostHandler};
pub use local_clipboard::SystemClipboardPort;
pub use remote_account::{
    Credentials, IssuedTypingCommand, NewTypingCommand, RemoteAccountPort, RemoteClient,
    SessionGrant, SessionRequest,
};
pub use remote_store::RemoteStorePort;
pub use settings::SettingsPort;
