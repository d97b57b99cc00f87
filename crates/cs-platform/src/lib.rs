//! # cs-platform
//!
//! Adapters that touch the operating system: clipboard access, keystroke
//! injection and per-user data directories.

pub mod app_dirs;
pub mod clipboard;
pub mod keystroke;

pub use app_dirs::UserDataDirs;
pub use clipboard::LocalClipboard;
pub use keystroke::EnigoKeystrokeEmitter;
