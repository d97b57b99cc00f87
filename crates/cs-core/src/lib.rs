//! # cs-core
//!
//! Domain models, sync rules and port traits for clipsync.
//!
//! This crate contains pure logic without any infrastructure dependencies.

pub mod app_dirs;
pub mod clipboard;
pub mod ids;
pub mod ports;
pub mod settings;
pub mod sync;
pub mod typing;

pub use clipboard::{ClipboardEntry, ContentType, NewClipboardEntry};
pub use ids::{ClientId, CommandId};
pub use settings::Settings;
pub use sync::{AgentSession, ConnectionHealth};
pub use typing::{TypingCommand, TypingRequest};
