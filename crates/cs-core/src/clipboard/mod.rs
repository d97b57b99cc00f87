//! Clipboard domain models.
mod content_type;
mod entry;

pub use content_type::ContentType;
pub use entry::{ClipboardEntry, NewClipboardEntry};
