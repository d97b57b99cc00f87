//! Clipboard port - abstracts local clipboard access

use anyhow::Result;

/// Plain-text access to the system clipboard.
///
/// Implementations are synchronous; callers on the async runtime should treat
/// them as short blocking calls.
pub trait SystemClipboardPort: Send + Sync {
    /// Current clipboard text, or `None` when the clipboard holds no text.
    fn read_text(&self) -> Result<Option<String>>;

    fn write_text(&self, text: &str) -> Result<()>;
}
