use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cs_core::ports::{KeystrokeEmitterPort, KeystrokeError};
use enigo::{Enigo, Keyboard, Settings};
use tokio::task::spawn_blocking;
use tracing::debug;

/// Direct keystroke injection through enigo.
///
/// Each emission runs on a blocking thread with its own `Enigo` handle.
/// Dropping the returned future stops emission before the next character.
#[derive(Debug, Default, Clone)]
pub struct EnigoKeystrokeEmitter;

impl EnigoKeystrokeEmitter {
    pub fn new() -> Self {
        Self
    }
}

struct AbortOnDrop(Arc<AtomicBool>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

fn emit_blocking(
    text: &str,
    per_char_delay: Duration,
    abort: &AtomicBool,
) -> Result<usize, KeystrokeError> {
    let mut enigo = Enigo::new(&Settings::default())
        .map_err(|e| KeystrokeError::CapabilityUnavailable(e.to_string()))?;

    let mut typed = 0;
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        if abort.load(Ordering::SeqCst) {
            return Err(KeystrokeError::Cancelled);
        }
        enigo
            .text(ch.encode_utf8(&mut buf))
            .map_err(|e| KeystrokeError::Injection(e.to_string()))?;
        typed += 1;
        if !per_char_delay.is_zero() {
            std::thread::sleep(per_char_delay);
        }
    }
    Ok(typed)
}

#[async_trait]
impl KeystrokeEmitterPort for EnigoKeystrokeEmitter {
    async fn emit(&self, text: &str, per_char_delay: Duration) -> Result<(), KeystrokeError> {
        let abort = Arc::new(AtomicBool::new(false));
        let _guard = AbortOnDrop(abort.clone());
        let text = text.to_string();

        let typed = spawn_blocking(move || emit_blocking(&text, per_char_delay, &abort))
            .await
            .map_err(|e| KeystrokeError::Injection(format!("keystroke task failed: {e}")))??;

        debug!(chars = typed, "keystrokes emitted");
        Ok(())
    }
}
