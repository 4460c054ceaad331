//! System clipboard via arboard

use std::time::Duration;

use kart_ui_core::{read_with_timeout, Clipboard};
use tracing::warn;

/// Reads the OS clipboard on a helper thread, giving up after `timeout`.
///
/// A fresh arboard handle is opened per read; some platforms tie the handle
/// to the thread that created it.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    timeout: Duration,
}

impl SystemClipboard {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

impl Clipboard for SystemClipboard {
    fn read_text(&mut self) -> String {
        read_with_timeout(
            || match arboard::Clipboard::new().and_then(|mut c| c.get_text()) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "clipboard read failed");
                    String::new()
                }
            },
            self.timeout,
        )
    }
}
