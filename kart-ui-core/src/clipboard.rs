//! Clipboard seam

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::warn;

/// Text clipboard provided by the host
pub trait Clipboard {
    /// Current text contents, or an empty string
    fn read_text(&mut self) -> String;
}

/// A clipboard that is always empty
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn read_text(&mut self) -> String {
        String::new()
    }
}

/// Run a possibly-blocking clipboard read on a helper thread, waiting at most
/// `timeout` for it. A read that does not finish in time yields an empty
/// string; the helper thread is left to finish on its own.
pub fn read_with_timeout<F>(read: F, timeout: Duration) -> String
where
    F: FnOnce() -> String + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("clipboard-read".into())
        .spawn(move || {
            let _ = tx.send(read());
        });
    if let Err(e) = spawned {
        warn!(error = %e, "unable to spawn clipboard reader");
        return String::new();
    }
    match rx.recv_timeout(timeout) {
        Ok(text) => text,
        Err(_) => {
            warn!(?timeout, "clipboard read timed out");
            String::new()
        }
    }
}
