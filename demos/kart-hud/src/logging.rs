//! File logging. The terminal belongs to the UI, so nothing goes to stdout.

use std::env;
use std::fs::File;
use std::io;
use std::panic::{self, PanicHookInfo};
use std::path::Path;
use std::sync::Arc;

use kart_ui::term;
use tracing::{error, info, trace};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Our crates are debug, everything else is warn
const DEFAULT_FILTER: &str = "warn,kart_ui_core=debug,kart_ui_term=debug,kart_hud=debug";

/// Install a subscriber writing to `path`. `RUST_LOG` directives are appended
/// to the default filter.
pub fn init_logging(path: &Path) -> io::Result<()> {
    let log_file = File::create(path)?;
    let file_log = fmt::layer()
        .with_ansi(false)
        .with_line_number(true)
        .with_writer(Arc::new(log_file));

    let mut filter = DEFAULT_FILTER.to_owned();
    if let Ok(env_filter) = env::var(EnvFilter::DEFAULT_ENV) {
        filter.push(',');
        filter.push_str(&env_filter);
    }

    let subscriber = Registry::default()
        .with(EnvFilter::new(filter))
        .with(file_log);
    tracing::subscriber::set_global_default(subscriber).map_err(io::Error::other)?;
    info!(log = %path.display(), "starting kart-hud");

    panic::set_hook(panic_hook(term::restore));
    trace!("installed panic hook");
    Ok(())
}

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Send + Sync + 'static>;

/// Restores the screen first so the shell is usable again, then logs
fn panic_hook(restore: fn() -> io::Result<()>) -> PanicHook {
    Box::new(move |info| {
        let restored = restore();
        error!("{}", info);
        if let Err(e) = restored {
            error!(error = %e, "terminal restore failed");
        }
    })
}
