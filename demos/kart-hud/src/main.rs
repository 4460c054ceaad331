//! kart-hud: a race HUD drawn in the terminal with kart-ui
//!
//! Shows a live FPS overlay, a driver panel with a name box and two buttons,
//! toast notifications and a quit confirmation dialog.
//!
//! # Usage
//!
//! ```sh
//! cargo run -p kart-hud
//!
//! # Custom UI config (JSON, layered over the terminal defaults)
//! cargo run -p kart-hud -- --config hud.json
//!
//! # More logging
//! RUST_LOG=kart_ui_core=trace cargo run -p kart-hud
//! ```
//!
//! Ctrl+Q or Ctrl+C leaves immediately.

mod hud;
mod logging;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use kart_ui::term::{self, CellMetrics, RuntimeConfig, SystemClipboard};
use kart_ui::{Size, UiConfig, UiRoot};
use tracing::{info, warn};

use crate::hud::Hud;

/// Terminal race HUD built on kart-ui
#[derive(Parser, Debug)]
#[command(name = "kart-hud")]
#[command(about = "A terminal race HUD demonstrating kart-ui")]
struct Args {
    /// UI config file (JSON). Defaults to <config dir>/kart-hud/ui.json when present
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Where to write the log
    #[arg(long, default_value = "kart-hud.log")]
    log: PathBuf,

    /// Target frames per second
    #[arg(long, default_value = "60")]
    fps: u32,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("kart-hud").join("ui.json"))
        .filter(|path| path.exists())
}

/// Terminal defaults with the config file, if any, layered on top
fn load_config(explicit: Option<PathBuf>) -> UiConfig {
    let base = term::cell_config();
    let Some(path) = explicit.or_else(default_config_path) else {
        return base;
    };
    match base.overlay_file(&path) {
        Ok(config) => {
            info!(path = %path.display(), "loaded UI config");
            config
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring UI config");
            base
        }
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    logging::init_logging(&args.log)?;

    let config = load_config(args.config);
    let clipboard = SystemClipboard::new(config.clipboard_timeout);
    let mut ui = UiRoot::with_config(Size::new(80, 24), CellMetrics, config).with_clipboard(clipboard);
    let mut hud = Hud::new(&mut ui).map_err(io::Error::other)?;

    let runtime = RuntimeConfig {
        frame: Duration::from_secs_f64(1.0 / args.fps.max(1) as f64),
        ..RuntimeConfig::default()
    };

    // ===== Terminal setup =====
    let mut terminal = term::enter()?;

    let result = term::run(&mut terminal, &mut ui, runtime, |ui, events, frame| {
        hud.on_frame(ui, events, frame)
    })
    .await;

    // ===== Cleanup =====
    term::leave(&mut terminal)?;
    info!("bye");

    result
}
