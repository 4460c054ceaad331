//! Fixed-rate frame loop hosting a [`UiRoot`] in a terminal

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::cursor::Show;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use kart_ui_core::{Size, UiEvent, UiRoot};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::event::{spawn_event_poller, PollerConfig, RawEvent};
use crate::input::{repeat_hold_frames, TerminalInput};
use crate::surface::BufferSurface;

/// What the host wants after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Target time between frames
    pub frame: Duration,
    pub poller: PollerConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frame: Duration::from_millis(16),
            poller: PollerConfig::default(),
        }
    }
}

/// Per-frame timing handed to the host callback
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo {
    pub delta: Duration,
    pub frame: u64,
}

/// Enter raw mode on the alternate screen with mouse reporting
pub fn enter() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Undo [`enter`]
pub fn leave<B: Backend + io::Write>(terminal: &mut Terminal<B>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()
}

/// Put the terminal back without a [`Terminal`] handle, for panic hooks.
/// Every step runs even if an earlier one fails; the first error is returned.
pub fn restore() -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show);
    raw.and(screen)
}

/// Ctrl+C and Ctrl+Q leave the loop without reaching the UI
fn is_quit(raw: &RawEvent) -> bool {
    match raw {
        RawEvent::Key(key) => {
            key.kind == KeyEventKind::Press
                && key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        }
        _ => false,
    }
}

/// Run `ui` until the host callback returns [`Control::Quit`] or a quit
/// chord arrives.
///
/// Every tick samples queued input, updates the UI, hands the drained events
/// to `on_frame` and redraws.
pub async fn run<B, F>(
    terminal: &mut Terminal<B>,
    ui: &mut UiRoot,
    config: RuntimeConfig,
    mut on_frame: F,
) -> io::Result<()>
where
    B: Backend,
    F: FnMut(&mut UiRoot, Vec<UiEvent>, FrameInfo) -> Control,
{
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<RawEvent>();
    let cancel_token = CancellationToken::new();
    let poller = spawn_event_poller(event_tx, config.poller, cancel_token.clone());

    let area = terminal.size()?;
    ui.resize(Size::new(area.width as i32, area.height as i32));

    let mut input = TerminalInput::new()
        .with_repeat_hold(repeat_hold_frames(ui.config().key_repeat, config.frame));
    let mut ticker = tokio::time::interval(config.frame);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut last = Instant::now();
    let mut frame = 0u64;

    info!(frame = ?config.frame, "frame loop started");
    loop {
        tokio::select! {
            Some(raw) = event_rx.recv() => {
                if is_quit(&raw) {
                    debug!("quit chord received");
                    break;
                }
                match raw {
                    RawEvent::Resize(w, h) => ui.resize(Size::new(w as i32, h as i32)),
                    other => input.push(&other),
                }
            }

            _ = ticker.tick() => {
                let now = Instant::now();
                let delta = now - last;
                last = now;
                frame += 1;

                ui.update(delta, &mut input);
                let events = ui.drain_events();
                if on_frame(ui, events, FrameInfo { delta, frame }) == Control::Quit {
                    break;
                }

                terminal.draw(|f| {
                    let mut surface = BufferSurface::new(f.buffer_mut());
                    ui.draw(&mut surface);
                })?;
            }

            else => {
                break;
            }
        }
    }

    cancel_token.cancel();
    let _ = poller.await;
    info!(frames = frame, "frame loop stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[test]
    fn test_quit_chords() {
        let ctrl = |c| RawEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
        assert!(is_quit(&ctrl('c')));
        assert!(is_quit(&ctrl('q')));
        assert!(!is_quit(&ctrl('v')));
        assert!(!is_quit(&RawEvent::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE))));
        assert!(!is_quit(&RawEvent::Resize(1, 1)));
    }

    #[test]
    fn test_runtime_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.frame, Duration::from_millis(16));
    }
}
