//! Background crossterm polling

use std::time::Duration;

use crossterm::event::{self, KeyEvent, MouseEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Terminal events the frame loop cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

impl RawEvent {
    /// Map a crossterm event; focus and paste events are dropped
    pub fn from_crossterm(evt: event::Event) -> Option<Self> {
        match evt {
            event::Event::Key(key) => Some(RawEvent::Key(key)),
            event::Event::Mouse(mouse) => Some(RawEvent::Mouse(mouse)),
            event::Event::Resize(w, h) => Some(RawEvent::Resize(w, h)),
            _ => None,
        }
    }
}

/// How often and how much the poller reads from crossterm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    /// Wait per `crossterm::event::poll` call
    pub poll_timeout: Duration,
    /// Pause between read rounds
    pub loop_sleep: Duration,
    /// Events forwarded per round at most, so a flood of mouse moves cannot
    /// starve cancellation
    pub max_batch: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(10),
            loop_sleep: Duration::from_millis(16),
            max_batch: 20,
        }
    }
}

/// Whether the poller should keep going after a read round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Round {
    More,
    ReceiverGone,
}

/// Forward up to `max_batch` ready events
fn read_round(tx: &mpsc::UnboundedSender<RawEvent>, config: &PollerConfig) -> Round {
    for _ in 0..config.max_batch {
        if !event::poll(config.poll_timeout).unwrap_or(false) {
            break;
        }
        let Some(raw) = event::read().ok().and_then(RawEvent::from_crossterm) else {
            continue;
        };
        if tx.send(raw).is_err() {
            return Round::ReceiverGone;
        }
    }
    Round::More
}

/// Drop whatever crossterm still has queued so it does not leak into the
/// shell after the UI exits
fn discard_pending() -> usize {
    let mut dropped = 0;
    while event::poll(Duration::ZERO).unwrap_or(false) {
        if event::read().is_err() {
            break;
        }
        dropped += 1;
    }
    dropped
}

/// Read terminal events on a tokio task and forward them until `cancel`
/// fires or the receiver is dropped
pub fn spawn_event_poller(
    tx: mpsc::UnboundedSender<RawEvent>,
    config: PollerConfig,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    let dropped = discard_pending();
                    info!(dropped, "event poller stopped");
                    return;
                }
                _ = tokio::time::sleep(config.loop_sleep) => {
                    if read_round(&tx, &config) == Round::ReceiverGone {
                        debug!("event receiver dropped, poller stopping");
                        return;
                    }
                }
            }
        }
    })
}
