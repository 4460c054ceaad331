//! Test utilities for kart-ui
//!
//! - [`keys`]: held keys from a chord string (e.g. `keys("ctrl+v")`)
//! - [`holding`] / [`pointer_at`]: device state builders
//! - [`RecordingSurface`]: a [`Surface`] that records every draw call
//! - [`FakeClipboard`]: an in-memory clipboard that counts reads
//! - [`FrameDriver`]: scripted frames (move, press, click) against a [`UiRoot`]
//! - Assertion macros for raised [`UiEvent`]s
//!
//! # Example
//!
//! ```ignore
//! use kart_ui_core::testing::FrameDriver;
//! use kart_ui_core::assert_ui_event;
//!
//! let mut driver = FrameDriver::new(root);
//! driver.click_at(Point::new(400, 300));
//! let events = driver.drain_events();
//! assert_ui_event!(events, UiEventKind::Clicked);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::event::KeyCode;

use crate::clipboard::Clipboard;
use crate::color::Rgba;
use crate::event::UiEvent;
use crate::font::Font;
use crate::geometry::{Point, Rect};
use crate::input::DeviceState;
use crate::keys::{parse_chord, parse_key_name};
use crate::root::UiRoot;
use crate::surface::{Surface, TextureId};
use crate::tree::UiTree;

/// Default frame step: roughly 60 frames per second
pub const FRAME: Duration = Duration::from_millis(16);

/// Parse a key name.
///
/// # Panics
///
/// Panics if the name cannot be parsed.
pub fn key(name: &str) -> KeyCode {
    parse_key_name(name).unwrap_or_else(|| panic!("Invalid key name: {:?}", name))
}

/// Parse a chord into held keys.
///
/// # Panics
///
/// Panics if the chord cannot be parsed.
pub fn keys(chord: &str) -> Vec<KeyCode> {
    parse_chord(chord).unwrap_or_else(|| panic!("Invalid key chord: {:?}", chord))
}

/// A device state holding `chord`
pub fn holding(chord: &str) -> DeviceState {
    DeviceState {
        keys: keys(chord),
        ..Default::default()
    }
}

/// A device state with the pointer at `(x, y)` and nothing held
pub fn pointer_at(x: i32, y: i32) -> DeviceState {
    DeviceState {
        pointer: Point::new(x, y),
        ..Default::default()
    }
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Begin,
    End,
    Fill { rect: Rect, color: Rgba },
    Texture { texture: TextureId, rect: Rect, tint: Rgba },
    Text { font: Font, text: String, at: Point, color: Rgba },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Drawn strings in order
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Where `text` was drawn, if it was
    pub fn text_at(&self, text: &str) -> Option<Point> {
        self.calls.iter().find_map(|c| match c {
            DrawCall::Text { text: t, at, .. } if t == text => Some(*at),
            _ => None,
        })
    }

    pub fn fills(&self) -> Vec<(Rect, Rgba)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Fill { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    /// Index of the first call matching `pred`
    pub fn position(&self, pred: impl Fn(&DrawCall) -> bool) -> Option<usize> {
        self.calls.iter().position(pred)
    }
}

impl Surface for RecordingSurface {
    fn begin(&mut self) {
        self.calls.push(DrawCall::Begin);
    }

    fn end(&mut self) {
        self.calls.push(DrawCall::End);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.calls.push(DrawCall::Fill { rect, color });
    }

    fn draw_texture(&mut self, texture: TextureId, rect: Rect, tint: Rgba) {
        self.calls.push(DrawCall::Texture { texture, rect, tint });
    }

    fn draw_string(&mut self, font: Font, text: &str, at: Point, color: Rgba) {
        self.calls.push(DrawCall::Text {
            font,
            text: text.to_string(),
            at,
            color,
        });
    }
}

/// Shared in-memory clipboard; clones see the same contents
#[derive(Debug, Clone, Default)]
pub struct FakeClipboard {
    text: Arc<Mutex<String>>,
    reads: Arc<AtomicUsize>,
}

impl FakeClipboard {
    pub fn new(text: impl Into<String>) -> Self {
        let clipboard = Self::default();
        clipboard.set(text);
        clipboard
    }

    pub fn set(&self, text: impl Into<String>) {
        if let Ok(mut current) = self.text.lock() {
            *current = text.into();
        }
    }

    /// Number of reads so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl Clipboard for FakeClipboard {
    fn read_text(&mut self) -> String {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.text.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

/// Drives a [`UiRoot`] through scripted frames.
///
/// Every input helper changes the simulated device and then runs one frame,
/// so edges land exactly where the script puts them.
#[derive(Debug)]
pub struct FrameDriver {
    root: UiRoot,
    device: DeviceState,
    step: Duration,
}

impl FrameDriver {
    pub fn new(root: UiRoot) -> Self {
        Self {
            root,
            device: DeviceState::default(),
            step: FRAME,
        }
    }

    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    pub fn root(&self) -> &UiRoot {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut UiRoot {
        &mut self.root
    }

    pub fn tree(&self) -> &UiTree {
        self.root.tree()
    }

    pub fn tree_mut(&mut self) -> &mut UiTree {
        self.root.tree_mut()
    }

    pub fn device(&self) -> &DeviceState {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut DeviceState {
        &mut self.device
    }

    /// Run one frame with the current device state
    pub fn frame(&mut self) {
        let step = self.step;
        self.root.update(step, &mut self.device);
    }

    /// Run frames until at least `duration` has passed
    pub fn advance(&mut self, duration: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed < duration {
            self.frame();
            elapsed += self.step;
        }
    }

    pub fn move_to(&mut self, pointer: Point) {
        self.device.pointer = pointer;
        self.frame();
    }

    /// Hold the keys of `chord` (in addition to anything already held)
    pub fn press(&mut self, chord: &str) {
        for k in keys(chord) {
            if !self.device.keys.contains(&k) {
                self.device.keys.push(k);
            }
        }
        self.frame();
    }

    pub fn release(&mut self, chord: &str) {
        let released = keys(chord);
        self.device.keys.retain(|k| !released.contains(k));
        self.frame();
    }

    pub fn release_all(&mut self) {
        self.device.keys.clear();
        self.frame();
    }

    /// Press and release `chord`
    pub fn tap(&mut self, chord: &str) {
        self.press(chord);
        self.release(chord);
    }

    /// Tap each character of `text`
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            let k = KeyCode::Char(c);
            self.device.keys.push(k);
            self.frame();
            self.device.keys.retain(|held| *held != k);
            self.frame();
        }
    }

    /// Move to `at`, press and release the left button
    pub fn click_at(&mut self, at: Point) {
        self.device.pointer = at;
        self.device.left_down = true;
        self.frame();
        self.device.left_down = false;
        self.frame();
    }

    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        self.root.drain_events()
    }

    pub fn draw(&self) -> RecordingSurface {
        let mut surface = RecordingSurface::new();
        self.root.draw(&mut surface);
        surface
    }
}

// ============================================================================
// Assertion Macros
// ============================================================================

/// Assert that an event kind matching a pattern was raised.
///
/// # Example
///
/// ```ignore
/// let events = driver.drain_events();
/// assert_ui_event!(events, UiEventKind::TextAccepted(t) if t == "mario");
/// ```
#[macro_export]
macro_rules! assert_ui_event {
    ($events:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $events.iter().any(|e| matches!(&e.kind, $pattern $(if $guard)?)),
            "Expected event matching `{}` to be raised, but got: {:?}",
            stringify!($pattern),
            $events
        );
    };
}

/// Assert that no event kind matching a pattern was raised.
#[macro_export]
macro_rules! assert_no_ui_event {
    ($events:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$events.iter().any(|e| matches!(&e.kind, $pattern $(if $guard)?)),
            "Expected no event matching `{}`, but it was raised: {:?}",
            stringify!($pattern),
            $events
        );
    };
}

/// Count events whose kind matches a pattern.
#[macro_export]
macro_rules! count_ui_events {
    ($events:expr, $pattern:pat $(if $guard:expr)?) => {
        $events
            .iter()
            .filter(|e| matches!(&e.kind, $pattern $(if $guard)?))
            .count()
    };
}
