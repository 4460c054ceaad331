//! Single-line text entry
//!
//! Editing runs on two paths. Typing arrives through the per-frame input
//! broadcast (press edges only), while Backspace, Delete and the arrow keys
//! are read from the held-key state on the update path, gated by the key
//! repeat interval so holding them repeats.

use std::time::Duration;

use crossterm::event::KeyCode;
use tracing::debug;

use crate::clipboard::Clipboard;
use crate::color::Rgba;
use crate::config::{UiConfig, WidgetColors};
use crate::font::{Font, FontMetrics};
use crate::geometry::{Point, Rect};
use crate::input::{is_shift, DeviceState, InputEvent};
use crate::surface::Surface;

/// Width of the caret bar
const CARET_WIDTH: i32 = 2;

/// What a broadcast did to the text box
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TextBoxSignal {
    Accepted(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    text: String,
    /// Caret position in chars
    caret: usize,
    active: bool,
    mouse_over: bool,
    caret_visible: bool,
    upper_case: bool,
    paste_latched: bool,
    can_repeat: bool,
    since_repeat: Duration,
    since_blink: Duration,
    pub colors: WidgetColors,
    pub font: Font,
}

impl TextBox {
    pub fn new(text: impl Into<String>, colors: WidgetColors) -> Self {
        Self {
            text: text.into(),
            caret: 0,
            active: false,
            mouse_over: false,
            caret_visible: true,
            upper_case: false,
            paste_latched: false,
            can_repeat: true,
            since_repeat: Duration::ZERO,
            since_blink: Duration::ZERO,
            colors,
            font: Font::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text, keeping the caret inside it
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.clamp_caret();
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn set_caret(&mut self, caret: usize) {
        self.caret = caret;
        self.clamp_caret();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_mouse_over(&self) -> bool {
        self.mouse_over
    }

    pub fn is_caret_visible(&self) -> bool {
        self.caret_visible
    }

    pub fn is_upper_case(&self) -> bool {
        self.upper_case
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn clamp_caret(&mut self) {
        self.caret = self.caret.min(self.char_count());
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn insert_str(&mut self, s: &str) {
        let at = self.byte_index(self.caret);
        self.text.insert_str(at, s);
        self.caret += s.chars().count();
    }

    fn delete_before(&mut self) {
        if self.caret == 0 {
            return;
        }
        let at = self.byte_index(self.caret - 1);
        self.text.remove(at);
        self.caret -= 1;
    }

    fn delete_at(&mut self) {
        if self.caret >= self.char_count() {
            return;
        }
        let at = self.byte_index(self.caret);
        self.text.remove(at);
    }

    fn cased(&self, c: char) -> char {
        if self.upper_case {
            c.to_ascii_uppercase()
        } else {
            c.to_ascii_lowercase()
        }
    }

    /// Handle the frame's broadcast
    pub(crate) fn handle_input(&mut self, destination: Rect, event: &InputEvent, device: &DeviceState) -> Option<TextBoxSignal> {
        self.mouse_over = destination.contains(device.pointer);
        if event.left_click {
            self.active = self.mouse_over;
        }
        if !self.active || self.paste_latched || device.ctrl_down() {
            return None;
        }

        self.upper_case = device.caps_lock != device.shift_down();
        for key in &event.pressed_keys {
            match key {
                KeyCode::Up => self.caret = self.char_count(),
                KeyCode::Down => self.caret = 0,
                KeyCode::Enter => return Some(TextBoxSignal::Accepted(self.text.clone())),
                KeyCode::Char(c) => {
                    if let Some(c) = printable(*c) {
                        let c = self.cased(c);
                        self.insert_str(c.encode_utf8(&mut [0; 4]));
                    }
                }
                // Backspace, Delete, arrows and Shift belong to the repeat path
                _ => {}
            }
        }
        None
    }

    /// Per-frame timers, repeat keys and paste
    pub(crate) fn tick(&mut self, destination: Rect, delta: Duration, device: &DeviceState, clipboard: &mut dyn Clipboard, config: &UiConfig) {
        self.mouse_over = destination.contains(device.pointer);

        if self.can_repeat && self.active && !self.paste_latched {
            self.upper_case = device.caps_lock;
            for key in &device.keys {
                match key {
                    KeyCode::Backspace => self.delete_before(),
                    KeyCode::Delete => self.delete_at(),
                    KeyCode::Left => self.caret = self.caret.saturating_sub(1),
                    KeyCode::Right => self.caret = (self.caret + 1).min(self.char_count()),
                    k if is_shift(k) => self.upper_case = !self.upper_case,
                    _ => {}
                }
            }
            self.can_repeat = false;
        }

        if self.active && is_paste_chord(device) {
            if !self.paste_latched {
                let pasted = clipboard.read_text();
                debug!(chars = pasted.chars().count(), "paste");
                self.insert_str(&pasted);
                self.paste_latched = true;
            }
        } else {
            self.paste_latched = false;
        }
        self.clamp_caret();

        if !self.can_repeat {
            self.since_repeat += delta;
            if self.since_repeat > config.key_repeat {
                self.can_repeat = true;
                self.since_repeat = Duration::ZERO;
            }
        }

        self.since_blink += delta;
        if !self.active {
            self.caret_visible = false;
        } else if self.since_blink > config.caret_blink {
            self.caret_visible = !self.caret_visible;
            self.since_blink = Duration::ZERO;
        }
    }

    pub fn fill_color(&self) -> Rgba {
        if self.active {
            self.colors.active
        } else if self.mouse_over {
            self.colors.highlight
        } else {
            self.colors.background
        }
    }

    pub(crate) fn draw(&self, destination: Rect, surface: &mut dyn Surface, metrics: &dyn FontMetrics) {
        surface.fill_rect(destination, self.fill_color());

        let prefix = &self.text[..self.byte_index(self.caret)];
        let caret_x = metrics.measure(self.font, prefix).width;
        let text = metrics.measure_or_glyph(self.font, &self.text);
        let gutter = destination.height - text.height;
        let top = destination.y + destination.height / 2 - text.height / 2;

        if !self.text.is_empty() {
            surface.draw_string(
                self.font,
                &self.text,
                Point::new(destination.x + gutter, top),
                self.colors.foreground,
            );
        }
        if self.caret_visible {
            surface.fill_rect(
                Rect::new(destination.x + gutter + caret_x, top, CARET_WIDTH, text.height),
                self.colors.foreground,
            );
        }
    }
}

/// Keys that type a character
fn printable(c: char) -> Option<char> {
    (c.is_ascii_alphanumeric() || c == ' ' || c == '.').then_some(c)
}

/// Exactly Ctrl and V held
fn is_paste_chord(device: &DeviceState) -> bool {
    device.keys.len() == 2
        && device.ctrl_down()
        && device.keys.iter().any(|k| matches!(k, KeyCode::Char('v' | 'V')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::MonospaceMetrics;
    use crossterm::event::ModifierKeyCode;

    struct Fixed(&'static str);

    impl Clipboard for Fixed {
        fn read_text(&mut self) -> String {
            self.0.to_string()
        }
    }

    const DEST: Rect = Rect::new(0, 0, 200, 40);
    const FRAME: Duration = Duration::from_millis(16);

    fn colors() -> WidgetColors {
        WidgetColors::new(Rgba::BLACK, Rgba::WHITE, Rgba::GRAY, Rgba::RED)
    }

    fn active(text: &str) -> TextBox {
        let mut tb = TextBox::new(text, colors());
        tb.set_active(true);
        tb
    }

    fn press(keys: &[KeyCode]) -> InputEvent {
        InputEvent {
            pressed_keys: keys.to_vec(),
            ..Default::default()
        }
    }

    fn holding(keys: &[KeyCode]) -> DeviceState {
        DeviceState {
            keys: keys.to_vec(),
            ..Default::default()
        }
    }

    const CTRL: KeyCode = KeyCode::Modifier(ModifierKeyCode::LeftControl);
    const SHIFT: KeyCode = KeyCode::Modifier(ModifierKeyCode::LeftShift);

    #[test]
    fn test_typing_inserts_at_caret() {
        let mut tb = active("");
        let device = DeviceState::default();
        tb.handle_input(DEST, &press(&[KeyCode::Char('a'), KeyCode::Char('b')]), &device);
        assert_eq!(tb.text(), "ab");
        assert_eq!(tb.caret(), 2);

        tb.handle_input(DEST, &press(&[KeyCode::Down]), &device);
        tb.handle_input(DEST, &press(&[KeyCode::Char('z')]), &device);
        assert_eq!(tb.text(), "zab");
        assert_eq!(tb.caret(), 1);

        tb.handle_input(DEST, &press(&[KeyCode::Up]), &device);
        assert_eq!(tb.caret(), 3);
    }

    #[test]
    fn test_unprintable_keys_are_ignored() {
        let mut tb = active("");
        tb.handle_input(
            DEST,
            &press(&[KeyCode::Char('!'), KeyCode::Tab, KeyCode::Char(' '), KeyCode::Char('.')]),
            &DeviceState::default(),
        );
        assert_eq!(tb.text(), " .");
    }

    #[test]
    fn test_inactive_box_ignores_typing() {
        let mut tb = TextBox::new("", colors());
        tb.handle_input(DEST, &press(&[KeyCode::Char('a')]), &DeviceState::default());
        assert_eq!(tb.text(), "");
    }

    #[test]
    fn test_click_activates_only_when_hovered() {
        let mut tb = TextBox::new("", colors());
        let click = InputEvent {
            left_click: true,
            ..Default::default()
        };
        let inside = DeviceState {
            pointer: Point::new(5, 5),
            ..Default::default()
        };
        tb.handle_input(DEST, &click, &inside);
        assert!(tb.is_active());

        let outside = DeviceState {
            pointer: Point::new(500, 5),
            ..Default::default()
        };
        tb.handle_input(DEST, &click, &outside);
        assert!(!tb.is_active());
    }

    #[test]
    fn test_enter_accepts() {
        let mut tb = active("go");
        let signal = tb.handle_input(DEST, &press(&[KeyCode::Enter]), &DeviceState::default());
        assert_eq!(signal, Some(TextBoxSignal::Accepted("go".into())));
    }

    #[test]
    fn test_shift_and_caps_select_case() {
        let mut tb = active("");
        tb.handle_input(DEST, &press(&[SHIFT, KeyCode::Char('a')]), &holding(&[SHIFT, KeyCode::Char('a')]));
        let caps = DeviceState {
            caps_lock: true,
            ..Default::default()
        };
        tb.handle_input(DEST, &press(&[KeyCode::Char('b')]), &caps);
        tb.handle_input(DEST, &press(&[KeyCode::Char('c')]), &DeviceState::default());
        assert_eq!(tb.text(), "ABc");
        assert!(!tb.is_upper_case());
    }

    #[test]
    fn test_held_shift_sets_upper_case_on_repeat() {
        let config = UiConfig::default();
        let mut tb = active("");
        assert!(!tb.is_upper_case());

        tb.tick(DEST, FRAME, &holding(&[SHIFT]), &mut Fixed(""), &config);
        assert!(tb.is_upper_case());

        // nothing changes until the gate reopens after 70ms
        for _ in 0..4 {
            tb.tick(DEST, FRAME, &DeviceState::default(), &mut Fixed(""), &config);
            assert!(tb.is_upper_case());
        }
        // caps lock with shift held flips back to lower case
        let caps_and_shift = DeviceState {
            keys: vec![SHIFT],
            caps_lock: true,
            ..Default::default()
        };
        tb.tick(DEST, FRAME, &caps_and_shift, &mut Fixed(""), &config);
        assert!(!tb.is_upper_case());
    }

    #[test]
    fn test_backspace_repeats_on_interval() {
        let config = UiConfig::default();
        let mut tb = active("abcdef");
        tb.set_caret(6);
        let device = holding(&[KeyCode::Backspace]);

        tb.tick(DEST, FRAME, &device, &mut Fixed(""), &config);
        assert_eq!(tb.text(), "abcde");

        // gate closed for the repeat interval
        for _ in 0..3 {
            tb.tick(DEST, FRAME, &device, &mut Fixed(""), &config);
        }
        assert_eq!(tb.text(), "abcde");

        // the fifth frame crosses 70ms and reopens the gate
        tb.tick(DEST, FRAME, &device, &mut Fixed(""), &config);
        assert_eq!(tb.text(), "abcde");
        tb.tick(DEST, FRAME, &device, &mut Fixed(""), &config);
        assert_eq!(tb.text(), "abcd");
    }

    #[test]
    fn test_delete_and_arrows() {
        let config = UiConfig::default();
        let mut tb = active("abc");
        tb.set_caret(1);
        let slow = Duration::from_millis(100);

        tb.tick(DEST, slow, &holding(&[KeyCode::Delete]), &mut Fixed(""), &config);
        assert_eq!(tb.text(), "ac");
        assert_eq!(tb.caret(), 1);

        tb.tick(DEST, slow, &holding(&[KeyCode::Right]), &mut Fixed(""), &config);
        assert_eq!(tb.caret(), 2);
        tb.tick(DEST, slow, &holding(&[KeyCode::Right]), &mut Fixed(""), &config);
        assert_eq!(tb.caret(), 2);

        tb.tick(DEST, slow, &holding(&[KeyCode::Left]), &mut Fixed(""), &config);
        tb.tick(DEST, slow, &holding(&[KeyCode::Left]), &mut Fixed(""), &config);
        tb.tick(DEST, slow, &holding(&[KeyCode::Left]), &mut Fixed(""), &config);
        assert_eq!(tb.caret(), 0);
        tb.tick(DEST, slow, &holding(&[KeyCode::Backspace]), &mut Fixed(""), &config);
        assert_eq!(tb.text(), "ac");
    }

    #[test]
    fn test_paste_fires_once_per_chord() {
        let config = UiConfig::default();
        let mut tb = active("x");
        tb.set_caret(1);
        let chord = holding(&[CTRL, KeyCode::Char('v')]);

        tb.tick(DEST, FRAME, &chord, &mut Fixed("yz"), &config);
        tb.tick(DEST, FRAME, &chord, &mut Fixed("yz"), &config);
        assert_eq!(tb.text(), "xyz");
        assert_eq!(tb.caret(), 3);

        // typing is suppressed while the chord is latched
        tb.handle_input(DEST, &press(&[KeyCode::Char('q')]), &chord);
        assert_eq!(tb.text(), "xyz");

        tb.tick(DEST, FRAME, &DeviceState::default(), &mut Fixed("yz"), &config);
        tb.tick(DEST, FRAME, &chord, &mut Fixed("yz"), &config);
        assert_eq!(tb.text(), "xyzyz");
    }

    #[test]
    fn test_paste_needs_exact_chord() {
        let config = UiConfig::default();
        let mut tb = active("");
        tb.tick(DEST, FRAME, &holding(&[CTRL, SHIFT, KeyCode::Char('v')]), &mut Fixed("no"), &config);
        tb.tick(DEST, FRAME, &holding(&[KeyCode::Char('v')]), &mut Fixed("no"), &config);
        assert_eq!(tb.text(), "");
    }

    #[test]
    fn test_caret_blinks_only_while_active() {
        let config = UiConfig::default();
        let mut tb = TextBox::new("", colors());
        let idle = DeviceState::default();

        tb.tick(DEST, FRAME, &idle, &mut Fixed(""), &config);
        assert!(!tb.is_caret_visible());

        tb.set_active(true);
        tb.tick(DEST, Duration::from_millis(800), &idle, &mut Fixed(""), &config);
        assert!(tb.is_caret_visible());
        tb.tick(DEST, Duration::from_millis(800), &idle, &mut Fixed(""), &config);
        assert!(!tb.is_caret_visible());
    }

    #[test]
    fn test_set_text_clamps_caret() {
        let mut tb = active("hello");
        tb.set_caret(5);
        tb.set_text("hi");
        assert_eq!(tb.caret(), 2);
        tb.set_caret(99);
        assert_eq!(tb.caret(), 2);
    }

    #[test]
    fn test_draw_places_caret_after_prefix() {
        struct Calls(Vec<Rect>, Vec<Point>);
        impl Surface for Calls {
            fn fill_rect(&mut self, rect: Rect, _: Rgba) {
                self.0.push(rect);
            }
            fn draw_texture(&mut self, _: crate::surface::TextureId, _: Rect, _: Rgba) {}
            fn draw_string(&mut self, _: Font, _: &str, at: Point, _: Rgba) {
                self.1.push(at);
            }
        }

        let mut tb = active("abc");
        tb.set_caret(2);
        let mut calls = Calls(Vec::new(), Vec::new());
        // 12pt monospace: 6 wide, 14 tall
        tb.draw(DEST, &mut calls, &MonospaceMetrics::default());

        let gutter = 40 - 14;
        let top = 20 - 7;
        assert_eq!(calls.0[0], DEST);
        assert_eq!(calls.1[0], Point::new(gutter, top));
        assert_eq!(calls.0[1], Rect::new(gutter + 12, top, 2, 14));
    }
}
