//! Folding terminal events into per-frame device state
//!
//! Terminals report key presses but (without keyboard enhancement) never
//! releases, so each press becomes a short tap followed by a frame with
//! nothing held. Button transitions are queued the same way so a fast click
//! still shows its down frame and its release frame to the broadcaster.
//!
//! Text boxes only read Backspace, Delete and the arrows when their repeat
//! gate opens, so those taps are held for [`REPEAT_HOLD_FRAMES`] samples.
//! At 16ms frames and the default 70ms gate that meets exactly one opening.

use std::collections::VecDeque;
use std::time::Duration;

use crossterm::event::{KeyEvent, KeyEventKind, MouseButton, MouseEventKind};
use kart_ui_core::{modifier_keys, DeviceState, InputSource, KeyCode, ModifierKeyCode, Point};

use crate::event::RawEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    Tap(Vec<KeyCode>),
    Pointer(Point),
    Button(MouseButton, bool),
}

/// Samples a repeat-gated key stays held
pub const REPEAT_HOLD_FRAMES: usize = 5;

/// Samples between two openings of a text box's repeat gate at a fixed
/// frame step. Holding a key that long meets exactly one opening.
pub fn repeat_hold_frames(key_repeat: Duration, frame: Duration) -> usize {
    (key_repeat.as_nanos() / frame.as_nanos().max(1)) as usize + 1
}

#[derive(Debug)]
pub struct TerminalInput {
    state: DeviceState,
    pending: VecDeque<Pending>,
    /// Tap in progress and the samples it has left after this one
    held: Option<(Vec<KeyCode>, usize)>,
    repeat_hold: usize,
}

impl Default for TerminalInput {
    fn default() -> Self {
        Self {
            state: DeviceState::default(),
            pending: VecDeque::new(),
            held: None,
            repeat_hold: REPEAT_HOLD_FRAMES,
        }
    }
}

impl TerminalInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold repeat-gated keys for `frames` samples instead; match this to
    /// the frame time and `key_repeat` in use
    pub fn with_repeat_hold(mut self, frames: usize) -> Self {
        self.repeat_hold = frames.max(1);
        self
    }

    /// Queue a terminal event for upcoming frames. Resizes are ignored.
    pub fn push(&mut self, raw: &RawEvent) {
        match raw {
            RawEvent::Key(key) if key.kind != KeyEventKind::Release => {
                self.pending.push_back(Pending::Tap(chord(key)));
            }
            RawEvent::Mouse(mouse) => {
                let at = Point::new(mouse.column as i32, mouse.row as i32);
                match mouse.kind {
                    MouseEventKind::Down(button) => {
                        self.pending.push_back(Pending::Pointer(at));
                        self.pending.push_back(Pending::Button(button, true));
                    }
                    MouseEventKind::Up(button) => {
                        self.pending.push_back(Pending::Pointer(at));
                        self.pending.push_back(Pending::Button(button, false));
                    }
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        self.pending.push_back(Pending::Pointer(at));
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    /// Nothing left to replay
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.held.is_none()
    }
}

impl InputSource for TerminalInput {
    fn device_state(&mut self) -> DeviceState {
        if let Some((keys, remaining)) = self.held.as_mut() {
            if *remaining > 0 {
                *remaining -= 1;
                return DeviceState {
                    keys: keys.clone(),
                    ..self.state.clone()
                };
            }
            self.held = None;
            return self.state.clone();
        }
        while let Some(next) = self.pending.pop_front() {
            match next {
                Pending::Pointer(at) => self.state.pointer = at,
                Pending::Button(button, down) => {
                    let held = match button {
                        MouseButton::Left => &mut self.state.left_down,
                        MouseButton::Right => &mut self.state.right_down,
                        MouseButton::Middle => continue,
                    };
                    if *held != down {
                        *held = down;
                        return self.state.clone();
                    }
                }
                Pending::Tap(keys) => {
                    let frames = if keys.iter().any(is_repeat_gated) {
                        self.repeat_hold
                    } else {
                        1
                    };
                    self.held = Some((keys.clone(), frames - 1));
                    return DeviceState {
                        keys,
                        ..self.state.clone()
                    };
                }
            }
        }
        self.state.clone()
    }
}

fn is_repeat_gated(key: &KeyCode) -> bool {
    matches!(
        key,
        KeyCode::Backspace | KeyCode::Delete | KeyCode::Left | KeyCode::Right
    )
}

/// Keys held for one press: modifiers first, then the key itself
fn chord(key: &KeyEvent) -> Vec<KeyCode> {
    let mut keys = modifier_keys(key.modifiers);
    let shift = KeyCode::Modifier(ModifierKeyCode::LeftShift);
    if matches!(key.code, KeyCode::Char(c) if c.is_ascii_uppercase()) && !keys.contains(&shift) {
        keys.push(shift);
    }
    keys.push(key.code);
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> RawEvent {
        RawEvent::Key(KeyEvent::new(code, modifiers))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> RawEvent {
        RawEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_key_press_is_a_one_frame_tap() {
        let mut input = TerminalInput::new();
        input.push(&key(KeyCode::Char('a'), KeyModifiers::NONE));

        assert_eq!(input.device_state().keys, vec![KeyCode::Char('a')]);
        assert!(input.device_state().keys.is_empty());
        assert!(input.is_idle());
    }

    #[test]
    fn test_repeated_key_gets_release_frames_between() {
        let mut input = TerminalInput::new();
        input.push(&key(KeyCode::Char('l'), KeyModifiers::NONE));
        input.push(&key(KeyCode::Char('l'), KeyModifiers::NONE));

        let frames: Vec<usize> = (0..4).map(|_| input.device_state().keys.len()).collect();
        assert_eq!(frames, vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_repeat_gated_keys_are_held_longer() {
        let mut input = TerminalInput::new();
        input.push(&key(KeyCode::Backspace, KeyModifiers::NONE));

        for _ in 0..REPEAT_HOLD_FRAMES {
            assert_eq!(input.device_state().keys, vec![KeyCode::Backspace]);
        }
        assert!(input.device_state().keys.is_empty());
        assert!(input.is_idle());
    }

    #[test]
    fn test_repeat_hold_frames() {
        let ms = Duration::from_millis;
        assert_eq!(repeat_hold_frames(ms(70), ms(16)), REPEAT_HOLD_FRAMES);
        assert_eq!(repeat_hold_frames(ms(64), ms(16)), 5);
        assert_eq!(repeat_hold_frames(ms(70), ms(33)), 3);
    }

    #[test]
    fn test_custom_repeat_hold() {
        let mut input = TerminalInput::new().with_repeat_hold(2);
        input.push(&key(KeyCode::Left, KeyModifiers::NONE));

        let frames: Vec<usize> = (0..3).map(|_| input.device_state().keys.len()).collect();
        assert_eq!(frames, vec![1, 1, 0]);
    }

    #[test]
    fn test_ctrl_v_chord() {
        let mut input = TerminalInput::new();
        input.push(&key(KeyCode::Char('v'), KeyModifiers::CONTROL));

        let state = input.device_state();
        assert!(state.ctrl_down());
        assert_eq!(state.keys.len(), 2);
    }

    #[test]
    fn test_uppercase_char_implies_shift() {
        let mut input = TerminalInput::new();
        input.push(&key(KeyCode::Char('Q'), KeyModifiers::NONE));
        input.push(&key(KeyCode::Char('W'), KeyModifiers::SHIFT));

        let first = input.device_state();
        assert!(first.shift_down());
        input.device_state();
        let second = input.device_state();
        // SHIFT reported explicitly is not doubled
        assert_eq!(second.keys.len(), 2);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut input = TerminalInput::new();
        let mut released = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        released.kind = KeyEventKind::Release;
        input.push(&RawEvent::Key(released));
        assert!(input.is_idle());
    }

    #[test]
    fn test_fast_click_spans_two_frames() {
        let mut input = TerminalInput::new();
        input.push(&mouse(MouseEventKind::Down(MouseButton::Left), 5, 3));
        input.push(&mouse(MouseEventKind::Up(MouseButton::Left), 5, 3));

        let down = input.device_state();
        assert!(down.left_down);
        assert_eq!(down.pointer, Point::new(5, 3));

        let up = input.device_state();
        assert!(!up.left_down);
        assert!(input.is_idle());
    }

    #[test]
    fn test_moves_coalesce_into_one_frame() {
        let mut input = TerminalInput::new();
        input.push(&mouse(MouseEventKind::Moved, 1, 1));
        input.push(&mouse(MouseEventKind::Moved, 9, 4));

        assert_eq!(input.device_state().pointer, Point::new(9, 4));
    }

    #[test]
    fn test_middle_button_ignored() {
        let mut input = TerminalInput::new();
        input.push(&mouse(MouseEventKind::Down(MouseButton::Middle), 2, 2));

        let state = input.device_state();
        assert!(!state.left_down && !state.right_down);
        assert_eq!(state.pointer, Point::new(2, 2));
    }
}
