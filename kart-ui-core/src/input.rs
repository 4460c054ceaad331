//! Frame-coalesced input broadcasting
//!
//! Once per frame the host's raw device state is diffed against the previous
//! frame. Newly pressed keys and click release edges are folded into a single
//! [`InputEvent`], which the UI root fans out to every subscribed widget.

use crossterm::event::{KeyCode, ModifierKeyCode};

use crate::geometry::Point;
use crate::tree::NodeId;

/// Raw device state sampled by the host for one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceState {
    /// Pointer position in screen units
    pub pointer: Point,
    /// Left button currently held
    pub left_down: bool,
    /// Right button currently held
    pub right_down: bool,
    /// Keys currently held, in the order the device reports them
    pub keys: Vec<KeyCode>,
    /// Caps lock engaged
    pub caps_lock: bool,
}

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_down(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    pub fn ctrl_down(&self) -> bool {
        self.keys.iter().any(is_ctrl)
    }

    pub fn shift_down(&self) -> bool {
        self.keys.iter().any(is_shift)
    }
}

/// Source of raw device state, sampled once per frame
pub trait InputSource {
    fn device_state(&mut self) -> DeviceState;
}

/// A fixed snapshot is its own source; useful for scripted frames
impl InputSource for DeviceState {
    fn device_state(&mut self) -> DeviceState {
        self.clone()
    }
}

pub(crate) fn is_ctrl(key: &KeyCode) -> bool {
    matches!(
        key,
        KeyCode::Modifier(ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl)
    )
}

pub(crate) fn is_shift(key: &KeyCode) -> bool {
    matches!(
        key,
        KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift)
    )
}

/// Input that changed this frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputEvent {
    /// Keys that went down this frame (press edge only)
    pub pressed_keys: Vec<KeyCode>,
    /// Left button went from held to released
    pub left_click: bool,
    /// Right button went from held to released
    pub right_click: bool,
}

impl InputEvent {
    pub fn is_empty(&self) -> bool {
        self.pressed_keys.is_empty() && !self.left_click && !self.right_click
    }
}

/// Edge detector plus subscriber registry
///
/// Subscribers are widget handles. They are registered when a widget is
/// attached and removed when it is detached or destroyed, so the fan-out never
/// reaches a widget that has left the tree.
#[derive(Debug, Default)]
pub struct InputBroadcaster {
    left_down: bool,
    right_down: bool,
    held: Vec<KeyCode>,
    subscribers: Vec<NodeId>,
}

impl InputBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff `device` against the previous poll.
    ///
    /// Returns `None` when nothing changed. The retained snapshot is updated
    /// on every call, whether or not an event is produced.
    pub fn poll(&mut self, device: &DeviceState) -> Option<InputEvent> {
        let left_click = self.left_down && !device.left_down;
        let right_click = self.right_down && !device.right_down;
        self.left_down = device.left_down;
        self.right_down = device.right_down;

        let mut pressed_keys = Vec::new();
        for key in &device.keys {
            if !self.held.contains(key) && !pressed_keys.contains(key) {
                pressed_keys.push(*key);
            }
        }
        self.held.clone_from(&device.keys);

        let event = InputEvent {
            pressed_keys,
            left_click,
            right_click,
        };
        (!event.is_empty()).then_some(event)
    }

    /// Register a widget for the broadcast (idempotent)
    pub fn subscribe(&mut self, node: NodeId) {
        if !self.subscribers.contains(&node) {
            self.subscribers.push(node);
        }
    }

    /// Remove a widget from the broadcast
    pub fn unsubscribe(&mut self, node: NodeId) {
        self.subscribers.retain(|n| *n != node);
    }

    pub fn is_subscribed(&self, node: NodeId) -> bool {
        self.subscribers.contains(&node)
    }

    /// Current subscribers in registration order
    pub fn subscribers(&self) -> &[NodeId] {
        &self.subscribers
    }
}
