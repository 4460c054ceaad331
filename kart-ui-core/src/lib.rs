//! Core types for kart-ui
//!
//! A retained-mode UI layer for a game loop. The host owns the window and
//! calls [`UiRoot::update`] and [`UiRoot::draw`] once per frame; everything in
//! between lives in a [`UiTree`] arena.
//!
//! # Core Concepts
//!
//! - **Component**: position, size, anchors and render payload of a node
//! - **UiTree**: arena of nodes; attach, detach and geometry mutation
//! - **StackPanel**: vertical container that reflows its children
//! - **Button** / **TextBox**: interactive widgets fed by the input broadcast
//! - **Dialogs**: stack panels shown as modal overlays with an awaitable result
//! - **UiRoot**: per-frame driver, modal dimming and notifications
//!
//! Rendering and text measurement are seams ([`Surface`], [`FontMetrics`]) so
//! the same tree can draw into a game renderer or a terminal buffer.
//!
//! # Example
//!
//! ```ignore
//! use kart_ui_core::prelude::*;
//!
//! let mut ui = UiRoot::new(Size::new(1280, 720), MonospaceMetrics::default());
//! let tree = ui.tree_mut();
//! let name = tree.insert_text_box("", tree.config().theme.text_box,
//!     Rect::new(10, 10, 300, 40), HorizontalAnchor::None);
//! let panel = tree.insert_panel();
//! tree.create_dialog(panel, "Driver name", HorizontalAnchor::Left, true, &[name])?;
//! let handle = tree.show_as_dialog(panel)?;
//!
//! // in the frame loop
//! ui.update(delta, &mut device);
//! ui.draw(&mut surface);
//! for event in ui.drain_events() { /* ... */ }
//!
//! // elsewhere
//! let result = handle.await;
//! ```

pub mod button;
pub mod clipboard;
pub mod color;
pub mod component;
pub mod config;
pub mod dialog;
pub mod error;
pub mod event;
pub mod font;
pub mod frame_counter;
pub mod geometry;
pub mod input;
pub mod keys;
mod layout;
mod render;
pub mod root;
pub mod stack_panel;
pub mod surface;
pub mod testing;
pub mod text_box;
pub mod tree;

pub use button::Button;
pub use clipboard::{read_with_timeout, Clipboard, NoClipboard};
pub use color::{ParseColorError, Rgba};
pub use component::{Availability, AutoSize, Component, HorizontalAnchor, Render, VerticalAnchor};
pub use config::{DialogConfig, Theme, UiConfig, WidgetColors};
pub use dialog::{DialogHandle, DialogResult};
pub use error::{ConfigError, UiError};
pub use event::{UiEvent, UiEventKind};
pub use font::{Font, FontMetrics, FontStyle, MonospaceMetrics, DEFAULT_FONT_SIZE};
pub use frame_counter::FrameCounter;
pub use geometry::{Point, Rect, Size, AUTO};
pub use input::{DeviceState, InputBroadcaster, InputEvent, InputSource};
pub use keys::{format_chord, format_key, modifier_keys, parse_chord, parse_key_name};
pub use root::UiRoot;
pub use stack_panel::StackPanel;
pub use surface::{Surface, TextureId};
pub use text_box::TextBox;
pub use tree::{Node, NodeId, UiTree, Widget};

// Re-export the key type widgets are driven by
pub use crossterm::event::{KeyCode, ModifierKeyCode};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Availability, AutoSize, Clipboard, Component, DeviceState, DialogHandle, DialogResult,
        Font, FontMetrics, FrameCounter, HorizontalAnchor, InputSource, KeyCode,
        MonospaceMetrics, NodeId, Point, Rect, Rgba, Size, Surface, TextureId, UiConfig, UiError,
        UiEvent, UiEventKind, UiRoot, UiTree, VerticalAnchor, WidgetColors,
    };
}
