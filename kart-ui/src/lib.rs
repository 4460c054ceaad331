//! kart-ui: a retained-mode UI toolkit for real-time game loops
//!
//! Build a tree of components, lay them out with anchors and stack panels,
//! and let the UI root feed them input once per frame. Dialogs are awaitable.
//!
//! # Example
//! ```ignore
//! use kart_ui::prelude::*;
//!
//! let mut ui = UiRoot::new(Size::new(1280, 720), MonospaceMetrics::default());
//! let tree = ui.tree_mut();
//! let panel = tree.insert_panel();
//! tree.create_dialog(panel, "Leave the race?", HorizontalAnchor::Center, false, &[])?;
//! let handle = tree.show_as_dialog(panel)?;
//!
//! // each frame
//! ui.update(delta, &mut device);
//! ui.draw(&mut surface);
//!
//! if handle.await == DialogResult::Accepted { /* ... */ }
//! ```
//!
//! Enable the `term` feature for a terminal host built on ratatui and
//! crossterm.

// Re-export everything from core
pub use kart_ui_core::*;

/// Terminal host: ratatui surface, crossterm input, system clipboard
#[cfg(feature = "term")]
pub use kart_ui_term as term;

/// Prelude for convenient imports
pub mod prelude {
    pub use kart_ui_core::prelude::*;

    // Layout
    pub use kart_ui_core::{AUTO, Button, StackPanel, TextBox, Widget};

    // Theming
    pub use kart_ui_core::{DialogConfig, Theme};

    #[cfg(feature = "term")]
    pub use kart_ui_term::{BufferSurface, CellMetrics, Control, SystemClipboard, TerminalInput};
}
