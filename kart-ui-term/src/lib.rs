//! Terminal host for kart-ui
//!
//! Draws a [`UiRoot`](kart_ui_core::UiRoot) into a ratatui buffer, one cell
//! per UI unit, and feeds it crossterm keyboard and mouse input.
//!
//! - [`BufferSurface`]: [`Surface`](kart_ui_core::Surface) over a ratatui buffer
//! - [`CellMetrics`]: one cell per glyph
//! - [`TerminalInput`]: crossterm events folded into per-frame device state
//! - [`SystemClipboard`]: arboard-backed clipboard reads with a timeout
//! - [`run`]: tokio frame loop tying the above together

pub mod clipboard;
pub mod event;
pub mod input;
pub mod metrics;
pub mod runtime;
pub mod surface;

pub use clipboard::SystemClipboard;
pub use event::{spawn_event_poller, PollerConfig, RawEvent};
pub use input::{repeat_hold_frames, TerminalInput};
pub use metrics::CellMetrics;
pub use runtime::{enter, leave, restore, run, Control, FrameInfo, RuntimeConfig};
pub use surface::BufferSurface;

use kart_ui_core::{Point, Size, UiConfig};

/// Defaults scaled for a character grid: buttons one row tall, paddings of a
/// cell or two
pub fn cell_config() -> UiConfig {
    let mut config = UiConfig::default();
    config.dialog.button_size = Size::new(10, 1);
    config.dialog.text_box_height = 1;
    config.dialog.title_padding = Point::new(2, 1);
    config.dialog.text_box_padding = Point::new(1, 1);
    config.dialog.ok_padding = Point::new(0, 1);
    config.dialog.cancel_padding = Point::new(0, 1);
    config.notification_padding = Point::new(2, 1);
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use kart_ui_core::testing::FrameDriver;
    use kart_ui_core::{DialogResult, HorizontalAnchor, Rgba, UiRoot};
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect as Area;

    #[test]
    fn test_dialog_renders_in_cells() {
        let mut ui = UiRoot::with_config(Size::new(40, 12), CellMetrics, cell_config());
        let tree = ui.tree_mut();
        let panel = tree.insert_panel();
        tree.create_dialog(panel, "Quit?", HorizontalAnchor::Center, true, &[]).unwrap();
        let mut handle = tree.show_as_dialog(panel).unwrap();

        let mut driver = FrameDriver::new(ui);
        driver.frame();
        driver.frame();

        let mut buffer = Buffer::empty(Area::new(0, 0, 40, 12));
        driver.root().draw(&mut BufferSurface::new(&mut buffer));
        let screen: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(screen.contains("Quit?"));
        assert!(screen.contains("OK"));
        assert!(screen.contains("Cancel"));
        assert_eq!(handle.try_result(), None);

        let (_, ok, _) = driver.tree().dialog_parts(panel).unwrap();
        let at = driver.tree().component(ok).unwrap().location();
        driver.click_at(at);
        assert_eq!(handle.try_result(), Some(DialogResult::Accepted));
    }

    #[test]
    fn test_cell_config_keeps_timing_defaults() {
        let config = cell_config();
        assert_eq!(config.caret_blink, UiConfig::default().caret_blink);
        assert_eq!(config.dialog.button_size, Size::new(10, 1));
        assert_ne!(config.theme.modal_dim, Rgba::TRANSPARENT);
    }
}
