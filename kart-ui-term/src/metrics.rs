//! Text measurement on a character grid

use kart_ui_core::{Font, FontMetrics, Size};

/// Every glyph is one cell and every line one row, whatever the font size.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellMetrics;

impl FontMetrics for CellMetrics {
    fn measure(&self, _font: Font, text: &str) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let rows = text.lines().count().max(1);
        let cols = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        Size::new(cols as i32, rows as i32)
    }
}
