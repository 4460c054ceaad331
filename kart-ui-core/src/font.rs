//! Fonts and text measurement

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// Size at which font resources are authored; other sizes scale from it
pub const DEFAULT_FONT_SIZE: f32 = 24.0;

/// Glyphs used to measure a line when there is no text to measure
const REPRESENTATIVE_GLYPHS: &str = "REMY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
}

/// A font resource selected by style, rendered at `size`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub size: f32,
    pub style: FontStyle,
}

impl Font {
    pub const fn new(size: f32, style: FontStyle) -> Self {
        Self { size, style }
    }

    pub const fn regular(size: f32) -> Self {
        Self::new(size, FontStyle::Regular)
    }

    pub const fn bold(size: f32) -> Self {
        Self::new(size, FontStyle::Bold)
    }

    /// Scale applied to the authored glyphs
    pub fn scale(&self) -> f32 {
        self.size / DEFAULT_FONT_SIZE
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::regular(12.0)
    }
}

/// Text measurement provided by the host's loaded fonts
pub trait FontMetrics {
    /// Rendered extent of `text` in `font`, truncated to whole units.
    ///
    /// Empty text may measure as zero in both dimensions.
    fn measure(&self, font: Font, text: &str) -> Size;

    /// Height of one line of representative glyphs
    fn line_height(&self, font: Font) -> i32 {
        self.measure(font, REPRESENTATIVE_GLYPHS).height
    }

    /// Like [`measure`](Self::measure), but a zero height falls back to
    /// [`line_height`](Self::line_height) so carets and boxes never collapse
    fn measure_or_glyph(&self, font: Font, text: &str) -> Size {
        let mut size = self.measure(font, text);
        if size.height == 0 {
            size.height = self.line_height(font);
        }
        size
    }
}

/// Fixed-advance metrics: every glyph is `advance` wide and `line_height`
/// tall at [`DEFAULT_FONT_SIZE`], scaled by the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub advance: f32,
    pub line_height: f32,
    /// Extra advance multiplier applied to bold glyphs
    pub bold_factor: f32,
}

impl MonospaceMetrics {
    pub const fn new(advance: f32, line_height: f32) -> Self {
        Self {
            advance,
            line_height,
            bold_factor: 1.0,
        }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(12.0, 28.0)
    }
}

impl FontMetrics for MonospaceMetrics {
    fn measure(&self, font: Font, text: &str) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let advance = match font.style {
            FontStyle::Regular => self.advance,
            FontStyle::Bold => self.advance * self.bold_factor,
        };
        let lines = text.lines().count().max(1) as f32;
        let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0) as f32;
        Size::new(
            (widest * advance * font.scale()) as i32,
            (lines * self.line_height * font.scale()) as i32,
        )
    }
}
