//! Render surface seam
//!
//! The host owns the actual renderer (a GPU sprite batch, a terminal buffer).
//! The UI only ever issues these four primitives between `begin` and `end`.

use crate::color::Rgba;
use crate::font::Font;
use crate::geometry::{Point, Rect};

/// Handle to a texture the host has loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

impl TextureId {
    /// The 1x1 white texture used for flat, tinted rectangles
    pub const WHITE: TextureId = TextureId(0);
}

/// A per-frame drawing target
pub trait Surface {
    /// Start a frame's UI pass
    fn begin(&mut self) {}

    /// Finish a frame's UI pass
    fn end(&mut self) {}

    /// Fill `rect` with a flat tint
    fn fill_rect(&mut self, rect: Rect, tint: Rgba);

    /// Draw `texture` stretched into `rect`, multiplied by `tint`
    fn draw_texture(&mut self, texture: TextureId, rect: Rect, tint: Rgba);

    /// Draw `text` with its top-left corner at `location`, scaled to `font.size`
    fn draw_string(&mut self, font: Font, text: &str, location: Point, tint: Rgba);
}
