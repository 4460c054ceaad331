//! Drawing the UI into a ratatui buffer
//!
//! One UI unit is one terminal cell. Translucent fills blend into whatever is
//! already in the cell, which is how the modal wash dims the screen beneath a
//! dialog.

use kart_ui_core::{Font, FontStyle, Point, Rect, Rgba, Surface, TextureId};
use ratatui::buffer::Buffer;
use ratatui::style::{Color, Modifier};
use tracing::trace;

pub struct BufferSurface<'a> {
    buffer: &'a mut Buffer,
}

impl<'a> BufferSurface<'a> {
    pub fn new(buffer: &'a mut Buffer) -> Self {
        Self { buffer }
    }

    /// Cells of `rect` that fall inside the buffer
    fn cells(&self, rect: Rect) -> impl Iterator<Item = (u16, u16)> {
        let area = self.buffer.area;
        let left = rect.x.max(area.x as i32);
        let top = rect.y.max(area.y as i32);
        let right = rect.right().min(area.right() as i32);
        let bottom = rect.bottom().min(area.bottom() as i32);
        (top..bottom).flat_map(move |y| (left..right).map(move |x| (x as u16, y as u16)))
    }
}

impl Surface for BufferSurface<'_> {
    fn fill_rect(&mut self, rect: Rect, tint: Rgba) {
        if tint.is_transparent() {
            return;
        }
        let cells: Vec<(u16, u16)> = self.cells(rect).collect();
        for pos in cells {
            let Some(cell) = self.buffer.cell_mut(pos) else {
                continue;
            };
            if tint.a == u8::MAX {
                cell.set_symbol(" ");
                cell.bg = to_color(tint);
            } else {
                cell.bg = blend(cell.bg, tint);
                cell.fg = blend(cell.fg, tint);
            }
        }
    }

    fn draw_texture(&mut self, texture: TextureId, rect: Rect, tint: Rgba) {
        if texture != TextureId::WHITE {
            trace!(texture = texture.0, "textures draw as flat fills in a terminal");
        }
        self.fill_rect(rect, tint);
    }

    fn draw_string(&mut self, font: Font, text: &str, location: Point, tint: Rgba) {
        if tint.is_transparent() {
            return;
        }
        let area = self.buffer.area;
        for (row, line) in text.lines().enumerate() {
            let y = location.y + row as i32;
            if y < area.y as i32 || y >= area.bottom() as i32 {
                continue;
            }
            for (col, c) in line.chars().enumerate() {
                let x = location.x + col as i32;
                if x < area.x as i32 || x >= area.right() as i32 {
                    continue;
                }
                let Some(cell) = self.buffer.cell_mut((x as u16, y as u16)) else {
                    continue;
                };
                cell.set_char(c);
                cell.fg = blend(cell.bg, tint);
                if font.style == FontStyle::Bold {
                    cell.modifier.insert(Modifier::BOLD);
                } else {
                    cell.modifier.remove(Modifier::BOLD);
                }
            }
        }
    }
}

fn to_color(c: Rgba) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Composite `over` onto `under` by `over`'s alpha
pub fn blend(under: Color, over: Rgba) -> Color {
    let alpha = over.a as f32 / 255.0;
    let (r, g, b) = to_rgb(under).unwrap_or((0, 0, 0));
    let mix = |u: u8, o: u8| (u as f32 * (1.0 - alpha) + o as f32 * alpha).round() as u8;
    Color::Rgb(mix(r, over.r), mix(g, over.g), mix(b, over.b))
}

/// RGB approximation of a terminal color. `Reset` has none.
pub fn to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    let rgb = match color {
        Color::Reset => return None,
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Indexed(idx) => return indexed_to_rgb(idx),
        Color::Black => (0, 0, 0),
        Color::Red => (205, 0, 0),
        Color::Green => (0, 205, 0),
        Color::Yellow => (205, 205, 0),
        Color::Blue => (0, 0, 238),
        Color::Magenta => (205, 0, 205),
        Color::Cyan => (0, 205, 205),
        Color::Gray => (229, 229, 229),
        Color::DarkGray => (127, 127, 127),
        Color::LightRed => (255, 0, 0),
        Color::LightGreen => (0, 255, 0),
        Color::LightYellow => (255, 255, 0),
        Color::LightBlue => (92, 92, 255),
        Color::LightMagenta => (255, 0, 255),
        Color::LightCyan => (0, 255, 255),
        Color::White => (255, 255, 255),
    };
    Some(rgb)
}

fn indexed_to_rgb(idx: u8) -> Option<(u8, u8, u8)> {
    match idx {
        0 => Some((0, 0, 0)),
        1 => Some((128, 0, 0)),
        2 => Some((0, 128, 0)),
        3 => Some((128, 128, 0)),
        4 => Some((0, 0, 128)),
        5 => Some((128, 0, 128)),
        6 => Some((0, 128, 128)),
        7 => Some((192, 192, 192)),
        8 => Some((128, 128, 128)),
        9 => Some((255, 0, 0)),
        10 => Some((0, 255, 0)),
        11 => Some((255, 255, 0)),
        12 => Some((0, 0, 255)),
        13 => Some((255, 0, 255)),
        14 => Some((0, 255, 255)),
        15 => Some((255, 255, 255)),
        // 6x6x6 color cube
        16..=231 => {
            let idx = idx - 16;
            let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            Some((level(idx / 36), level((idx / 6) % 6), level(idx % 6)))
        }
        232..=255 => {
            let gray = 8 + (idx - 232) * 10;
            Some((gray, gray, gray))
        }
    }
}
