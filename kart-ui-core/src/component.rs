//! The positioned, anchorable base shared by every node in the tree

use bitflags::bitflags;

use crate::color::Rgba;
use crate::font::Font;
use crate::geometry::{Point, Rect, Size};
use crate::surface::{Surface, TextureId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAnchor {
    /// Keep the raw margin
    #[default]
    None,
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAnchor {
    /// Keep the raw margin
    #[default]
    None,
    Top,
    Center,
    Bottom,
}

/// Whether a node updates, draws, and receives input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Availability {
    /// Updates, draws and takes input
    #[default]
    Enabled,
    /// Updates but does not draw
    Invisible,
    /// Skips update and ignores input
    Disabled,
}

bitflags! {
    /// Axes sized from the parent (leaves) or from the children (containers)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AutoSize: u8 {
        const WIDTH = 0b01;
        const HEIGHT = 0b10;
    }
}

/// What a node draws for itself
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Render {
    #[default]
    None,
    Text { text: String, font: Font },
    Image { texture: TextureId },
}

impl Render {
    pub fn text(&self) -> Option<&str> {
        match self {
            Render::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Geometry, anchoring and render payload of a node
///
/// `location` is derived: it is recomputed from the margin, the anchors and
/// the parent's location on every update. The margin is what callers own.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub(crate) margin: Point,
    pub(crate) size: Size,
    pub(crate) location: Point,
    /// Initial placement captured when added through `add_range`
    pub(crate) padding: Point,
    pub(crate) availability: Availability,
    pub h_anchor: HorizontalAnchor,
    pub v_anchor: VerticalAnchor,
    pub render: Render,
    /// Color for text, tint for images
    pub tint: Rgba,
    pub auto_size: AutoSize,
    /// Marks a modal overlay
    pub exclusive: bool,
    pub tag: Option<String>,
}

impl Default for Component {
    fn default() -> Self {
        Self {
            margin: Point::ZERO,
            size: Size::ZERO,
            location: Point::ZERO,
            padding: Point::ZERO,
            availability: Availability::Enabled,
            h_anchor: HorizontalAnchor::None,
            v_anchor: VerticalAnchor::None,
            render: Render::None,
            tint: Rgba::WHITE,
            auto_size: AutoSize::empty(),
            exclusive: false,
            tag: None,
        }
    }
}

impl Component {
    /// A node that draws nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// A text label in the default font, horizontally centered in its parent.
    /// `location` becomes its padding once added to a panel.
    pub fn text(text: impl Into<String>, tint: Rgba, location: Point) -> Self {
        Self::text_with_font(Font::default(), text, tint, location)
    }

    pub fn text_with_font(font: Font, text: impl Into<String>, tint: Rgba, location: Point) -> Self {
        Self {
            render: Render::Text {
                text: text.into(),
                font,
            },
            tint,
            location,
            h_anchor: HorizontalAnchor::Center,
            ..Self::default()
        }
    }

    /// A texture stretched into `destination`
    pub fn image(texture: TextureId, tint: Rgba, destination: Rect) -> Self {
        Self {
            render: Render::Image { texture },
            tint,
            location: destination.location(),
            size: destination.size(),
            ..Self::default()
        }
    }

    /// Set the initial destination (location and size)
    pub fn with_destination(mut self, destination: Rect) -> Self {
        self.location = destination.location();
        self.size = destination.size();
        self
    }

    pub fn with_margin(mut self, margin: Point) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_h_anchor(mut self, anchor: HorizontalAnchor) -> Self {
        self.h_anchor = anchor;
        self
    }

    pub fn with_v_anchor(mut self, anchor: VerticalAnchor) -> Self {
        self.v_anchor = anchor;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_render(mut self, render: Render) -> Self {
        self.render = render;
        self
    }

    /// Anchor to the center of the parent on both axes
    pub fn centered(mut self) -> Self {
        self.set_center_screen();
        self
    }

    pub fn set_center_screen(&mut self) {
        self.h_anchor = HorizontalAnchor::Center;
        self.v_anchor = VerticalAnchor::Center;
    }

    pub fn margin(&self) -> Point {
        self.margin
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> i32 {
        self.size.width
    }

    pub fn height(&self) -> i32 {
        self.size.height
    }

    /// Resolved screen location from the last update
    pub fn location(&self) -> Point {
        self.location
    }

    /// Resolved screen rectangle from the last update
    pub fn destination(&self) -> Rect {
        Rect::from_parts(self.location, self.size)
    }

    pub fn padding(&self) -> Point {
        self.padding
    }

    pub fn availability(&self) -> Availability {
        self.availability
    }

    pub fn is_enabled(&self) -> bool {
        self.availability == Availability::Enabled
    }

    pub fn is_disabled(&self) -> bool {
        self.availability == Availability::Disabled
    }

    /// Offset from the parent's origin contributed by the anchors
    pub(crate) fn anchor_offset(&self, parent: Size) -> Point {
        let x = match self.h_anchor {
            HorizontalAnchor::None | HorizontalAnchor::Left => 0,
            HorizontalAnchor::Center => parent.width / 2 - self.size.width / 2,
            HorizontalAnchor::Right => parent.width - self.size.width,
        };
        let y = match self.v_anchor {
            VerticalAnchor::None | VerticalAnchor::Top => 0,
            VerticalAnchor::Center => parent.height / 2 - self.size.height / 2,
            VerticalAnchor::Bottom => parent.height - self.size.height,
        };
        Point::new(x, y)
    }

    /// Leaf auto-size: fill the parent minus this node's padding on both sides
    pub(crate) fn fill_parent(&self, parent: Size) -> Size {
        let mut size = self.size;
        if self.auto_size.contains(AutoSize::WIDTH) {
            size.width = parent.width - self.padding.x * 2;
        }
        if self.auto_size.contains(AutoSize::HEIGHT) {
            size.height = parent.height - self.padding.y * 2;
        }
        size
    }

    /// Draw this node's own render payload
    pub(crate) fn draw(&self, surface: &mut dyn Surface) {
        match &self.render {
            Render::Text { text, font } => surface.draw_string(*font, text, self.location, self.tint),
            Render::Image { texture } => surface.draw_texture(*texture, self.destination(), self.tint),
            Render::None => {}
        }
    }
}
