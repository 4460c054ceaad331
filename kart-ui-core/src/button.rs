//! Clickable button

use crate::color::Rgba;
use crate::config::WidgetColors;
use crate::font::{Font, FontMetrics};
use crate::geometry::{Point, Rect};
use crate::input::{DeviceState, InputEvent};
use crate::surface::Surface;

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: String,
    pub font: Font,
    pub colors: WidgetColors,
    mouse_over: bool,
}

impl Button {
    pub fn new(label: impl Into<String>, colors: WidgetColors) -> Self {
        Self {
            label: label.into(),
            font: Font::default(),
            colors,
            mouse_over: false,
        }
    }

    pub fn is_mouse_over(&self) -> bool {
        self.mouse_over
    }

    pub(crate) fn clear_hover(&mut self) {
        self.mouse_over = false;
    }

    pub(crate) fn track_hover(&mut self, destination: Rect, pointer: Point) {
        self.mouse_over = destination.contains(pointer);
    }

    /// True when this broadcast is a click on the button.
    ///
    /// Hover is re-evaluated against the pointer of the release frame.
    pub(crate) fn handle_input(&mut self, destination: Rect, event: &InputEvent, device: &DeviceState) -> bool {
        self.track_hover(destination, device.pointer);
        event.left_click && self.mouse_over
    }

    /// Fill color for the current hover and press state
    pub fn fill_color(&self, left_down: bool) -> Rgba {
        match (self.mouse_over, left_down) {
            (true, true) => self.colors.active,
            (true, false) => self.colors.highlight,
            (false, _) => self.colors.background,
        }
    }

    pub(crate) fn draw(&self, destination: Rect, device: &DeviceState, surface: &mut dyn Surface, metrics: &dyn FontMetrics) {
        surface.fill_rect(destination, self.fill_color(device.left_down));

        let text = metrics.measure(self.font, &self.label);
        let at = Point::new(
            destination.x + destination.width / 2 - text.width / 2,
            destination.y + destination.height / 2 - text.height / 2,
        );
        surface.draw_string(self.font, &self.label, at, self.colors.foreground);
    }
}
