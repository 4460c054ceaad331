//! Draw walk

use crate::component::Availability;
use crate::error::UiError;
use crate::input::DeviceState;
use crate::surface::Surface;
use crate::tree::{NodeId, UiTree, Widget};

impl UiTree {
    /// Draw `id` and its subtree in child order.
    ///
    /// Invisible nodes skip their own visuals; their children still draw
    /// according to their own availability.
    pub(crate) fn draw_node(&self, id: NodeId, device: &DeviceState, surface: &mut dyn Surface) -> Result<(), UiError> {
        let node = self.node(id)?;
        let c = &node.component;

        if c.availability != Availability::Invisible {
            match &node.widget {
                Widget::Root => {}
                Widget::Element | Widget::StackPanel(_) => c.draw(surface),
                Widget::Button(button) => button.draw(c.destination(), device, surface, self.metrics()),
                Widget::TextBox(text_box) => text_box.draw(c.destination(), surface, self.metrics()),
            }
        }

        for &child in node.children() {
            self.draw_node(child, device, surface)?;
        }
        Ok(())
    }
}
