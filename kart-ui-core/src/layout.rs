//! Per-frame update walk: widget timers, anchor resolution and auto-size

use std::time::Duration;

use crate::clipboard::Clipboard;
use crate::component::{Availability, AutoSize};
use crate::error::UiError;
use crate::geometry::Size;
use crate::input::DeviceState;
use crate::tree::{NodeId, UiTree, Widget};

/// Everything one frame's update needs from the host
pub(crate) struct FrameContext<'a> {
    pub delta: Duration,
    pub device: &'a DeviceState,
    pub clipboard: &'a mut dyn Clipboard,
}

impl UiTree {
    /// Update `id` and, for containers, its subtree.
    ///
    /// Disabled nodes are skipped along with their children. Children are
    /// visited from a snapshot of the child list.
    pub(crate) fn update_node(&mut self, id: NodeId, ctx: &mut FrameContext<'_>) -> Result<(), UiError> {
        let config = &self.config;
        let node = UiTree::slot_mut(&mut self.nodes, id).ok_or(UiError::UnknownNode(id))?;
        if node.component.availability == Availability::Disabled {
            return Ok(());
        }

        let destination = node.component.destination();
        match &mut node.widget {
            Widget::Button(button) => button.track_hover(destination, ctx.device.pointer),
            Widget::TextBox(text_box) => {
                text_box.tick(destination, ctx.delta, ctx.device, &mut *ctx.clipboard, config)
            }
            _ => {}
        }

        self.resolve_layout(id)?;

        if self.node(id)?.widget.is_container() {
            for child in self.children(id) {
                if self.contains(child) {
                    self.update_node(child, ctx)?;
                }
            }
        }
        Ok(())
    }

    /// Recompute `id`'s location from its anchors, margin and parent, then
    /// apply auto-size. Detached nodes keep their geometry.
    pub(crate) fn resolve_layout(&mut self, id: NodeId) -> Result<(), UiError> {
        let node = self.node(id)?;
        let Some(parent) = node.parent() else {
            return Ok(());
        };
        let parent = self.node(parent)?.component.destination();
        let c = &node.component;

        let location = c.anchor_offset(parent.size()) + c.margin + parent.location();
        let size = if node.widget.is_container() {
            self.fit_children(id)?
        } else {
            c.fill_parent(parent.size())
        };

        let c = &mut self.node_mut(id)?.component;
        c.location = location;
        c.size = size;
        Ok(())
    }

    /// Container auto-size: grow to the widest and lowest child plus this
    /// container's padding. Children auto-sized on an axis don't count on
    /// that axis; with nothing to measure the size is kept.
    fn fit_children(&self, id: NodeId) -> Result<Size, UiError> {
        let node = self.node(id)?;
        let own = &node.component;
        let mut size = own.size;

        let children = node
            .children()
            .iter()
            .filter_map(|c| self.get(*c))
            .map(|n| &n.component);

        if own.auto_size.contains(AutoSize::WIDTH) {
            let widest = children
                .clone()
                .filter(|c| !c.auto_size.contains(AutoSize::WIDTH))
                .map(|c| c.size.width + c.padding.x)
                .max();
            if let Some(widest) = widest {
                size.width = widest + own.padding.x;
            }
        }
        if own.auto_size.contains(AutoSize::HEIGHT) {
            let lowest = children
                .filter(|c| !c.auto_size.contains(AutoSize::HEIGHT))
                .map(|c| c.margin.y + c.size.height)
                .max();
            if let Some(lowest) = lowest {
                size.height = lowest + own.padding.y;
            }
        }
        Ok(size)
    }
}
