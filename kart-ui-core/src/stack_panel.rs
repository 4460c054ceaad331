//! Vertical stacking container

use tracing::trace;

use crate::component::{AutoSize, HorizontalAnchor, Render};
use crate::error::UiError;
use crate::geometry::{Point, AUTO};
use crate::tree::{NodeId, UiTree, Widget};

/// Lays its children out top to bottom, each offset by its own padding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackPanel {
    content_height: i32,
}

impl StackPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertical extent of the children as of the last reflow
    pub fn content_height(&self) -> i32 {
        self.content_height
    }
}

impl UiTree {
    /// Recompute child margins and auto-size flags for a stack panel.
    ///
    /// Only raw fields are written, so a reflow never triggers another one.
    /// `lock` is given to children that have no horizontal anchor yet.
    pub(crate) fn reflow(&mut self, panel: NodeId, lock: HorizontalAnchor) -> Result<(), UiError> {
        let children = self.node(panel)?.children().to_vec();
        let metrics = &*self.metrics;

        let mut cursor = 0;
        let mut panel_padding = None;
        for id in &children {
            let Some(child) = UiTree::slot_mut(&mut self.nodes, *id) else {
                continue;
            };
            let c = &mut child.component;

            cursor += c.padding.y;
            if lock != HorizontalAnchor::None && c.h_anchor == HorizontalAnchor::None {
                c.h_anchor = lock;
            }
            if c.h_anchor != HorizontalAnchor::Center && c.margin.x == 0 {
                c.margin = Point::new(c.padding.x, 0);
            }
            c.margin.y = cursor;
            // the first child's padding is the panel's
            panel_padding.get_or_insert(c.padding);

            match &c.render {
                Render::Text { text, font } => {
                    c.size = metrics.measure(*font, text);
                    cursor += c.size.height;
                }
                Render::Image { .. } => cursor += c.size.height.max(0),
                Render::None => {}
            }

            if c.size.width == AUTO {
                c.auto_size |= AutoSize::WIDTH;
            }
            if c.size.height == AUTO {
                c.auto_size |= AutoSize::HEIGHT;
            }
        }

        let node = self.node_mut(panel)?;
        let c = &mut node.component;
        if let Some(padding) = panel_padding {
            c.padding = padding;
        }
        if c.size.width == 0 {
            c.auto_size |= AutoSize::WIDTH;
        }
        if c.size.height == 0 {
            c.auto_size |= AutoSize::HEIGHT;
        }
        if let Widget::StackPanel(state) = &mut node.widget {
            state.content_height = cursor;
        }
        trace!(node = %panel, children = children.len(), height = cursor, "reflowed");
        Ok(())
    }
}
