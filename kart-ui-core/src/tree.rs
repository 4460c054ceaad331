//! Node arena
//!
//! Every widget lives in one [`UiTree`]. Parents own their children by
//! handle; the back-reference to the parent is a plain handle too, so there is
//! no shared ownership anywhere. Handles are generational: once a node is
//! destroyed its [`NodeId`] never resolves again, even if the slot is reused.

use std::fmt;

use slab::Slab;
use tracing::{debug, trace};

use crate::button::Button;
use crate::color::Rgba;
use crate::component::{Availability, Component, HorizontalAnchor, Render};
use crate::config::{UiConfig, WidgetColors};
use crate::dialog::DialogState;
use crate::error::UiError;
use crate::font::FontMetrics;
use crate::geometry::{Point, Rect, Size, AUTO};
use crate::input::InputBroadcaster;
use crate::stack_panel::StackPanel;
use crate::surface::TextureId;
use crate::text_box::TextBox;

/// Handle to a node in a [`UiTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    fn slot(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Per-kind behavior of a node
#[derive(Debug)]
pub enum Widget {
    /// The viewport-sized container at the top of the tree
    Root,
    /// Plain text or image
    Element,
    StackPanel(StackPanel),
    Button(Button),
    TextBox(TextBox),
}

impl Widget {
    pub fn is_container(&self) -> bool {
        matches!(self, Widget::Root | Widget::StackPanel(_))
    }

    /// Receives the input broadcast
    pub fn is_interactive(&self) -> bool {
        matches!(self, Widget::Button(_) | Widget::TextBox(_))
    }
}

#[derive(Debug)]
pub struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub component: Component,
    pub widget: Widget,
    pub(crate) dialog: Option<DialogState>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_dialog(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn as_button(&self) -> Option<&Button> {
        match &self.widget {
            Widget::Button(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_text_box(&self) -> Option<&TextBox> {
        match &self.widget {
            Widget::TextBox(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_box_mut(&mut self) -> Option<&mut TextBox> {
        match &mut self.widget {
            Widget::TextBox(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_stack_panel(&self) -> Option<&StackPanel> {
        match &self.widget {
            Widget::StackPanel(p) => Some(p),
            _ => None,
        }
    }
}

pub struct UiTree {
    pub(crate) nodes: Slab<Node>,
    next_generation: u32,
    root: NodeId,
    pub(crate) metrics: Box<dyn FontMetrics>,
    pub(crate) config: UiConfig,
    pub(crate) input: InputBroadcaster,
}

impl fmt::Debug for UiTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiTree")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .field("subscribers", &self.input.subscribers().len())
            .finish()
    }
}

impl UiTree {
    /// Create a tree whose root covers `viewport`
    pub fn new(viewport: Size, metrics: impl FontMetrics + 'static, config: UiConfig) -> Self {
        let mut tree = Self {
            nodes: Slab::new(),
            next_generation: 0,
            root: NodeId {
                index: 0,
                generation: 0,
            },
            metrics: Box::new(metrics),
            config,
            input: InputBroadcaster::new(),
        };
        let root = Component::new().with_destination(Rect::from_parts(Point::ZERO, viewport));
        tree.root = tree.insert_node(root, Widget::Root);
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn viewport(&self) -> Size {
        self.nodes[self.root.slot()].component.size
    }

    /// Resize the root to a new viewport
    pub fn set_viewport(&mut self, viewport: Size) {
        let root = self.root;
        if let Ok(node) = self.node_mut(root) {
            node.component.size = viewport;
        }
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn metrics(&self) -> &dyn FontMetrics {
        &*self.metrics
    }

    pub fn input(&self) -> &InputBroadcaster {
        &self.input
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.slot())
            .filter(|n| n.generation == id.generation)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.slot())
            .filter(|n| n.generation == id.generation)
    }

    /// Field-level lookup for walks that also borrow other parts of the tree
    pub(crate) fn slot_mut(nodes: &mut Slab<Node>, id: NodeId) -> Option<&mut Node> {
        nodes.get_mut(id.slot()).filter(|n| n.generation == id.generation)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, UiError> {
        self.get(id).ok_or(UiError::UnknownNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, UiError> {
        self.get_mut(id).ok_or(UiError::UnknownNode(id))
    }

    pub fn component(&self, id: NodeId) -> Result<&Component, UiError> {
        Ok(&self.node(id)?.component)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Snapshot of a node's children
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id).map(|n| n.children.clone()).unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Insert a detached node
    pub fn insert_node(&mut self, component: Component, widget: Widget) -> NodeId {
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        let key = self.nodes.insert(Node {
            generation,
            parent: None,
            children: Vec::new(),
            component,
            widget,
            dialog: None,
        });
        let id = NodeId {
            index: key as u32,
            generation,
        };
        trace!(node = %id, "inserted");
        id
    }

    /// Insert a detached text or image element
    pub fn insert(&mut self, component: Component) -> NodeId {
        self.insert_node(component, Widget::Element)
    }

    /// Insert a detached stack panel. `background` of `None` (or a fully
    /// transparent color) draws no background.
    pub fn insert_stack_panel(&mut self, background: Option<Rgba>) -> NodeId {
        let component = match background.filter(|c| !c.is_transparent()) {
            Some(tint) => Component {
                render: Render::Image {
                    texture: TextureId::WHITE,
                },
                tint,
                ..Component::default()
            },
            None => Component::default(),
        };
        self.insert_node(component, Widget::StackPanel(StackPanel::new()))
    }

    /// Insert a detached stack panel with the theme's background
    pub fn insert_panel(&mut self) -> NodeId {
        let background = self.config.theme.panel_background;
        self.insert_stack_panel(Some(background))
    }

    pub fn insert_button(
        &mut self,
        label: impl Into<String>,
        colors: WidgetColors,
        destination: Rect,
        align: HorizontalAnchor,
    ) -> NodeId {
        let component = Component::new()
            .with_destination(destination)
            .with_h_anchor(align)
            .with_render(Render::Image {
                texture: TextureId::WHITE,
            });
        self.insert_node(component, Widget::Button(Button::new(label, colors)))
    }

    pub fn insert_text_box(
        &mut self,
        text: impl Into<String>,
        colors: WidgetColors,
        destination: Rect,
        align: HorizontalAnchor,
    ) -> NodeId {
        let component = Component::new()
            .with_destination(destination)
            .with_h_anchor(align)
            .with_render(Render::Image {
                texture: TextureId::WHITE,
            });
        self.insert_node(component, Widget::TextBox(TextBox::new(text, colors)))
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// `id` itself, then its descendants in depth-first order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.get(next) else {
                continue;
            };
            out.push(next);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// True if `id` is `ancestor` or lies beneath it
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Attach `child` under `parent`, enabling it.
    ///
    /// A child that already has a parent is moved: it leaves the old parent's
    /// child list first.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> Result<(), UiError> {
        let old_parent = self.node(child)?.parent;
        if !self.node(parent)?.widget.is_container() {
            return Err(UiError::NotAContainer(parent));
        }
        if self.is_within(parent, child) {
            return Err(UiError::CyclicAttach { child, parent });
        }

        if let Some(old) = old_parent {
            if let Some(node) = self.get_mut(old) {
                node.children.retain(|c| *c != child);
            }
        }
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        self.set_availability(child, Availability::Enabled)?;

        for id in self.descendants(child) {
            if self.nodes[id.slot()].widget.is_interactive() {
                self.input.subscribe(id);
            }
        }
        debug!(node = %child, parent = %parent, "attached");
        Ok(())
    }

    /// Disable `id` and its subtree. With `remove`, also unlink it from its
    /// parent and drop the subtree from the input broadcast.
    pub fn detach(&mut self, id: NodeId, remove: bool) -> Result<(), UiError> {
        let node = self.node_mut(id)?;
        if let Widget::Button(button) = &mut node.widget {
            button.clear_hover();
        }
        let children = node.children.clone();
        for child in children {
            self.detach(child, false)?;
        }
        self.set_availability(id, Availability::Disabled)?;

        if remove {
            if let Some(parent) = self.node_mut(id)?.parent.take() {
                if let Some(p) = self.get_mut(parent) {
                    p.children.retain(|c| *c != id);
                }
            }
            for node in self.descendants(id) {
                self.input.unsubscribe(node);
            }
            debug!(node = %id, "detached");
        }
        Ok(())
    }

    /// Remove `id` and its whole subtree from the arena.
    ///
    /// Destroying the root destroys its children but keeps the root.
    pub fn destroy(&mut self, id: NodeId) -> Result<(), UiError> {
        if id == self.root {
            for child in self.children(id) {
                self.destroy(child)?;
            }
            return Ok(());
        }
        self.detach(id, true)?;
        for node in self.descendants(id) {
            self.nodes.remove(node.slot());
        }
        debug!(node = %id, "destroyed");
        Ok(())
    }

    /// Set availability on `id` and every descendant
    pub fn set_availability(&mut self, id: NodeId, availability: Availability) -> Result<(), UiError> {
        self.node(id)?;
        for node in self.descendants(id) {
            self.nodes[node.slot()].component.availability = availability;
        }
        Ok(())
    }

    /// Attach each of `children` under `parent`, capturing each child's
    /// current location as its padding first. Stack panels reflow once
    /// afterwards, assigning `lock` to children without an anchor.
    pub fn add_range(
        &mut self,
        parent: NodeId,
        lock: HorizontalAnchor,
        children: &[NodeId],
    ) -> Result<(), UiError> {
        for &child in children {
            let component = &mut self.node_mut(child)?.component;
            component.padding = component.location;
            self.attach(child, parent)?;
        }
        if matches!(self.node(parent)?.widget, Widget::StackPanel(_)) {
            self.reflow(parent, lock)?;
        }
        Ok(())
    }

    /// Drop handles to nodes that no longer exist from `id`'s child list
    pub fn purge_children(&mut self, id: NodeId) {
        let Some(children) = self.get(id).map(|n| n.children.clone()) else {
            return;
        };
        let live: Vec<NodeId> = children.into_iter().filter(|c| self.contains(*c)).collect();
        if let Some(node) = self.get_mut(id) {
            if node.children.len() != live.len() {
                trace!(node = %id, purged = node.children.len() - live.len(), "purged stale children");
            }
            node.children = live;
        }
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.nodes.iter().find_map(|(key, node)| {
            (node.component.tag.as_deref() == Some(tag)).then_some(NodeId {
                index: key as u32,
                generation: node.generation,
            })
        })
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Set the margin; returns whether anything changed
    pub fn set_margin(&mut self, id: NodeId, margin: Point) -> Result<bool, UiError> {
        let component = &mut self.node_mut(id)?.component;
        if component.margin == margin {
            return Ok(false);
        }
        component.margin = margin;
        self.invalidated(id)?;
        Ok(true)
    }

    /// Set the size; returns whether anything changed
    pub fn set_size(&mut self, id: NodeId, size: Size) -> Result<bool, UiError> {
        let component = &mut self.node_mut(id)?.component;
        if component.size == size {
            return Ok(false);
        }
        component.size = size;
        self.invalidated(id)?;
        Ok(true)
    }

    /// Set location and size together; returns whether anything changed
    pub fn set_destination(&mut self, id: NodeId, destination: Rect) -> Result<bool, UiError> {
        let component = &mut self.node_mut(id)?.component;
        if component.destination() == destination {
            return Ok(false);
        }
        component.location = destination.location();
        component.size = destination.size();
        self.invalidated(id)?;
        Ok(true)
    }

    /// Replace a text element's string and re-measure it
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<bool, UiError> {
        let node = self.node_mut(id)?;
        let Render::Text { text: current, font } = &mut node.component.render else {
            return Ok(false);
        };
        *current = text.into();
        let (font, current) = (*font, current.clone());
        let measured = self.metrics.measure(font, &current);
        self.set_size(id, measured)
    }

    /// Recolor a node without touching its geometry
    pub fn set_text_color(&mut self, id: NodeId, tint: Rgba) -> Result<(), UiError> {
        self.node_mut(id)?.component.tint = tint;
        Ok(())
    }

    /// Reflow whichever stack panels depend on `id`'s geometry
    fn invalidated(&mut self, id: NodeId) -> Result<(), UiError> {
        trace!(node = %id, "invalidated");
        let node = self.node(id)?;
        let parent = node.parent;
        if matches!(node.widget, Widget::StackPanel(_)) {
            self.reflow(id, HorizontalAnchor::None)?;
        }
        if let Some(parent) = parent {
            if matches!(self.node(parent)?.widget, Widget::StackPanel(_)) {
                self.reflow(parent, HorizontalAnchor::None)?;
            }
        }
        Ok(())
    }

    /// Give a text box the dialog look: themed colors, a fixed height and
    /// a width that fills the panel.
    pub(crate) fn restyle_text_box(&mut self, id: NodeId) -> Result<bool, UiError> {
        let colors = self.config.theme.dialog_text_box;
        let height = self.config.dialog.text_box_height;
        let padding = self.config.dialog.text_box_padding;
        let node = self.node_mut(id)?;
        let Widget::TextBox(text_box) = &mut node.widget else {
            return Ok(false);
        };
        text_box.colors = colors;
        node.component.location = padding;
        node.component.size = Size::new(AUTO, height);
        Ok(true)
    }
}
