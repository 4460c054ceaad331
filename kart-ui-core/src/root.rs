//! The UI root: frame driver, input fan-out, modal dimming and notifications

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::clipboard::{Clipboard, NoClipboard};
use crate::color::Rgba;
use crate::component::{Availability, Component, HorizontalAnchor, VerticalAnchor};
use crate::config::UiConfig;
use crate::error::UiError;
use crate::event::{UiEvent, UiEventKind};
use crate::font::FontMetrics;
use crate::geometry::{Point, Rect, Size};
use crate::input::{DeviceState, InputEvent, InputSource};
use crate::layout::FrameContext;
use crate::surface::Surface;
use crate::text_box::TextBoxSignal;
use crate::tree::{NodeId, UiTree, Widget};

#[derive(Debug, Clone, Copy)]
struct Notification {
    panel: NodeId,
    /// `None` stays up until hidden
    duration: Option<Duration>,
    elapsed: Duration,
}

/// Owns the tree and drives it once per frame
pub struct UiRoot {
    tree: UiTree,
    clipboard: Box<dyn Clipboard>,
    device: DeviceState,
    events: Vec<UiEvent>,
    notification: Option<Notification>,
}

impl UiRoot {
    pub fn new(viewport: Size, metrics: impl FontMetrics + 'static) -> Self {
        Self::with_config(viewport, metrics, UiConfig::default())
    }

    pub fn with_config(viewport: Size, metrics: impl FontMetrics + 'static, config: UiConfig) -> Self {
        Self {
            tree: UiTree::new(viewport, metrics, config),
            clipboard: Box::new(NoClipboard),
            device: DeviceState::default(),
            events: Vec::new(),
            notification: None,
        }
    }

    /// Use `clipboard` for text box paste
    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    pub fn tree(&self) -> &UiTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut UiTree {
        &mut self.tree
    }

    pub fn config(&self) -> &UiConfig {
        self.tree.config()
    }

    pub fn viewport(&self) -> Size {
        self.tree.viewport()
    }

    pub fn resize(&mut self, viewport: Size) {
        debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.tree.set_viewport(viewport);
    }

    /// Device state sampled at the last update
    pub fn device(&self) -> &DeviceState {
        &self.device
    }

    /// Attach `node` directly to the root
    pub fn add(&mut self, node: NodeId) -> Result<(), UiError> {
        let root = self.tree.root();
        self.tree.attach(node, root)
    }

    /// The topmost exclusive child of the root
    pub fn modal(&self) -> Option<NodeId> {
        let root = self.tree.root();
        self.tree
            .children(root)
            .into_iter()
            .rev()
            .find(|c| self.tree.get(*c).is_some_and(|n| n.component.exclusive))
    }

    /// Events raised since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run one frame: sample input, fan it out, update the tree and advance
    /// the notification timer.
    ///
    /// Structural errors inside a child's update are logged and skipped so a
    /// broken subtree never stops the frame.
    pub fn update(&mut self, delta: Duration, input: &mut dyn InputSource) {
        self.device = input.device_state();
        if let Some(event) = self.tree.input.poll(&self.device) {
            trace!(keys = event.pressed_keys.len(), click = event.left_click, "input");
            self.broadcast(&event);
        }

        let root = self.tree.root();
        let mut ctx = FrameContext {
            delta,
            device: &self.device,
            clipboard: &mut *self.clipboard,
        };
        for child in self.tree.children(root) {
            if let Err(e) = self.tree.update_node(child, &mut ctx) {
                warn!(node = %child, error = %e, "update failed");
            }
        }

        let expired = match &mut self.notification {
            Some(n) => {
                n.elapsed += delta;
                n.duration.is_some_and(|d| n.elapsed >= d)
            }
            None => false,
        };
        if expired {
            self.hide_notification();
        }
        self.tree.purge_children(root);
    }

    fn broadcast(&mut self, event: &InputEvent) {
        let modal = self.modal();
        let subscribers = self.tree.input.subscribers().to_vec();
        for id in subscribers {
            if !self.tree.contains(id) {
                self.tree.input.unsubscribe(id);
                continue;
            }
            if modal.is_some_and(|m| !self.tree.is_within(id, m)) {
                continue;
            }
            let Some(kind) = self.deliver(id, event) else {
                continue;
            };
            debug!(node = %id, event = ?kind, "ui event");
            let clicked = kind == UiEventKind::Clicked;
            self.events.push(UiEvent::new(id, kind));

            if clicked {
                if let Some((panel, result)) = self.tree.dialog_button(id) {
                    match self.tree.resolve_dialog(panel, result) {
                        Ok(Some(result)) => self
                            .events
                            .push(UiEvent::new(panel, UiEventKind::DialogClosed(result))),
                        Ok(None) => {}
                        Err(e) => warn!(node = %panel, error = %e, "closing dialog failed"),
                    }
                }
            }
        }
    }

    fn deliver(&mut self, id: NodeId, event: &InputEvent) -> Option<UiEventKind> {
        let node = self.tree.get_mut(id)?;
        if node.component.availability == Availability::Disabled {
            return None;
        }
        let destination = node.component.destination();
        match &mut node.widget {
            Widget::Button(button) => button
                .handle_input(destination, event, &self.device)
                .then_some(UiEventKind::Clicked),
            Widget::TextBox(text_box) => {
                text_box
                    .handle_input(destination, event, &self.device)
                    .map(|signal| match signal {
                        TextBoxSignal::Accepted(text) => UiEventKind::TextAccepted(text),
                    })
            }
            _ => None,
        }
    }

    /// Draw the tree. While a modal is open everything beneath it is
    /// dimmed with the theme's wash.
    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.begin();
        let root = self.tree.root();
        let children = self.tree.children(root);
        let (overlays, base): (Vec<NodeId>, Vec<NodeId>) = children
            .into_iter()
            .partition(|c| self.tree.get(*c).is_some_and(|n| n.component.exclusive));

        for child in base {
            self.draw_child(child, surface);
        }
        if !overlays.is_empty() {
            let viewport = Rect::from_parts(Point::ZERO, self.viewport());
            surface.fill_rect(viewport, self.config().theme.modal_dim);
        }
        for child in overlays {
            self.draw_child(child, surface);
        }
        surface.end();
    }

    fn draw_child(&self, child: NodeId, surface: &mut dyn Surface) {
        if let Err(e) = self.tree.draw_node(child, &self.device, surface) {
            warn!(node = %child, error = %e, "draw failed");
        }
    }

    /// Show a transient message at the bottom center of the screen,
    /// replacing any notification already up. A zero `duration` keeps it up
    /// until [`hide_notification`](Self::hide_notification).
    pub fn show_notification(
        &mut self,
        text: impl Into<String>,
        background: Rgba,
        foreground: Rgba,
        duration: Duration,
    ) -> Result<NodeId, UiError> {
        self.hide_notification();

        let config = self.tree.config();
        let font = config.notification_font;
        let padding = config.notification_padding;
        let panel = self.tree.insert_stack_panel(Some(background));
        {
            let c = &mut self.tree.node_mut(panel)?.component;
            c.h_anchor = HorizontalAnchor::Center;
            c.v_anchor = VerticalAnchor::Bottom;
        }
        let label = self
            .tree
            .insert(Component::text_with_font(font, text, foreground, padding));
        self.tree
            .add_range(panel, HorizontalAnchor::Center, &[label])?;
        self.add(panel)?;

        self.notification = Some(Notification {
            panel,
            duration: (!duration.is_zero()).then_some(duration),
            elapsed: Duration::ZERO,
        });
        debug!(node = %panel, ?duration, "notification shown");
        Ok(panel)
    }

    /// Remove the current notification, if any
    pub fn hide_notification(&mut self) {
        let Some(notification) = self.notification.take() else {
            return;
        };
        if let Err(e) = self.tree.destroy(notification.panel) {
            warn!(node = %notification.panel, error = %e, "notification already gone");
        }
        debug!(node = %notification.panel, "notification hidden");
    }

    pub fn notification(&self) -> Option<NodeId> {
        self.notification.map(|n| n.panel)
    }
}

impl std::fmt::Debug for UiRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiRoot")
            .field("tree", &self.tree)
            .field("events", &self.events.len())
            .field("notification", &self.notification())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::DialogResult;
    use crate::font::MonospaceMetrics;
    use crate::testing::{DrawCall, FakeClipboard, FrameDriver};
    use crate::{assert_no_ui_event, assert_ui_event, count_ui_events};

    fn driver() -> FrameDriver {
        FrameDriver::new(UiRoot::new(Size::new(800, 600), MonospaceMetrics::default()))
    }

    fn center(rect: Rect) -> Point {
        Point::new(rect.x + rect.width / 2, rect.y + rect.height / 2)
    }

    fn destination(driver: &FrameDriver, id: NodeId) -> Rect {
        driver.tree().component(id).unwrap().destination()
    }

    fn add_button(driver: &mut FrameDriver, rect: Rect) -> NodeId {
        let colors = driver.root().config().theme.dialog_ok;
        let size = Rect::from_parts(Point::ZERO, rect.size());
        let tree = driver.tree_mut();
        let button = tree.insert_button("Go", colors, size, HorizontalAnchor::None);
        // children of the root are placed by their margin
        tree.set_margin(button, rect.location()).unwrap();
        driver.root_mut().add(button).unwrap();
        driver.frame();
        button
    }

    fn name_dialog(driver: &mut FrameDriver) -> (NodeId, NodeId) {
        let tree = driver.tree_mut();
        let colors = tree.config().theme.text_box;
        let name = tree.insert_text_box("", colors, Rect::new(10, 10, 200, 30), HorizontalAnchor::None);
        let panel = tree.insert_panel();
        tree.create_dialog(panel, "Name?", HorizontalAnchor::Left, true, &[name])
            .unwrap();
        (panel, name)
    }

    #[test]
    fn test_click_raises_event() {
        let mut driver = driver();
        let button = add_button(&mut driver, Rect::new(100, 100, 80, 30));
        driver.click_at(Point::new(120, 110));

        let events = driver.drain_events();
        assert_eq!(events, vec![UiEvent::new(button, UiEventKind::Clicked)]);
    }

    #[test]
    fn test_release_outside_is_not_a_click() {
        let mut driver = driver();
        add_button(&mut driver, Rect::new(100, 100, 80, 30));

        driver.device_mut().pointer = Point::new(120, 110);
        driver.device_mut().left_down = true;
        driver.frame();
        driver.device_mut().pointer = Point::new(400, 400);
        driver.device_mut().left_down = false;
        driver.frame();

        assert!(driver.drain_events().is_empty());
    }

    #[test]
    fn test_press_outside_release_inside_clicks() {
        let mut driver = driver();
        add_button(&mut driver, Rect::new(100, 100, 80, 30));

        driver.device_mut().pointer = Point::new(400, 400);
        driver.device_mut().left_down = true;
        driver.frame();
        driver.device_mut().pointer = Point::new(120, 110);
        driver.device_mut().left_down = false;
        driver.frame();

        let events = driver.drain_events();
        assert_ui_event!(events, UiEventKind::Clicked);
    }

    #[test]
    fn test_disabled_button_ignores_click() {
        let mut driver = driver();
        let button = add_button(&mut driver, Rect::new(100, 100, 80, 30));
        driver
            .tree_mut()
            .set_availability(button, Availability::Disabled)
            .unwrap();

        driver.click_at(Point::new(120, 110));

        assert!(driver.drain_events().is_empty());
    }

    #[test]
    fn test_text_box_typing_and_accept() {
        let mut driver = driver();
        let colors = driver.root().config().theme.text_box;
        let text_box = driver.tree_mut().insert_text_box(
            "",
            colors,
            Rect::new(10, 10, 300, 40),
            HorizontalAnchor::None,
        );
        driver.root_mut().add(text_box).unwrap();
        driver.frame();

        driver.click_at(Point::new(20, 20));
        driver.type_text("luigi 64");
        driver.tap("enter");

        let tb = driver.tree().node(text_box).unwrap().as_text_box().unwrap();
        assert!(tb.is_active());
        assert_eq!(tb.text(), "luigi 64");
        let events = driver.drain_events();
        assert_ui_event!(events, UiEventKind::TextAccepted(t) if t == "luigi 64");
    }

    #[test]
    fn test_text_box_paste_reads_clipboard_once() {
        let clipboard = FakeClipboard::new("toad");
        let root = UiRoot::new(Size::new(800, 600), MonospaceMetrics::default())
            .with_clipboard(clipboard.clone());
        let mut driver = FrameDriver::new(root);
        let colors = driver.root().config().theme.text_box;
        let text_box = driver.tree_mut().insert_text_box(
            "",
            colors,
            Rect::new(10, 10, 300, 40),
            HorizontalAnchor::None,
        );
        driver.root_mut().add(text_box).unwrap();
        driver.frame();
        driver.click_at(Point::new(20, 20));

        driver.press("ctrl+v");
        driver.advance(Duration::from_millis(200));
        driver.release_all();

        let tb = driver.tree().node(text_box).unwrap().as_text_box().unwrap();
        assert_eq!(tb.text(), "toad");
        assert_eq!(clipboard.reads(), 1);
    }

    #[test]
    fn test_dialog_ok_resolves() {
        let mut driver = driver();
        let (panel, _) = name_dialog(&mut driver);
        let mut handle = driver.tree_mut().show_as_dialog(panel).unwrap();
        driver.frame();
        driver.frame();
        let (_, ok, _) = driver.tree().dialog_parts(panel).unwrap();

        let at = center(destination(&driver, ok));
        driver.click_at(at);

        let events = driver.drain_events();
        assert_ui_event!(events, UiEventKind::Clicked);
        assert_ui_event!(events, UiEventKind::DialogClosed(DialogResult::Accepted));
        assert_eq!(handle.try_result(), Some(DialogResult::Accepted));
        assert_eq!(driver.root().modal(), None);
        assert_eq!(driver.tree().parent(panel), None);
    }

    #[test]
    fn test_dialog_cancel_resolves() {
        let mut driver = driver();
        let (panel, _) = name_dialog(&mut driver);
        let mut handle = driver.tree_mut().show_as_dialog(panel).unwrap();
        driver.frame();
        driver.frame();
        let (_, _, cancel) = driver.tree().dialog_parts(panel).unwrap();

        let at = center(destination(&driver, cancel));
        driver.click_at(at);

        assert_eq!(handle.try_result(), Some(DialogResult::Cancelled));
    }

    #[test]
    fn test_modal_blocks_input_outside() {
        let mut driver = driver();
        let behind = add_button(&mut driver, Rect::new(0, 0, 60, 20));
        let (panel, _) = name_dialog(&mut driver);
        driver.tree_mut().show_as_dialog(panel).unwrap();
        driver.frame();

        driver.click_at(Point::new(10, 10));

        let events = driver.drain_events();
        assert_no_ui_event!(events, UiEventKind::Clicked);
        assert!(driver.tree().input().is_subscribed(behind));
        assert_eq!(driver.root().modal(), Some(panel));
    }

    #[test]
    fn test_draw_dims_beneath_modal() {
        let mut driver = driver();
        add_button(&mut driver, Rect::new(0, 0, 60, 20));
        let (panel, _) = name_dialog(&mut driver);
        driver.tree_mut().show_as_dialog(panel).unwrap();
        driver.frame();

        let surface = driver.draw();
        let dim = driver.root().config().theme.modal_dim;
        let viewport = Rect::new(0, 0, 800, 600);
        let dim_at = surface
            .position(|c| *c == DrawCall::Fill { rect: viewport, color: dim })
            .expect("dim wash drawn");
        let button_at = surface.position(|c| matches!(c, DrawCall::Text { text, .. } if text == "Go")).unwrap();
        let title_at = surface.position(|c| matches!(c, DrawCall::Text { text, .. } if text == "Name?")).unwrap();

        assert!(button_at < dim_at);
        assert!(dim_at < title_at);
        assert_eq!(surface.calls.first(), Some(&DrawCall::Begin));
        assert_eq!(surface.calls.last(), Some(&DrawCall::End));
    }

    #[test]
    fn test_no_dim_without_modal() {
        let mut driver = driver();
        add_button(&mut driver, Rect::new(0, 0, 60, 20));
        let surface = driver.draw();
        let dim = driver.root().config().theme.modal_dim;
        assert!(surface.fills().iter().all(|(_, color)| *color != dim));
    }

    #[test]
    fn test_notification_expires() {
        let mut driver = driver();
        let panel = driver
            .root_mut()
            .show_notification("Lap 2", Rgba::BLACK, Rgba::WHITE, Duration::from_millis(100))
            .unwrap();
        // one frame to size the panel, one to anchor it with that size
        driver.frame();
        driver.frame();

        let dest = destination(&driver, panel);
        // centered at the bottom of the viewport
        assert_eq!(dest.bottom(), 600);
        assert_eq!(dest.x, 400 - dest.width / 2);
        assert!(driver.draw().texts().contains(&"Lap 2"));

        driver.advance(Duration::from_millis(120));
        assert_eq!(driver.root().notification(), None);
        assert!(!driver.tree().contains(panel));
    }

    #[test]
    fn test_zero_duration_notification_persists() {
        let mut driver = driver();
        driver
            .root_mut()
            .show_notification("Paused", Rgba::BLACK, Rgba::WHITE, Duration::ZERO)
            .unwrap();
        driver.advance(Duration::from_secs(5));
        assert!(driver.root().notification().is_some());

        driver.root_mut().hide_notification();
        driver.root_mut().hide_notification();
        assert_eq!(driver.root().notification(), None);
    }

    #[test]
    fn test_new_notification_replaces_old() {
        let mut driver = driver();
        let first = driver
            .root_mut()
            .show_notification("One", Rgba::BLACK, Rgba::WHITE, Duration::ZERO)
            .unwrap();
        let second = driver
            .root_mut()
            .show_notification("Two", Rgba::BLACK, Rgba::WHITE, Duration::ZERO)
            .unwrap();

        assert!(!driver.tree().contains(first));
        assert_eq!(driver.root().notification(), Some(second));
        let root = driver.tree().root();
        assert_eq!(driver.tree().children(root), vec![second]);
    }

    #[test]
    fn test_destroyed_subscriber_is_dropped() {
        let mut driver = driver();
        let button = add_button(&mut driver, Rect::new(0, 0, 60, 20));
        driver.tree_mut().destroy(button).unwrap();
        driver.click_at(Point::new(10, 10));

        assert!(!driver.tree().input().is_subscribed(button));
        let events = driver.drain_events();
        assert_eq!(count_ui_events!(events, UiEventKind::Clicked), 0);
    }
}
