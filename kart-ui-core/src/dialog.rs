//! Modal dialogs composed from a stack panel
//!
//! A dialog is an ordinary stack panel that `create_dialog` has given a title,
//! the caller's body and an OK/Cancel pair. Showing it attaches it to the root
//! as an exclusive overlay and hands back a [`DialogHandle`] that resolves
//! when one of the buttons is clicked.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::component::{Component, HorizontalAnchor};
use crate::error::UiError;
use crate::geometry::Rect;
use crate::tree::{NodeId, UiTree, Widget};

/// Outcome of a dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DialogResult {
    /// Still open, or dropped before either button was clicked
    #[default]
    Unresolved,
    Accepted,
    Cancelled,
}

#[derive(Debug)]
pub(crate) struct DialogState {
    pub(crate) title: NodeId,
    pub(crate) ok: NodeId,
    pub(crate) cancel: NodeId,
    pub(crate) result: DialogResult,
    pub(crate) opened: bool,
    waiter: Option<oneshot::Sender<DialogResult>>,
}

/// Awaitable result of one showing of a dialog
///
/// Resolves to [`DialogResult::Unresolved`] if the dialog is destroyed while
/// open.
#[derive(Debug)]
pub struct DialogHandle {
    panel: NodeId,
    rx: oneshot::Receiver<DialogResult>,
    resolved: Option<DialogResult>,
}

impl DialogHandle {
    pub fn panel(&self) -> NodeId {
        self.panel
    }

    /// The result if the dialog has closed, without waiting
    pub fn try_result(&mut self) -> Option<DialogResult> {
        if self.resolved.is_none() {
            match self.rx.try_recv() {
                Ok(result) => self.resolved = Some(result),
                Err(oneshot::error::TryRecvError::Closed) => {
                    self.resolved = Some(DialogResult::Unresolved)
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
            }
        }
        self.resolved
    }
}

impl Future for DialogHandle {
    type Output = DialogResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(result) = self.resolved {
            return Poll::Ready(result);
        }
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(received) => {
                let result = received.unwrap_or(DialogResult::Unresolved);
                self.resolved = Some(result);
                Poll::Ready(result)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl UiTree {
    /// Turn `panel` into a dialog: centered, titled, holding `body` under
    /// `body_anchor`, followed by OK and Cancel buttons.
    ///
    /// With `style`, text boxes in `body` get the dialog look.
    pub fn create_dialog(
        &mut self,
        panel: NodeId,
        title: impl Into<String>,
        body_anchor: HorizontalAnchor,
        style: bool,
        body: &[NodeId],
    ) -> Result<(), UiError> {
        if !matches!(self.node(panel)?.widget, Widget::StackPanel(_)) {
            return Err(UiError::NotAContainer(panel));
        }
        self.node_mut(panel)?.component.set_center_screen();

        let config = self.config.clone();
        let title = self.insert(
            Component::text_with_font(
                config.title_font,
                title,
                config.theme.title,
                config.dialog.title_padding,
            )
            .with_h_anchor(HorizontalAnchor::Center),
        );
        self.add_range(panel, HorizontalAnchor::Center, &[title])?;

        if style {
            for &id in body {
                self.restyle_text_box(id)?;
            }
        }
        self.add_range(panel, body_anchor, body)?;

        let dialog = config.dialog;
        let ok = self.insert_button(
            dialog.ok_label,
            config.theme.dialog_ok,
            Rect::from_parts(dialog.ok_padding, dialog.button_size),
            HorizontalAnchor::None,
        );
        let cancel = self.insert_button(
            dialog.cancel_label,
            config.theme.dialog_cancel,
            Rect::from_parts(dialog.cancel_padding, dialog.button_size),
            HorizontalAnchor::None,
        );
        self.add_range(panel, HorizontalAnchor::Center, &[ok, cancel])?;

        self.node_mut(panel)?.dialog = Some(DialogState {
            title,
            ok,
            cancel,
            result: DialogResult::Unresolved,
            opened: false,
            waiter: None,
        });
        debug!(node = %panel, "dialog created");
        Ok(())
    }

    /// Open `panel` as a modal overlay on the root.
    ///
    /// The result is reset on every showing, so a dialog can be reused.
    pub fn show_as_dialog(&mut self, panel: NodeId) -> Result<DialogHandle, UiError> {
        let node = self.node_mut(panel)?;
        let dialog = node.dialog.as_mut().ok_or(UiError::NotADialog(panel))?;
        if dialog.opened {
            return Err(UiError::DialogAlreadyOpen(panel));
        }
        let (tx, rx) = oneshot::channel();
        dialog.opened = true;
        dialog.result = DialogResult::Unresolved;
        dialog.waiter = Some(tx);
        node.component.exclusive = true;

        let root = self.root();
        self.attach(panel, root)?;
        info!(node = %panel, "dialog shown");
        Ok(DialogHandle {
            panel,
            rx,
            resolved: None,
        })
    }

    /// Close an open dialog with its current result.
    ///
    /// Returns the result, or `None` if `panel` is not an open dialog.
    pub fn close_dialog(&mut self, panel: NodeId) -> Result<Option<DialogResult>, UiError> {
        let Some(dialog) = self.get_mut(panel).and_then(|n| n.dialog.as_mut()) else {
            return Ok(None);
        };
        if !dialog.opened {
            return Ok(None);
        }
        dialog.opened = false;
        let result = dialog.result;
        let waiter = dialog.waiter.take();

        self.detach(panel, true)?;
        self.node_mut(panel)?.component.exclusive = false;
        if let Some(waiter) = waiter {
            // the caller may have dropped the handle
            let _ = waiter.send(result);
        }
        info!(node = %panel, ?result, "dialog closed");
        Ok(Some(result))
    }

    /// Record `result` on an open dialog and close it
    pub fn resolve_dialog(&mut self, panel: NodeId, result: DialogResult) -> Result<Option<DialogResult>, UiError> {
        match self.get_mut(panel).and_then(|n| n.dialog.as_mut()) {
            Some(dialog) if dialog.opened => dialog.result = result,
            _ => return Ok(None),
        }
        self.close_dialog(panel)
    }

    /// The dialog and outcome that clicking `button` selects, if it is one of
    /// a dialog's OK/Cancel buttons
    pub(crate) fn dialog_button(&self, button: NodeId) -> Option<(NodeId, DialogResult)> {
        let panel = self.parent(button)?;
        let dialog = self.get(panel)?.dialog.as_ref()?;
        if button == dialog.ok {
            Some((panel, DialogResult::Accepted))
        } else if button == dialog.cancel {
            Some((panel, DialogResult::Cancelled))
        } else {
            None
        }
    }

    pub fn is_dialog_open(&self, panel: NodeId) -> bool {
        self.get(panel)
            .and_then(|n| n.dialog.as_ref())
            .is_some_and(|d| d.opened)
    }

    /// Current result of a dialog, if `panel` is one
    pub fn dialog_result(&self, panel: NodeId) -> Option<DialogResult> {
        self.get(panel)?.dialog.as_ref().map(|d| d.result)
    }

    /// Title, OK and Cancel nodes of a dialog
    pub fn dialog_parts(&self, panel: NodeId) -> Option<(NodeId, NodeId, NodeId)> {
        let dialog = self.get(panel)?.dialog.as_ref()?;
        Some((dialog.title, dialog.ok, dialog.cancel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::VerticalAnchor;
    use crate::config::UiConfig;
    use crate::font::MonospaceMetrics;
    use crate::geometry::Size;

    fn tree() -> UiTree {
        UiTree::new(Size::new(800, 600), MonospaceMetrics::default(), UiConfig::default())
    }

    fn dialog(tree: &mut UiTree) -> (NodeId, NodeId) {
        let panel = tree.insert_panel();
        let colors = tree.config().theme.text_box;
        let name = tree.insert_text_box("", colors, Rect::new(10, 10, 200, 30), HorizontalAnchor::None);
        tree.create_dialog(panel, "Name?", HorizontalAnchor::Left, true, &[name]).unwrap();
        (panel, name)
    }

    #[test]
    fn test_create_dialog_layout() {
        let mut tree = tree();
        let (panel, name) = dialog(&mut tree);
        let (title, ok, cancel) = tree.dialog_parts(panel).unwrap();

        assert_eq!(tree.children(panel), vec![title, name, ok, cancel]);
        let c = tree.component(panel).unwrap();
        assert_eq!(c.h_anchor, HorizontalAnchor::Center);
        assert_eq!(c.v_anchor, VerticalAnchor::Center);
        assert_eq!(tree.component(ok).unwrap().size(), Size::new(135, 35));
        assert_eq!(tree.component(ok).unwrap().h_anchor, HorizontalAnchor::Center);
        // styled text box fills the panel width
        assert_eq!(tree.component(name).unwrap().size().height, 40);
        assert_eq!(tree.node(name).unwrap().as_text_box().unwrap().colors, tree.config().theme.dialog_text_box);
        assert!(!tree.is_dialog_open(panel));
    }

    #[test]
    fn test_show_attaches_exclusive() {
        let mut tree = tree();
        let (panel, _) = dialog(&mut tree);

        let _handle = tree.show_as_dialog(panel).unwrap();

        assert_eq!(tree.parent(panel), Some(tree.root()));
        assert!(tree.component(panel).unwrap().exclusive);
        assert!(tree.is_dialog_open(panel));
        assert_eq!(tree.show_as_dialog(panel).unwrap_err(), UiError::DialogAlreadyOpen(panel));
    }

    #[test]
    fn test_show_requires_dialog() {
        let mut tree = tree();
        let panel = tree.insert_panel();
        assert_eq!(tree.show_as_dialog(panel).unwrap_err(), UiError::NotADialog(panel));
    }

    #[test]
    fn test_resolve_closes_and_notifies() {
        let mut tree = tree();
        let (panel, _) = dialog(&mut tree);
        let mut handle = tree.show_as_dialog(panel).unwrap();
        assert_eq!(handle.try_result(), None);

        assert_eq!(tree.resolve_dialog(panel, DialogResult::Accepted).unwrap(), Some(DialogResult::Accepted));

        assert_eq!(handle.try_result(), Some(DialogResult::Accepted));
        assert_eq!(tree.parent(panel), None);
        assert!(!tree.component(panel).unwrap().exclusive);
        // closing again is a no-op
        assert_eq!(tree.close_dialog(panel).unwrap(), None);
    }

    #[test]
    fn test_reuse_resets_result() {
        let mut tree = tree();
        let (panel, _) = dialog(&mut tree);
        tree.show_as_dialog(panel).unwrap();
        tree.resolve_dialog(panel, DialogResult::Cancelled).unwrap();

        let mut handle = tree.show_as_dialog(panel).unwrap();

        assert_eq!(tree.dialog_result(panel), Some(DialogResult::Unresolved));
        assert_eq!(handle.try_result(), None);
    }

    #[test]
    fn test_destroyed_dialog_resolves_unresolved() {
        let mut tree = tree();
        let (panel, _) = dialog(&mut tree);
        let mut handle = tree.show_as_dialog(panel).unwrap();

        tree.destroy(panel).unwrap();

        assert_eq!(handle.try_result(), Some(DialogResult::Unresolved));
    }

    #[test]
    fn test_dialog_button_lookup() {
        let mut tree = tree();
        let (panel, name) = dialog(&mut tree);
        let (_, ok, cancel) = tree.dialog_parts(panel).unwrap();

        assert_eq!(tree.dialog_button(ok), Some((panel, DialogResult::Accepted)));
        assert_eq!(tree.dialog_button(cancel), Some((panel, DialogResult::Cancelled)));
        assert_eq!(tree.dialog_button(name), None);
    }

    #[tokio::test]
    async fn test_handle_awaits_result() {
        let mut tree = tree();
        let (panel, _) = dialog(&mut tree);
        let handle = tree.show_as_dialog(panel).unwrap();
        tree.resolve_dialog(panel, DialogResult::Accepted).unwrap();

        assert_eq!(handle.await, DialogResult::Accepted);
    }
}
