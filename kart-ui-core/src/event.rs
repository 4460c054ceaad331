//! Events raised by widgets for the game code to consume

use crate::dialog::DialogResult;
use crate::tree::NodeId;

/// What happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEventKind {
    /// A button was clicked
    Clicked,
    /// Enter was pressed in an active text box
    TextAccepted(String),
    /// A dialog panel closed with a result
    DialogClosed(DialogResult),
}

/// An event with the node that raised it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEvent {
    pub source: NodeId,
    pub kind: UiEventKind,
}

impl UiEvent {
    pub fn new(source: NodeId, kind: UiEventKind) -> Self {
        Self { source, kind }
    }

    pub fn is_click_on(&self, node: NodeId) -> bool {
        self.source == node && self.kind == UiEventKind::Clicked
    }
}
