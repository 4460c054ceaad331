//! Error types

use std::fmt;

use crate::tree::NodeId;

/// Errors raised by tree operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    /// The handle does not refer to a live node
    UnknownNode(NodeId),
    /// Children can only be attached to containers
    NotAContainer(NodeId),
    /// The panel was never composed with `create_dialog`
    NotADialog(NodeId),
    /// `show_as_dialog` on a dialog that is already open
    DialogAlreadyOpen(NodeId),
    /// Attaching would make a node its own ancestor
    CyclicAttach { child: NodeId, parent: NodeId },
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::UnknownNode(id) => write!(f, "no live node for {}", id),
            UiError::NotAContainer(id) => write!(f, "{} cannot hold children", id),
            UiError::NotADialog(id) => write!(f, "{} is not a dialog", id),
            UiError::DialogAlreadyOpen(id) => {
                write!(f, "dialog {} is already open and cannot be opened again", id)
            }
            UiError::CyclicAttach { child, parent } => {
                write!(f, "cannot attach {} beneath its descendant {}", child, parent)
            }
        }
    }
}

impl std::error::Error for UiError {}

/// Errors raised while loading a [`UiConfig`](crate::config::UiConfig)
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "unable to read UI config: {}", e),
            ConfigError::Parse(e) => write!(f, "invalid UI config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
