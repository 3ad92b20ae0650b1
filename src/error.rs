//! Error types for textmark.

use std::fmt;

use crate::dom::NodeId;

/// Result type alias for textmark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for textmark operations.
#[derive(Debug)]
pub enum Error {
    /// Search pattern failed to compile.
    Pattern(regex::Error),
    /// Node id does not belong to this document.
    UnknownNode(NodeId),
    /// Operation requires an element node.
    NotAnElement(NodeId),
    /// Operation requires a text node.
    NotAText(NodeId),
    /// Node is not a child of the given parent.
    NotAChild { parent: NodeId, child: NodeId },
    /// Split offset past the end of a text node or not on a char boundary.
    InvalidOffset { offset: usize, len: usize },
    /// Insertion would make a node its own ancestor.
    CyclicInsertion(NodeId),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(e) => write!(f, "invalid search pattern: {e}"),
            Self::UnknownNode(id) => write!(f, "node {id} does not belong to this document"),
            Self::NotAnElement(id) => write!(f, "node {id} is not an element"),
            Self::NotAText(id) => write!(f, "node {id} is not a text node"),
            Self::NotAChild { parent, child } => {
                write!(f, "node {child} is not a child of {parent}")
            }
            Self::InvalidOffset { offset, len } => {
                write!(f, "invalid split offset {offset} for text of length {len}")
            }
            Self::CyclicInsertion(id) => {
                write!(f, "inserting node {id} would make it its own ancestor")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pattern(e) => Some(e),
            _ => None,
        }
    }
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Self::Pattern(e)
    }
}
