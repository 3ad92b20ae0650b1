//! Document-order traversal.

use crate::dom::{Document, NodeId};

/// Pre-order iterator over a node's descendants, excluding the node
/// itself.
///
/// The iterator snapshots child lists lazily as it descends; it must not
/// be held across structural edits.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(doc: &'a Document, root: NodeId) -> Self {
        let mut stack: Vec<NodeId> = doc.children(root).to_vec();
        stack.reverse();
        Self { doc, stack }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        let children = self.doc.children(node);
        self.stack.extend(children.iter().rev());
        Some(node)
    }
}
