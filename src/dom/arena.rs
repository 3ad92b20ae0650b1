//! Document storage and structural mutation.

use std::fmt;

use crate::dom::iter::Descendants;
use crate::error::{Error, Result};

/// Opaque handle to a node inside a [`Document`].
///
/// Ids are cheap to copy and remain valid for the lifetime of the
/// document; detaching a node from the tree does not invalidate its id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
enum NodeKind {
    Element {
        tag: String,
        class: Option<String>,
        children: Vec<NodeId>,
    },
    Text(String),
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    kind: NodeKind,
}

const NO_CHILDREN: &[NodeId] = &[];

/// Arena holding every node of one document subtree.
///
/// Nodes are never freed; a removed node is merely detached from its
/// parent. That keeps every `NodeId` valid forever, which is all the
/// highlighter needs for typical UI widget subtrees.
#[derive(Clone, Debug, Default)]
pub struct Document {
    nodes: Vec<Node>,
    child_list_rev: u64,
    character_data_rev: u64,
    attribute_rev: u64,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever allocated, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the document holds no nodes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ------------------------------------------------------------------
    // Node creation
    // ------------------------------------------------------------------

    /// Allocate a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_string(),
            class: None,
            children: Vec::new(),
        })
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { parent: None, kind });
        id
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Parent of a node, if attached.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of a node in document order; empty for text nodes.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Element { children, .. }) => children,
            _ => NO_CHILDREN,
        }
    }

    /// Child at a given index, if present.
    #[must_use]
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    /// First child of a node, if present.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.child_at(id, 0)
    }

    /// Whether the id names a text node.
    #[must_use]
    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.node(id).map(|n| &n.kind), Some(NodeKind::Text(_)))
    }

    /// Whether the id names an element node.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(
            self.node(id).map(|n| &n.kind),
            Some(NodeKind::Element { .. })
        )
    }

    /// Content of a text node, or `None` for elements.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Tag of an element node, or `None` for text nodes.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Element { tag, .. }) => Some(tag),
            _ => None,
        }
    }

    /// Class of an element node, if one was set.
    #[must_use]
    pub fn class(&self, id: NodeId) -> Option<&str> {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Element { class, .. }) => class.as_deref(),
            _ => None,
        }
    }

    /// Concatenated text of a node and all its descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(t) = self.text(id) {
            out.push_str(t);
        }
        for node in self.descendants(id) {
            if let Some(t) = self.text(node) {
                out.push_str(t);
            }
        }
        out
    }

    /// Iterate a node's descendants in document order, excluding the
    /// node itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants::new(self, id)
    }

    // ------------------------------------------------------------------
    // Revision counters
    // ------------------------------------------------------------------

    /// Revision counter bumped on every child-list change.
    #[must_use]
    pub fn child_list_revision(&self) -> u64 {
        self.child_list_rev
    }

    /// Revision counter bumped on every text-content change.
    #[must_use]
    pub fn character_data_revision(&self) -> u64 {
        self.character_data_rev
    }

    /// Revision counter bumped on every attribute change.
    #[must_use]
    pub fn attribute_revision(&self) -> u64 {
        self.attribute_rev
    }

    // ------------------------------------------------------------------
    // Structural mutation
    // ------------------------------------------------------------------

    /// Append a child to an element, detaching it from any current parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_attachable(parent, child)?;
        self.detach(child);
        match self.node_mut(parent).map(|n| &mut n.kind) {
            Some(NodeKind::Element { children, .. }) => children.push(child),
            _ => return Err(Error::NotAnElement(parent)),
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        self.child_list_rev += 1;
        Ok(())
    }

    /// Remove a child from its parent. The node stays allocated but
    /// detached.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let index = self.index_of(parent, child)?;
        if let Some(NodeKind::Element { children, .. }) =
            self.node_mut(parent).map(|n| &mut n.kind)
        {
            children.remove(index);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
        self.child_list_rev += 1;
        Ok(())
    }

    /// Replace `old` with `new` in `parent`'s child list.
    ///
    /// `new` is detached from its current parent first, so replacing a
    /// node with one of its own children works (the unwrap operation
    /// relies on this).
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> Result<()> {
        self.check_attachable(parent, new)?;
        self.index_of(parent, old)?;
        self.detach(new);
        // recompute: detaching `new` shifts old's index when they were siblings
        let index = self.index_of(parent, old)?;
        if let Some(NodeKind::Element { children, .. }) =
            self.node_mut(parent).map(|n| &mut n.kind)
        {
            children[index] = new;
        }
        if let Some(node) = self.node_mut(old) {
            node.parent = None;
        }
        if let Some(node) = self.node_mut(new) {
            node.parent = Some(parent);
        }
        self.child_list_rev += 1;
        Ok(())
    }

    /// Truncate a text node at `offset` and insert the tail as its next
    /// sibling, mirroring the DOM `Text.splitText` contract. Returns the
    /// tail node's id.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Result<NodeId> {
        let tail = match self.node_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Text(s)) => {
                if offset > s.len() || !s.is_char_boundary(offset) {
                    return Err(Error::InvalidOffset {
                        offset,
                        len: s.len(),
                    });
                }
                s.split_off(offset)
            }
            Some(NodeKind::Element { .. }) => return Err(Error::NotAText(id)),
            None => return Err(Error::UnknownNode(id)),
        };
        self.character_data_rev += 1;
        let tail_id = self.create_text(&tail);
        if let Some(parent) = self.parent(id) {
            let index = self.index_of(parent, id)?;
            if let Some(NodeKind::Element { children, .. }) =
                self.node_mut(parent).map(|n| &mut n.kind)
            {
                children.insert(index + 1, tail_id);
            }
            if let Some(node) = self.node_mut(tail_id) {
                node.parent = Some(parent);
            }
            self.child_list_rev += 1;
        }
        Ok(tail_id)
    }

    /// Replace the content of a text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<()> {
        match self.node_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Text(s)) => {
                *s = text.to_string();
                self.character_data_rev += 1;
                Ok(())
            }
            Some(NodeKind::Element { .. }) => Err(Error::NotAText(id)),
            None => Err(Error::UnknownNode(id)),
        }
    }

    /// Set the class of an element node.
    pub fn set_class(&mut self, id: NodeId, class: &str) -> Result<()> {
        match self.node_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Element { class: slot, .. }) => {
                *slot = Some(class.to_string());
                self.attribute_rev += 1;
                Ok(())
            }
            Some(NodeKind::Text(_)) => Err(Error::NotAnElement(id)),
            None => Err(Error::UnknownNode(id)),
        }
    }

    /// Merge adjacent text children and drop empty ones, recursively,
    /// mirroring the DOM `Node.normalize` contract.
    pub fn normalize(&mut self, id: NodeId) {
        let kids: Vec<NodeId> = self.children(id).to_vec();
        for kid in kids {
            if self.is_element(kid) {
                self.normalize(kid);
            }
        }

        let mut i = 0;
        while let Some(child) = self.child_at(id, i) {
            if self.is_text(child) {
                if self.text(child).is_some_and(str::is_empty) {
                    let _ = self.remove_child(id, child);
                    continue; // index i now names the next child
                }
                while let Some(next) = self.child_at(id, i + 1) {
                    if !self.is_text(next) {
                        break;
                    }
                    let tail = match self.text(next) {
                        Some(t) => t.to_string(),
                        None => break,
                    };
                    if let Some(NodeKind::Text(s)) = self.node_mut(child).map(|n| &mut n.kind) {
                        s.push_str(&tail);
                        self.character_data_rev += 1;
                    }
                    let _ = self.remove_child(id, next);
                }
            }
            i += 1;
        }
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    fn index_of(&self, parent: NodeId, child: NodeId) -> Result<usize> {
        if self.node(parent).is_none() {
            return Err(Error::UnknownNode(parent));
        }
        match self.node(parent).map(|n| &n.kind) {
            Some(NodeKind::Element { children, .. }) => children
                .iter()
                .position(|&c| c == child)
                .ok_or(Error::NotAChild { parent, child }),
            _ => Err(Error::NotAnElement(parent)),
        }
    }

    /// Validate that `child` may be attached under `parent`.
    fn check_attachable(&self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.node(child).is_none() {
            return Err(Error::UnknownNode(child));
        }
        match self.node(parent).map(|n| &n.kind) {
            Some(NodeKind::Element { .. }) => {}
            Some(NodeKind::Text(_)) => return Err(Error::NotAnElement(parent)),
            None => return Err(Error::UnknownNode(parent)),
        }
        // walking up from parent must never reach child
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(Error::CyclicInsertion(child));
            }
            cursor = self.parent(node);
        }
        Ok(())
    }

    /// Detach a node from its parent without touching revision counters.
    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(NodeKind::Element { children, .. }) =
            self.node_mut(parent).map(|n| &mut n.kind)
        {
            children.retain(|&c| c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }
}
