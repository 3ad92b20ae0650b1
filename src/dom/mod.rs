//! Arena-backed document tree.
//!
//! The engine highlights text inside a live tree of element and text
//! nodes. All nodes are owned by a [`Document`] arena and addressed by
//! copyable [`NodeId`]s, so traversal code can hold node references while
//! structural edits splice the tree underneath it.
//!
//! The mutation surface mirrors the handful of tree operations the
//! highlighter needs: `append_child`, `remove_child`, `replace_child`,
//! `split_text` (truncate a text node and insert the tail as its next
//! sibling) and `normalize` (re-merge adjacent text siblings).
//!
//! Every mutation bumps a per-kind revision counter (child list,
//! character data, attributes) that the [`crate::watch`] module compares
//! across host ticks to detect external changes.
//!
//! # Examples
//!
//! ```
//! use textmark::Document;
//!
//! let mut doc = Document::new();
//! let root = doc.create_element("p");
//! let text = doc.create_text("hello world");
//! doc.append_child(root, text).unwrap();
//!
//! let tail = doc.split_text(text, 5).unwrap();
//! assert_eq!(doc.text(text), Some("hello"));
//! assert_eq!(doc.text(tail), Some(" world"));
//! assert_eq!(doc.text_content(root), "hello world");
//!
//! doc.normalize(root);
//! assert_eq!(doc.children(root).len(), 1);
//! ```

mod arena;
mod iter;

pub use arena::{Document, NodeId};
pub use iter::Descendants;
