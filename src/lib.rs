//! `textmark` - live text highlighting for mutable document trees
//!
//! Scans a document subtree for occurrences of a search term, wraps each
//! match in a marker element, and keeps the highlight correct as the
//! subtree changes underneath it (text replaced, nodes added or removed,
//! content re-rendered).
//!
//! The engine operates on an explicit arena-backed [`Document`] tree and
//! never reacts to its own edits: the mutation watcher is paused for the
//! duration of every highlighting pass.
//!
//! # Example
//!
//! ```
//! use textmark::{Document, TextHighlight};
//!
//! let mut doc = Document::new();
//! let root = doc.create_element("div");
//! let text = doc.create_text("The quick brown Fox");
//! doc.append_child(root, text).unwrap();
//!
//! let mut highlight = TextHighlight::new();
//! highlight.set_term(&mut doc, Some("fox"));
//! highlight.attach(&mut doc, root);
//!
//! assert!(highlight.has_highlight());
//! assert_eq!(doc.text_content(root), "The quick brown Fox");
//!
//! // Clearing the term unwraps every marker.
//! highlight.set_term(&mut doc, None);
//! assert!(!highlight.has_highlight());
//! ```

// Crate-level lint configuration
#![warn(unsafe_code)]
#![allow(clippy::module_name_repetitions)] // Allow WatchOptions, TextMatch etc
#![allow(clippy::missing_errors_doc)] // Error conditions documented on the Error type
#![allow(clippy::missing_panics_doc)] // Public API does not panic outside of tests
#![allow(clippy::must_use_candidate)] // Accessors are obviously pure
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::option_if_let_else)] // if-let-else is clearer for structural code
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine

pub mod dom;
pub mod error;
pub mod event;
pub mod highlight;
pub mod lifecycle;
pub mod watch;

// Re-export core types at crate root
pub use dom::{Document, NodeId};
pub use error::{Error, Result};
pub use event::{LogLevel, emit_log, set_log_callback};
pub use highlight::{
    Coordinator, HighlightOptions, MARK_CLASS, MARK_TAG, TextMatch, build_pattern, first_match,
    mark_subtree,
};
pub use lifecycle::{LifecycleState, TextHighlight};
pub use watch::{MutationCallback, MutationWatcher, RevisionWatcher, WatchOptions};
