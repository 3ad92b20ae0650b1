//! One-pass orchestration: unwrap old markers, wrap the current term.

use crate::dom::{Document, NodeId};
use crate::event::{LogLevel, emit_log};
use crate::highlight::{HighlightOptions, build_pattern, mark_subtree};

/// Runs highlighting passes over a subtree.
///
/// Every pass unwraps unconditionally before wrapping: the markers in
/// the tree are the source of truth for "a highlight exists", so stale
/// markers from a previous term can never survive a pass, whatever the
/// bookkeeping says. The `existing` flag is an informational hint
/// exposed through [`Coordinator::has_highlight`]; nothing is gated on
/// it.
#[derive(Clone, Debug, Default)]
pub struct Coordinator {
    options: HighlightOptions,
    existing: bool,
}

impl Coordinator {
    /// Coordinator with the default marker configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Coordinator with a custom marker configuration.
    #[must_use]
    pub fn with_options(options: HighlightOptions) -> Self {
        Self {
            options,
            existing: false,
        }
    }

    /// Marker configuration in use.
    #[must_use]
    pub fn options(&self) -> &HighlightOptions {
        &self.options
    }

    /// Whether the last pass left a highlight in the tree.
    #[must_use]
    pub fn has_highlight(&self) -> bool {
        self.existing
    }

    /// Run one pass: unwrap leftovers, then wrap the term's matches.
    ///
    /// An empty or absent term clears the highlight and stops there.
    /// A term that fails to compile is logged and treated the same way;
    /// nothing in a pass raises to the host. Returns the number of
    /// markers now in the tree.
    pub fn run(&mut self, doc: &mut Document, root: NodeId, term: Option<&str>) -> usize {
        let removed = self.unwrap_markers(doc, root);
        if removed > 0 {
            emit_log(
                LogLevel::Debug,
                &format!("unwrapped {removed} markers under {root}"),
            );
        }
        self.existing = false;

        let Some(term) = term.filter(|t| !t.is_empty()) else {
            return 0;
        };
        let pattern = match build_pattern(term) {
            Ok(pattern) => pattern,
            Err(err) => {
                emit_log(LogLevel::Warn, &format!("search term rejected: {err}"));
                return 0;
            }
        };

        mark_subtree(doc, root, &pattern, &self.options);
        let inserted = self.collect_markers(doc, root).len();
        self.existing = inserted > 0;
        if inserted > 0 {
            emit_log(
                LogLevel::Debug,
                &format!("wrapped {inserted} matches under {root}"),
            );
        }
        inserted
    }

    /// Remove every marker under `root`, splicing its text back in
    /// place and re-merging the surrounding text nodes. Returns how
    /// many markers were removed. Safe to call on a tree with none.
    pub fn unwrap_markers(&self, doc: &mut Document, root: NodeId) -> usize {
        let found = self.collect_markers(doc, root);
        let mut removed = 0;
        for marker in found {
            let Some(parent) = doc.parent(marker) else {
                continue;
            };
            if let Some(first) = doc.first_child(marker) {
                if doc.replace_child(parent, marker, first).is_err() {
                    continue;
                }
            } else if doc.remove_child(parent, marker).is_err() {
                continue;
            }
            doc.normalize(parent);
            removed += 1;
        }
        removed
    }

    /// Marker elements under `root` in document order.
    fn collect_markers(&self, doc: &Document, root: NodeId) -> Vec<NodeId> {
        doc.descendants(root)
            .filter(|&node| {
                doc.tag(node) == Some(self.options.tag())
                    && doc.class(node) == Some(self.options.class())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Document, NodeId) {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let text = doc.create_text("a cat and a dog");
        doc.append_child(root, text).unwrap();
        (doc, root)
    }

    fn marker_texts(coordinator: &Coordinator, doc: &Document, root: NodeId) -> Vec<String> {
        coordinator
            .collect_markers(doc, root)
            .into_iter()
            .map(|m| doc.text_content(m))
            .collect()
    }

    #[test]
    fn test_wrap_then_unwrap_round_trip() {
        let (mut doc, root) = fixture();
        let mut coordinator = Coordinator::new();

        coordinator.run(&mut doc, root, Some("cat"));
        assert!(coordinator.has_highlight());
        assert_eq!(marker_texts(&coordinator, &doc, root), vec!["cat"]);

        coordinator.run(&mut doc, root, None);
        assert!(!coordinator.has_highlight());
        assert!(coordinator.collect_markers(&doc, root).is_empty());
        assert_eq!(doc.text_content(root), "a cat and a dog");
        assert_eq!(doc.children(root).len(), 1, "text nodes re-merged");
    }

    #[test]
    fn test_term_change_replaces_markers() {
        let (mut doc, root) = fixture();
        let mut coordinator = Coordinator::new();

        coordinator.run(&mut doc, root, Some("cat"));
        coordinator.run(&mut doc, root, Some("dog"));

        assert_eq!(marker_texts(&coordinator, &doc, root), vec!["dog"]);
        assert_eq!(doc.text_content(root), "a cat and a dog");
    }

    #[test]
    fn test_repeated_same_term_is_stable() {
        let (mut doc, root) = fixture();
        let mut coordinator = Coordinator::new();

        coordinator.run(&mut doc, root, Some("a"));
        let first = marker_texts(&coordinator, &doc, root);
        coordinator.run(&mut doc, root, Some("a"));
        let second = marker_texts(&coordinator, &doc, root);

        assert_eq!(first, second);
        assert_eq!(doc.text_content(root), "a cat and a dog");
    }

    #[test]
    fn test_unwrap_is_idempotent() {
        let (mut doc, root) = fixture();
        let mut coordinator = Coordinator::new();
        coordinator.run(&mut doc, root, Some("cat"));

        assert_eq!(coordinator.unwrap_markers(&mut doc, root), 1);
        assert_eq!(coordinator.unwrap_markers(&mut doc, root), 0);
        assert_eq!(doc.text_content(root), "a cat and a dog");
    }

    #[test]
    fn test_unwrap_without_flag_still_removes() {
        // markers present but the coordinator never saw them: the tree
        // wins over the flag
        let (mut doc, root) = fixture();
        let mut outsider = Coordinator::new();
        outsider.run(&mut doc, root, Some("cat"));

        let mut coordinator = Coordinator::new();
        assert!(!coordinator.has_highlight());
        coordinator.run(&mut doc, root, None);
        assert!(coordinator.collect_markers(&doc, root).is_empty());
        assert_eq!(doc.text_content(root), "a cat and a dog");
    }

    #[test]
    fn test_no_match_leaves_no_highlight() {
        let (mut doc, root) = fixture();
        let mut coordinator = Coordinator::new();

        assert_eq!(coordinator.run(&mut doc, root, Some("zebra")), 0);
        assert!(!coordinator.has_highlight());
        assert_eq!(doc.text_content(root), "a cat and a dog");
    }

    #[test]
    fn test_empty_term_equivalent_to_none() {
        let (mut doc, root) = fixture();
        let mut coordinator = Coordinator::new();
        coordinator.run(&mut doc, root, Some("cat"));

        coordinator.run(&mut doc, root, Some(""));
        assert!(!coordinator.has_highlight());
        assert!(coordinator.collect_markers(&doc, root).is_empty());
    }

    #[test]
    fn test_empty_root() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let mut coordinator = Coordinator::new();

        assert_eq!(coordinator.run(&mut doc, root, Some("anything")), 0);
        assert!(!coordinator.has_highlight());
    }

    #[test]
    fn test_custom_marker_options() {
        let (mut doc, root) = fixture();
        let options = HighlightOptions::new().with_tag("em").with_class("hit");
        let mut coordinator = Coordinator::with_options(options);

        coordinator.run(&mut doc, root, Some("dog"));
        let found = coordinator.collect_markers(&doc, root);
        assert_eq!(found.len(), 1);
        assert_eq!(doc.tag(found[0]), Some("em"));
        assert_eq!(doc.class(found[0]), Some("hit"));
    }
}
