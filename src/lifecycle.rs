//! View lifecycle wiring: when to run passes, when to stand down.
//!
//! [`TextHighlight`] is the piece the host view talks to. It reacts to
//! three external signals (term changed, view ready, view destroyed)
//! plus the watcher's "subtree mutated" notification, and it guarantees
//! the watcher is never armed while a pass is editing the tree.

use std::cell::Cell;
use std::rc::Rc;

use crate::dom::{Document, NodeId};
use crate::event::{LogLevel, emit_log};
use crate::highlight::{Coordinator, HighlightOptions};
use crate::watch::{MutationCallback, MutationWatcher, RevisionWatcher, WatchOptions};

/// Mutation kinds the engine subscribes to. Attribute changes are
/// deliberately excluded; markers carry a class, and watching
/// attributes would observe our own `set_class` calls.
const OBSERVE_OPTIONS: WatchOptions = WatchOptions::CHILD_LIST.union(WatchOptions::CHARACTER_DATA);

/// Lifecycle of one engine instance. Terminal state is final; a torn
/// down instance never observes or edits again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Observing,
    TornDown,
}

/// Stops a watcher for the duration of an edit window.
///
/// Acquired before a pass mutates the tree; [`WatchPause::resume`]
/// re-arms the watcher against the document's post-edit state, so the
/// pass's own edits are never reported back. A guard abandoned without
/// `resume` leaves the watcher stopped.
struct WatchPause<'a, W: MutationWatcher> {
    watcher: &'a mut W,
    root: NodeId,
    callback: MutationCallback,
}

impl<'a, W: MutationWatcher> WatchPause<'a, W> {
    fn new(watcher: &'a mut W, root: NodeId, callback: MutationCallback) -> Self {
        watcher.stop();
        Self {
            watcher,
            root,
            callback,
        }
    }

    fn resume(self, doc: &Document) {
        self.watcher.start(doc, self.root, OBSERVE_OPTIONS, self.callback);
    }
}

/// Live text highlighting bound to a host view's lifecycle.
///
/// The host owns the document and drives the engine with discrete
/// calls; the engine owns the search term, the watcher and the
/// pass bookkeeping. See the crate docs for a usage example.
pub struct TextHighlight<W: MutationWatcher = RevisionWatcher> {
    term: Option<String>,
    root: Option<NodeId>,
    state: LifecycleState,
    watcher: W,
    pending: Rc<Cell<bool>>,
    coordinator: Coordinator,
}

impl TextHighlight<RevisionWatcher> {
    /// Engine with the default revision-based watcher and marker
    /// configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_watcher(RevisionWatcher::new())
    }

    /// Engine with custom marker configuration.
    #[must_use]
    pub fn with_options(options: HighlightOptions) -> Self {
        let mut engine = Self::new();
        engine.coordinator = Coordinator::with_options(options);
        engine
    }
}

impl Default for TextHighlight<RevisionWatcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: MutationWatcher> TextHighlight<W> {
    /// Engine with a custom watcher implementation.
    #[must_use]
    pub fn with_watcher(watcher: W) -> Self {
        Self {
            term: None,
            root: None,
            state: LifecycleState::Uninitialized,
            watcher,
            pending: Rc::new(Cell::new(false)),
            coordinator: Coordinator::new(),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Current search term.
    #[must_use]
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    /// Whether the last pass left a highlight in the tree.
    #[must_use]
    pub fn has_highlight(&self) -> bool {
        self.coordinator.has_highlight()
    }

    /// Update the search term.
    ///
    /// Before the view is ready this only stores the term; the pass it
    /// implies runs at [`TextHighlight::attach`] time. While observing,
    /// a changed term triggers one pass immediately. After teardown
    /// this is a no-op.
    pub fn set_term(&mut self, doc: &mut Document, term: Option<&str>) {
        if self.state == LifecycleState::TornDown {
            return;
        }
        if self.term.as_deref() == term {
            return;
        }
        self.term = term.map(str::to_string);
        if self.state == LifecycleState::Observing {
            self.run_pass(doc);
        }
    }

    /// View ready: bind to the subtree root and begin observing.
    ///
    /// If a term is already present, one pass runs immediately. Calling
    /// `attach` more than once, or after teardown, is a no-op.
    pub fn attach(&mut self, doc: &mut Document, root: NodeId) {
        if self.state != LifecycleState::Uninitialized {
            return;
        }
        self.root = Some(root);
        self.state = LifecycleState::Observing;
        let callback = self.make_callback();
        self.watcher.start(doc, root, OBSERVE_OPTIONS, callback);
        if self.term.as_deref().is_some_and(|t| !t.is_empty()) {
            self.run_pass(doc);
        }
    }

    /// Host tick: let the watcher inspect the document and, if a batch
    /// of external mutations was observed, re-run the pass so the
    /// highlight tracks the new content.
    pub fn poll(&mut self, doc: &mut Document) {
        if self.state != LifecycleState::Observing {
            return;
        }
        self.watcher.tick(doc);
        if self.pending.get() {
            emit_log(LogLevel::Debug, "subtree mutated, re-running highlight");
            self.run_pass(doc);
        }
    }

    /// View destroyed: stop the watcher for good.
    pub fn detach(&mut self) {
        if self.state == LifecycleState::Observing {
            self.watcher.stop();
        }
        self.state = LifecycleState::TornDown;
    }

    fn make_callback(&self) -> MutationCallback {
        let pending = Rc::clone(&self.pending);
        Box::new(move || pending.set(true))
    }

    /// One unwrap-then-wrap pass with the watcher paused throughout.
    fn run_pass(&mut self, doc: &mut Document) {
        let Some(root) = self.root else {
            return;
        };
        let callback = self.make_callback();
        let pause = WatchPause::new(&mut self.watcher, root, callback);
        self.coordinator.run(doc, root, self.term.as_deref());
        self.pending.set(false);
        pause.resume(doc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let text = doc.create_text("red fox");
        doc.append_child(root, text).unwrap();
        (doc, root, text)
    }

    fn marker_texts(doc: &Document, root: NodeId) -> Vec<String> {
        doc.descendants(root)
            .filter(|&n| doc.tag(n) == Some(crate::highlight::MARK_TAG))
            .map(|n| doc.text_content(n))
            .collect()
    }

    #[test]
    fn test_attach_runs_initial_pass_when_term_present() {
        let (mut doc, root, _) = fixture();
        let mut engine = TextHighlight::new();

        engine.set_term(&mut doc, Some("fox"));
        assert!(!engine.has_highlight(), "no pass before the view is ready");

        engine.attach(&mut doc, root);
        assert_eq!(engine.state(), LifecycleState::Observing);
        assert!(engine.has_highlight());
        assert_eq!(marker_texts(&doc, root), vec!["fox"]);
    }

    #[test]
    fn test_attach_without_term_waits() {
        let (mut doc, root, _) = fixture();
        let mut engine = TextHighlight::new();
        engine.attach(&mut doc, root);
        assert!(!engine.has_highlight());

        engine.set_term(&mut doc, Some("red"));
        assert_eq!(marker_texts(&doc, root), vec!["red"]);
    }

    #[test]
    fn test_term_change_swaps_highlight() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let text = doc.create_text("a cat and a dog");
        doc.append_child(root, text).unwrap();

        let mut engine = TextHighlight::new();
        engine.attach(&mut doc, root);
        engine.set_term(&mut doc, Some("cat"));
        engine.set_term(&mut doc, Some("dog"));

        assert_eq!(marker_texts(&doc, root), vec!["dog"]);
        assert_eq!(doc.text_content(root), "a cat and a dog");
    }

    #[test]
    fn test_own_edits_do_not_loop() {
        let (mut doc, root, _) = fixture();
        let mut engine = TextHighlight::new();
        engine.set_term(&mut doc, Some("fox"));
        engine.attach(&mut doc, root);

        let revision = doc.child_list_revision();
        engine.poll(&mut doc);
        engine.poll(&mut doc);
        assert_eq!(
            doc.child_list_revision(),
            revision,
            "polling without external edits must not touch the tree"
        );
    }

    #[test]
    fn test_external_mutation_triggers_rehighlight() {
        let (mut doc, root, _) = fixture();
        let mut engine = TextHighlight::new();
        engine.set_term(&mut doc, Some("fox"));
        engine.attach(&mut doc, root);

        // host re-renders the subtree with new content
        for child in doc.children(root).to_vec() {
            doc.remove_child(root, child).unwrap();
        }
        let fresh = doc.create_text("red fox jumps fox");
        doc.append_child(root, fresh).unwrap();
        engine.poll(&mut doc);

        assert_eq!(marker_texts(&doc, root), vec!["fox", "fox"]);
        assert_eq!(doc.text_content(root), "red fox jumps fox");
    }

    #[test]
    fn test_clearing_term_restores_plain_text() {
        let (mut doc, root, _) = fixture();
        let mut engine = TextHighlight::new();
        engine.set_term(&mut doc, Some("fox"));
        engine.attach(&mut doc, root);

        engine.set_term(&mut doc, None);
        assert!(!engine.has_highlight());
        assert!(marker_texts(&doc, root).is_empty());
        assert_eq!(doc.text_content(root), "red fox");
        assert_eq!(doc.children(root).len(), 1);
    }

    #[test]
    fn test_detach_is_terminal() {
        let (mut doc, root, text) = fixture();
        let mut engine = TextHighlight::new();
        engine.set_term(&mut doc, Some("fox"));
        engine.attach(&mut doc, root);
        engine.detach();
        assert_eq!(engine.state(), LifecycleState::TornDown);

        doc.set_text(text, "another fox").unwrap();
        engine.poll(&mut doc);
        engine.set_term(&mut doc, Some("another"));
        let before = marker_texts(&doc, root);
        assert_eq!(before, vec!["fox"], "stale markers stay, nothing reacts");

        engine.attach(&mut doc, root);
        assert_eq!(engine.state(), LifecycleState::TornDown);
    }

    #[test]
    fn test_same_term_does_not_rerun() {
        let (mut doc, root, _) = fixture();
        let mut engine = TextHighlight::new();
        engine.attach(&mut doc, root);
        engine.set_term(&mut doc, Some("fox"));

        let revision = doc.child_list_revision();
        engine.set_term(&mut doc, Some("fox"));
        assert_eq!(doc.child_list_revision(), revision);
    }
}
