//! Mutation watching.
//!
//! The highlight engine must re-run whenever something else rewrites the
//! subtree it decorates, without ever reacting to its own edits. This
//! module defines the watcher contract the engine consumes and a
//! revision-counter implementation driven by the host's tick.

use crate::dom::{Document, NodeId};

bitflags::bitflags! {
    /// Mutation kinds a watcher subscription cares about.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct WatchOptions: u8 {
        /// Children added, removed or replaced anywhere in the subtree.
        const CHILD_LIST = 1 << 0;
        /// Text node content changed.
        const CHARACTER_DATA = 1 << 1;
        /// Element attributes changed.
        const ATTRIBUTES = 1 << 2;
    }
}

/// Notification delivered after a batch of observed mutations. Carries
/// no detail payload; "something changed" is the whole contract.
pub type MutationCallback = Box<dyn FnMut()>;

/// A subscription to structural and content changes under a root node.
///
/// `start` arms the watcher against the document's current state, so
/// edits made while the watcher was stopped are never reported. That
/// property is what lets the engine pause the watcher around its own
/// edits without looping on its own notifications.
pub trait MutationWatcher {
    /// Begin watching `root`. Replaces any active subscription.
    fn start(
        &mut self,
        doc: &Document,
        root: NodeId,
        options: WatchOptions,
        callback: MutationCallback,
    );

    /// Stop watching. No-op when not started.
    fn stop(&mut self);

    /// Host tick: compare against the document and deliver a queued
    /// notification if watched state moved.
    fn tick(&mut self, doc: &Document);
}

/// Revision snapshot filtered by subscription options. Unwatched kinds
/// are pinned to zero so they can never trigger a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Snapshot {
    child_list: u64,
    character_data: u64,
    attribute: u64,
}

impl Snapshot {
    fn take(doc: &Document, options: WatchOptions) -> Self {
        Self {
            child_list: if options.contains(WatchOptions::CHILD_LIST) {
                doc.child_list_revision()
            } else {
                0
            },
            character_data: if options.contains(WatchOptions::CHARACTER_DATA) {
                doc.character_data_revision()
            } else {
                0
            },
            attribute: if options.contains(WatchOptions::ATTRIBUTES) {
                doc.attribute_revision()
            } else {
                0
            },
        }
    }
}

struct Subscription {
    root: NodeId,
    options: WatchOptions,
    seen: Snapshot,
    callback: MutationCallback,
}

/// Watcher backed by the document's revision counters.
///
/// Revisions are tracked per document rather than per subtree; a busy
/// sibling subtree can cause a spurious notification, which costs one
/// redundant (idempotent) highlight pass and nothing else.
#[derive(Default)]
pub struct RevisionWatcher {
    active: Option<Subscription>,
}

impl RevisionWatcher {
    /// Create a watcher with no active subscription.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a subscription is active.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.active.is_some()
    }

    /// Root of the active subscription, if any.
    #[must_use]
    pub fn watched_root(&self) -> Option<NodeId> {
        self.active.as_ref().map(|sub| sub.root)
    }
}

impl MutationWatcher for RevisionWatcher {
    fn start(
        &mut self,
        doc: &Document,
        root: NodeId,
        options: WatchOptions,
        callback: MutationCallback,
    ) {
        self.active = Some(Subscription {
            root,
            options,
            seen: Snapshot::take(doc, options),
            callback,
        });
    }

    fn stop(&mut self) {
        self.active = None;
    }

    fn tick(&mut self, doc: &Document) {
        let Some(sub) = self.active.as_mut() else {
            return;
        };
        let now = Snapshot::take(doc, sub.options);
        if now != sub.seen {
            sub.seen = now;
            (sub.callback)();
        }
    }
}
