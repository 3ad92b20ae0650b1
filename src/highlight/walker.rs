//! Depth-first traversal that wraps matches in marker elements.

use regex::Regex;

use crate::dom::{Document, NodeId};
use crate::highlight::HighlightOptions;
use crate::highlight::matcher::first_match;

/// Walk `node` and its descendants, wrapping the first pattern match in
/// every text node encountered.
///
/// Returns how many extra sibling slots the edits consumed, so a caller
/// iterating a child list can keep its index aligned after the splice.
/// Wrapping one match turns a single text node into up to three
/// siblings (text before, marker, text after); the walker advances past
/// the marker so its content is never re-matched, but the "text after"
/// sibling is visited next and later occurrences in the same original
/// text node get wrapped in the same pass.
pub fn mark_subtree(
    doc: &mut Document,
    node: NodeId,
    pattern: &Regex,
    options: &HighlightOptions,
) -> usize {
    if doc.is_text(node) {
        return mark_text_node(doc, node, pattern, options);
    }
    let mut index = 0;
    while let Some(child) = doc.child_at(node, index) {
        index += 1 + mark_subtree(doc, child, pattern, options);
    }
    0
}

/// Wrap the first match in one text node. Returns the number of extra
/// sibling slots consumed: 1 after a wrap, 0 otherwise.
fn mark_text_node(
    doc: &mut Document,
    node: NodeId,
    pattern: &Regex,
    options: &HighlightOptions,
) -> usize {
    try_mark_text_node(doc, node, pattern, options).unwrap_or(0)
}

/// `None` covers every no-op case: no match, detached node, zero-width
/// match. Structural anomalies are skipped, never raised.
fn try_mark_text_node(
    doc: &mut Document,
    node: NodeId,
    pattern: &Regex,
    options: &HighlightOptions,
) -> Option<usize> {
    let found = first_match(doc.text(node)?, pattern)?;
    if found.len == 0 {
        return None;
    }
    let parent = doc.parent(node)?;

    // split into before / match / after; "before" stays in `node`
    let middle = doc.split_text(node, found.start).ok()?;
    let middle_len = doc.text(middle)?.len();
    if found.len < middle_len {
        doc.split_text(middle, found.len).ok()?;
    }

    let matched = doc.text(middle)?.to_string();
    let marker = doc.create_element(options.tag());
    doc.set_class(marker, options.class()).ok()?;
    let clone = doc.create_text(&matched);
    doc.append_child(marker, clone).ok()?;
    doc.replace_child(parent, middle, marker).ok()?;

    Some(1)
}
