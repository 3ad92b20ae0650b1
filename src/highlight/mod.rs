//! Search-term highlighting.
//!
//! One highlighting pass has two halves: unwrap every marker left over
//! from the previous pass (restoring contiguous text), then walk the
//! subtree and wrap the current term's matches in fresh markers. The
//! [`Coordinator`] runs the pass; [`mark_subtree`] does the structural
//! editing; [`build_pattern`] and [`first_match`] are the pure helpers
//! underneath.

mod coordinator;
mod matcher;
mod pattern;
mod walker;

pub use coordinator::Coordinator;
pub use matcher::{TextMatch, first_match};
pub use pattern::build_pattern;
pub use walker::mark_subtree;

/// Tag used for marker elements unless overridden.
pub const MARK_TAG: &str = "mark";

/// Class carried by every marker element unless overridden.
pub const MARK_CLASS: &str = "textmark-highlight";

/// Marker element configuration.
///
/// Markers carry exactly one tag and one class; there is no further
/// attribute or styling contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightOptions {
    tag: String,
    class: String,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            tag: MARK_TAG.to_string(),
            class: MARK_CLASS.to_string(),
        }
    }
}

impl HighlightOptions {
    /// Default marker configuration (`<mark class="textmark-highlight">`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different marker tag.
    #[must_use]
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = tag.to_string();
        self
    }

    /// Use a different marker class.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.class = class.to_string();
        self
    }

    /// Marker element tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Marker element class.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults_and_builders() {
        let options = HighlightOptions::new();
        assert_eq!(options.tag(), "mark");
        assert_eq!(options.class(), "textmark-highlight");

        let custom = HighlightOptions::new().with_tag("em").with_class("hit");
        assert_eq!(custom.tag(), "em");
        assert_eq!(custom.class(), "hit");
    }
}
