//! First-occurrence matching inside one text node.

use regex::Regex;

/// Location of a match inside a text node's content, as byte offset and
/// byte length. Matches are ephemeral; they are recomputed on every
/// pass and never cached across passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextMatch {
    pub start: usize,
    pub len: usize,
}

/// Find the first occurrence of the pattern in a text node's content.
///
/// Only the first hit is reported; the tree walker re-scans the
/// remainder of a split text node as a separate sibling, which is how
/// later occurrences get found within the same pass.
///
/// The reported length is the matched text's own length, which can
/// differ from the search term's length under case-insensitive
/// matching of non-ASCII text.
#[must_use]
pub fn first_match(text: &str, pattern: &Regex) -> Option<TextMatch> {
    let found = pattern.find(text)?;
    Some(TextMatch {
        start: found.start(),
        len: found.end() - found.start(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::build_pattern;

    #[test]
    fn test_first_occurrence_only() {
        let pattern = build_pattern("fox").unwrap();
        let found = first_match("red fox jumps fox", &pattern).unwrap();
        assert_eq!(found, TextMatch { start: 4, len: 3 });
    }

    #[test]
    fn test_no_match() {
        let pattern = build_pattern("cat").unwrap();
        assert_eq!(first_match("red fox", &pattern), None);
        assert_eq!(first_match("", &pattern), None);
    }

    #[test]
    fn test_case_insensitive_offsets() {
        let pattern = build_pattern("Fox").unwrap();
        let found = first_match("THE FOX", &pattern).unwrap();
        assert_eq!(found.start, 4);
        assert_eq!(found.len, 3);
    }

    #[test]
    fn test_match_length_follows_matched_text() {
        // 'K' case-folds to the one-byte 'k' but also matches the
        // three-byte Kelvin sign; the reported length must be the
        // matched text's, not the term's.
        let pattern = build_pattern("K").unwrap();
        let found = first_match("\u{212A}elvin", &pattern).unwrap();
        assert_eq!(found.start, 0);
        assert_eq!(found.len, '\u{212A}'.len_utf8());
    }
}
