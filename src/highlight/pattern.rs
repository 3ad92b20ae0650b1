//! Literal search-pattern construction.

use regex::{Regex, RegexBuilder};

use crate::error::Result;

/// Compile a search term into a case-insensitive literal pattern.
///
/// Every regex metacharacter in the term is escaped first, so the
/// resulting pattern only ever matches the term as a plain substring.
/// Callers guard against empty terms upstream; an empty term would
/// compile fine but match at every position.
pub fn build_pattern(term: &str) -> Result<Regex> {
    let literal = regex::escape(term);
    let pattern = RegexBuilder::new(&literal).case_insensitive(true).build()?;
    Ok(pattern)
}
