//! Lexical overlap scoring of segments against query terms.

use super::terms::{TermSet, MIN_TERM_CHARS};
use crate::corpus::Segment;

/// A segment paired with its score for one query.
#[derive(Debug, Clone, Copy)]
pub struct ScoredSegment<'a> {
    pub segment: &'a Segment,
    pub score: usize,
}

/// Score `text` against `terms`.
///
/// Each term of at least two characters found in the text adds its length in
/// characters, so long specific matches outweigh incidental short overlaps.
pub fn score_segment(text: &str, terms: &TermSet) -> usize {
    if text.is_empty() || terms.is_empty() {
        return 0;
    }

    terms
        .iter()
        .map(|term| (term, term.chars().count()))
        .filter(|(term, len)| *len >= MIN_TERM_CHARS && text.contains(term.as_str()))
        .map(|(_, len)| len)
        .sum()
}
