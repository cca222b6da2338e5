//! Keyword retrieval of subtitle segments for prompt injection.
//!
//! A question is turned into candidate terms, every corpus segment is scored
//! by lexical overlap, and the best segments are assembled into a block of
//! `[第N集] text` lines that fits a character budget.

pub mod assembler;
mod context;
pub mod scoring;
pub mod terms;

pub use assembler::{assemble, format_line, rank, Assembly};
pub use context::{format_context, Retriever, DEFAULT_HEADER};
pub use scoring::{score_segment, ScoredSegment};
pub use terms::{extract_query_terms, TermExtractor, TermSet, DOMAIN_VOCABULARY};

pub use crate::corpus::load_segments;

use crate::corpus;

/// Default character budget of a context block.
pub const DEFAULT_MAX_CHARS: usize = 4200;

/// Build the context block for `question` from the process-wide corpus.
///
/// Never fails: an unavailable corpus or a question that selects nothing
/// yields an empty string.
pub fn get_relevant_context(question: &str, max_chars: usize) -> String {
    Retriever::new(corpus::global())
        .with_max_chars(max_chars)
        .relevant_context(question)
}

/// Whether the process-wide corpus loaded at least one segment.
pub fn has_corpus_data() -> bool {
    corpus::global().has_data()
}
