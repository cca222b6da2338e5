//! Relevance context for prompt injection.

use super::assembler::{assemble, rank};
use super::scoring::ScoredSegment;
use super::terms::{TermExtractor, TermSet};
use super::DEFAULT_MAX_CHARS;
use crate::config::RetrievalSettings;
use crate::corpus::CorpusCache;
use crate::error::{Result, ZimuError};
use tracing::debug;

/// Default heading of the context block.
pub const DEFAULT_HEADER: &str = "参考：雨霖奇门课程字幕（与当前问题相关片段）";

/// Wrap assembled lines with the block heading and a trailing newline.
pub fn format_context(header: &str, lines: &[String]) -> String {
    format!("\n\n## {}\n{}\n", header, lines.join("\n"))
}

/// Selects subtitle segments relevant to a question.
#[derive(Debug, Clone)]
pub struct Retriever<'c> {
    corpus: &'c CorpusCache,
    extractor: TermExtractor,
    max_chars: usize,
    header: String,
}

impl<'c> Retriever<'c> {
    /// Create a retriever over `corpus` with default settings.
    pub fn new(corpus: &'c CorpusCache) -> Self {
        Self {
            corpus,
            extractor: TermExtractor::default(),
            max_chars: DEFAULT_MAX_CHARS,
            header: DEFAULT_HEADER.to_string(),
        }
    }

    /// Create a retriever configured from settings.
    pub fn from_settings(corpus: &'c CorpusCache, settings: &RetrievalSettings) -> Self {
        Self::new(corpus)
            .with_max_chars(settings.max_chars)
            .with_header(&settings.header)
            .with_extra_keywords(settings.extra_keywords.iter().cloned())
    }

    /// Set the character budget.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Set the block heading.
    pub fn with_header(mut self, header: &str) -> Self {
        self.header = header.to_string();
        self
    }

    /// Match additional domain keywords.
    pub fn with_extra_keywords<I>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.extractor = self.extractor.with_extra_keywords(keywords);
        self
    }

    pub fn corpus(&self) -> &'c CorpusCache {
        self.corpus
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Terms extracted from a question.
    pub fn terms(&self, question: &str) -> TermSet {
        self.extractor.extract(question)
    }

    /// Build the context block for a question.
    ///
    /// Returns an empty string when nothing qualifies or the corpus is
    /// unavailable; callers treat that as "no reference material".
    pub fn relevant_context(&self, question: &str) -> String {
        match self.try_relevant_context(question) {
            Ok(context) => context,
            Err(e) => {
                debug!(error = %e, "No subtitle context available");
                String::new()
            }
        }
    }

    fn try_relevant_context(&self, question: &str) -> Result<String> {
        let segments = self.corpus.load_segments();
        if segments.is_empty() {
            return match self.corpus.load_error() {
                Some(e) => Err(ZimuError::Corpus(e.to_string())),
                None => Ok(String::new()),
            };
        }

        let terms = self.terms(question);
        let ranked = rank(segments, &terms);
        let assembly = assemble(&ranked, self.max_chars);
        if assembly.is_empty() {
            return Ok(String::new());
        }

        debug!(
            terms = terms.len(),
            lines = assembly.lines.len(),
            budget_used = assembly.budget_used,
            max_chars = self.max_chars,
            "Assembled subtitle context"
        );

        Ok(format_context(&self.header, &assembly.lines))
    }

    /// Best-scoring segments for a question, ignoring non-matching ones.
    pub fn top_matches(&self, question: &str, limit: usize) -> Vec<ScoredSegment<'c>> {
        let terms = self.terms(question);
        let mut ranked = rank(self.corpus.load_segments(), &terms);
        ranked.retain(|s| s.score > 0);
        ranked.truncate(limit);
        ranked
    }
}
