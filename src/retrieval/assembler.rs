//! Ranking and budget-constrained assembly of subtitle lines.

use super::scoring::{score_segment, ScoredSegment};
use super::terms::TermSet;
use crate::corpus::{EpisodeId, Segment};
use std::collections::HashSet;

/// Segments with shorter text are never emitted.
pub const MIN_SEGMENT_CHARS: usize = 4;

/// Budget charged per emitted line on top of its text length.
pub const LINE_OVERHEAD_CHARS: usize = 20;

/// Number of leading text characters that take part in deduplication.
pub const DEDUP_PREFIX_CHARS: usize = 30;

/// Score every segment and sort by descending score.
///
/// The sort is stable, so segments with equal scores keep corpus order.
pub fn rank<'a>(segments: &'a [Segment], terms: &TermSet) -> Vec<ScoredSegment<'a>> {
    let mut scored: Vec<ScoredSegment<'a>> = segments
        .iter()
        .map(|segment| ScoredSegment {
            segment,
            score: score_segment(&segment.text, terms),
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Lines selected for a context block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    pub lines: Vec<String>,
    /// Budget consumed, including the per-line overhead.
    pub budget_used: usize,
}

impl Assembly {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Walk ranked segments and collect lines until `max_chars` is used up.
///
/// The budget is checked before each candidate, so the last accepted line may
/// overshoot it. Short texts and repeats of an already emitted
/// (episode, start, text prefix) are skipped.
pub fn assemble(ranked: &[ScoredSegment<'_>], max_chars: usize) -> Assembly {
    let mut assembly = Assembly::default();
    let mut seen: HashSet<(&EpisodeId, u64, &str)> = HashSet::new();

    for candidate in ranked {
        if assembly.budget_used >= max_chars {
            break;
        }

        let segment = candidate.segment;
        let text_chars = segment.char_len();
        if text_chars < MIN_SEGMENT_CHARS {
            continue;
        }

        let key = (
            &segment.episode,
            segment.start.to_bits(),
            char_prefix(&segment.text, DEDUP_PREFIX_CHARS),
        );
        if !seen.insert(key) {
            continue;
        }

        assembly.lines.push(format_line(segment));
        assembly.budget_used += text_chars + LINE_OVERHEAD_CHARS;
    }

    assembly
}

/// Format a segment as one context line.
pub fn format_line(segment: &Segment) -> String {
    format!("[第{}集] {}", segment.episode, segment.text)
}

fn char_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
