//! Search command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::corpus::CorpusCache;
use crate::retrieval::Retriever;
use anyhow::Result;

/// Run the search command.
pub fn run_search(
    question: &str,
    limit: usize,
    show_terms: bool,
    corpus: &CorpusCache,
    settings: &Settings,
) -> Result<()> {
    if let Some(e) = corpus.load_error() {
        Output::error(&format!("Subtitle corpus unavailable: {}", e));
        return Err(anyhow::anyhow!("{}", e));
    }

    let retriever = Retriever::from_settings(corpus, &settings.retrieval);

    if show_terms {
        let mut terms: Vec<String> = retriever.terms(question).into_iter().collect();
        terms.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));
        Output::header(&format!("Query terms ({})", terms.len()));
        for term in &terms {
            Output::list_item(term);
        }
    }

    let matches = retriever.top_matches(question, limit);
    if matches.is_empty() {
        Output::warning("No subtitle segments match your question.");
        return Ok(());
    }

    Output::success(&format!("Found {} matching segments", matches.len()));
    for (i, scored) in matches.iter().enumerate() {
        Output::search_result(
            i + 1,
            &scored.segment.episode.to_string(),
            &scored.segment.format_timestamp(),
            scored.score,
            &scored.segment.text,
        );
    }

    Ok(())
}
