//! Context command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::corpus::CorpusCache;
use crate::retrieval::Retriever;
use anyhow::Result;

/// Run the context command.
pub fn run_context(
    question: &str,
    max_chars: Option<usize>,
    corpus: &CorpusCache,
    settings: &Settings,
) -> Result<()> {
    let retriever = Retriever::from_settings(corpus, &settings.retrieval)
        .with_max_chars(max_chars.unwrap_or(settings.retrieval.max_chars));

    let context = retriever.relevant_context(question);
    if !context.is_empty() {
        print!("{}", context);
        return Ok(());
    }

    match corpus.load_error() {
        Some(e) => Output::warning(&format!("Subtitle corpus unavailable: {}", e)),
        None if !corpus.has_data() => Output::warning("Subtitle corpus holds no segments."),
        None => Output::warning("No subtitle segments fit the budget."),
    }

    Ok(())
}
