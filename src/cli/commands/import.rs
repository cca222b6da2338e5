//! Import command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::corpus::import::{import_file, SubtitleFormat};
use crate::corpus::{CorpusDocument, EpisodeId};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Run the import command.
pub fn run_import(
    inputs: &[String],
    output: Option<String>,
    first_episode: i64,
    format: Option<&str>,
    append: bool,
    corpus_path: &Path,
) -> Result<()> {
    let format = format
        .map(str::parse::<SubtitleFormat>)
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    let output_path = output
        .map(|o| Settings::expand_path(&o))
        .unwrap_or_else(|| corpus_path.to_path_buf());

    let mut document = build_document(inputs, first_episode, format, append, &output_path)?;
    document
        .write_to(&output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    Output::success(&format!(
        "Wrote {} segments from {} episodes to {}",
        document.segments.len(),
        document.episodes.len(),
        output_path.display()
    ));
    for source in &document.episodes {
        Output::list_item(&format!(
            "第{}集: {} segments ({})",
            source.episode, source.segment_count, source.source
        ));
    }

    Ok(())
}

fn build_document(
    inputs: &[String],
    first_episode: i64,
    format: Option<SubtitleFormat>,
    append: bool,
    output_path: &Path,
) -> Result<CorpusDocument> {
    let mut document = if append && output_path.exists() {
        CorpusDocument::read_from(output_path)?
    } else {
        CorpusDocument::new()
    };

    let pb = Output::progress_bar(inputs.len() as u64, "Importing subtitles");

    for (offset, input) in inputs.iter().enumerate() {
        let episode = EpisodeId::Number(first_episode + offset as i64);
        let path = Settings::expand_path(input);
        pb.set_message(input.clone());

        let (source, segments) = import_file(&path, episode, format)
            .with_context(|| format!("Failed to import {}", input))?;
        info!(input = %input, episode = %source.episode, segments = segments.len(), "Imported subtitles");

        if segments.is_empty() {
            Output::warning(&format!("No subtitle lines found in {}", input));
        }
        document.add_episode(source, segments);
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::parse_document;

    #[test]
    fn test_build_numbers_episodes_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.txt");
        let second = dir.path().join("b.srt");
        std::fs::write(&first, "[00:00:01] 第一集开场白\n").unwrap();
        std::fs::write(&second, "1\n00:00:02,000 --> 00:00:04,000\n第二集内容\n").unwrap();

        let inputs = vec![
            first.display().to_string(),
            second.display().to_string(),
        ];
        let document =
            build_document(&inputs, 11, None, false, &dir.path().join("out.json")).unwrap();

        assert_eq!(document.episodes.len(), 2);
        assert_eq!(document.segments[0].episode, EpisodeId::Number(11));
        assert_eq!(document.segments[1].episode, EpisodeId::Number(12));
        assert_eq!(document.segments[1].start, 2.0);
    }

    #[test]
    fn test_append_keeps_existing_episodes() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("corpus.json");
        let input = dir.path().join("ep.txt");
        std::fs::write(&input, "[00:00:01] 九星旺衰\n").unwrap();
        let inputs = vec![input.display().to_string()];

        let mut document = build_document(&inputs, 1, None, false, &output).unwrap();
        document.write_to(&output).unwrap();

        let mut document = build_document(&inputs, 2, None, true, &output).unwrap();
        document.write_to(&output).unwrap();

        let raw = std::fs::read_to_string(&output).unwrap();
        let segments = parse_document(&raw).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].episode, EpisodeId::Number(1));
        assert_eq!(segments[1].episode, EpisodeId::Number(2));
    }

    #[test]
    fn test_bad_input_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = vec![dir.path().join("missing.srt").display().to_string()];

        let err = build_document(&inputs, 1, None, false, &dir.path().join("out.json"))
            .unwrap_err();
        assert!(err.to_string().contains("missing.srt"));
    }
}
