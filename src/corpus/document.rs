//! Corpus document model.

use crate::error::{Result, ZimuError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Identifier of the episode a segment was taken from.
///
/// Course exports use plain episode numbers, hand-made corpora sometimes use
/// names, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EpisodeId {
    Number(i64),
    Name(String),
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeId::Number(n) => write!(f, "{}", n),
            EpisodeId::Name(name) => write!(f, "{}", name),
        }
    }
}

/// A single timestamped subtitle segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Episode the segment belongs to.
    pub episode: EpisodeId,
    /// Start offset in seconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub start: f64,
    /// Subtitle text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

impl Segment {
    /// Create a new segment of a numbered episode.
    pub fn new(episode: i64, start: f64, text: impl Into<String>) -> Self {
        Self {
            episode: EpisodeId::Number(episode),
            start,
            text: text.into(),
        }
    }

    /// Length of the text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Format the start offset for display.
    pub fn format_timestamp(&self) -> String {
        format_timestamp(self.start)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse the segments out of a raw corpus document.
///
/// A document without a `segments` array holds no segments. Records that do
/// not have the segment shape are skipped.
pub fn parse_document(raw: &str) -> Result<Vec<Segment>> {
    let value: Value = serde_json::from_str(raw)?;

    let Some(records) = value.get("segments").and_then(Value::as_array) else {
        debug!("Corpus document has no segments array");
        return Ok(Vec::new());
    };

    let mut segments = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match Segment::deserialize(record) {
            Ok(segment) => segments.push(segment),
            Err(e) => warn!(index, error = %e, "Skipping malformed subtitle segment"),
        }
    }

    Ok(segments)
}

/// Where an episode's segments were imported from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSource {
    pub episode: EpisodeId,
    pub source: String,
    pub segment_count: usize,
}

/// The on-disk corpus document, as written by the importer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub episodes: Vec<EpisodeSource>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl CorpusDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an existing document from disk.
    pub fn read_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            ZimuError::Corpus(format!("{} is not a corpus document: {}", path.display(), e))
        })
    }

    /// Add an episode, replacing any segments previously stored under the same id.
    pub fn add_episode(&mut self, source: EpisodeSource, segments: Vec<Segment>) {
        self.segments.retain(|s| s.episode != source.episode);
        self.episodes.retain(|e| e.episode != source.episode);
        self.episodes.push(source);
        self.segments.extend(segments);
    }

    /// Write the document as pretty JSON, stamping the generation time.
    pub fn write_to(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.generated_at = Some(Utc::now());
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Summary numbers about a loaded corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub segments: usize,
    pub episodes: usize,
    pub characters: usize,
}

impl CorpusStats {
    pub fn from_segments(segments: &[Segment]) -> Self {
        let episodes: HashSet<&EpisodeId> = segments.iter().map(|s| &s.episode).collect();
        Self {
            segments: segments.len(),
            episodes: episodes.len(),
            characters: segments.iter().map(Segment::char_len).sum(),
        }
    }
}

/// Format seconds as MM:SS or HH:MM:SS.
pub fn format_timestamp(seconds: f64) -> String {
    let total_seconds = seconds.max(0.0) as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_episode_ids() {
        let raw = r#"{"segments": [
            {"episode": 3, "start": 12.5, "text": "值符落宫"},
            {"episode": "番外", "start": 0, "text": "排盘演示"}
        ]}"#;

        let segments = parse_document(raw).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].episode, EpisodeId::Number(3));
        assert_eq!(segments[0].start, 12.5);
        assert_eq!(segments[1].episode.to_string(), "番外");
    }

    #[test]
    fn test_missing_or_non_array_segments_is_empty() {
        assert!(parse_document(r#"{"items": []}"#).unwrap().is_empty());
        assert!(parse_document(r#"{"segments": {"episode": 1}}"#).unwrap().is_empty());
        assert!(parse_document(r#"[1, 2, 3]"#).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(parse_document("{not json").is_err());
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let raw = r#"{"segments": [
            {"start": 1, "text": "没有集数"},
            {"episode": 1, "start": 2, "text": 42},
            {"episode": 1, "start": null, "text": null},
            {"episode": 2, "start": 5, "text": "完整记录"}
        ]}"#;

        let segments = parse_document(raw).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "");
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments[1].text, "完整记录");
    }

    #[test]
    fn test_char_len_counts_characters() {
        let segment = Segment::new(1, 0.0, "八门九星");
        assert_eq!(segment.char_len(), 4);
        assert_eq!(segment.text.len(), 12);
    }

    #[test]
    fn test_add_episode_replaces_existing() {
        let mut doc = CorpusDocument::new();
        let source = |n: i64, count| EpisodeSource {
            episode: EpisodeId::Number(n),
            source: format!("ep{}.srt", n),
            segment_count: count,
        };

        doc.add_episode(source(1, 1), vec![Segment::new(1, 0.0, "旧的第一集")]);
        doc.add_episode(source(2, 1), vec![Segment::new(2, 0.0, "第二集")]);
        doc.add_episode(source(1, 1), vec![Segment::new(1, 0.0, "新的第一集")]);

        assert_eq!(doc.episodes.len(), 2);
        assert_eq!(doc.segments.len(), 2);
        assert!(doc.segments.iter().any(|s| s.text == "新的第一集"));
        assert!(!doc.segments.iter().any(|s| s.text == "旧的第一集"));
    }

    #[test]
    fn test_written_document_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");

        let mut doc = CorpusDocument::new();
        doc.add_episode(
            EpisodeSource {
                episode: EpisodeId::Number(7),
                source: "ep7.txt".to_string(),
                segment_count: 1,
            },
            vec![Segment::new(7, 61.0, "应期判断")],
        );
        doc.write_to(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let segments = parse_document(&raw).unwrap();
        assert_eq!(segments, vec![Segment::new(7, 61.0, "应期判断")]);
        assert!(CorpusDocument::read_from(&path).unwrap().generated_at.is_some());
    }

    #[test]
    fn test_stats() {
        let segments = vec![
            Segment::new(1, 0.0, "天蓬"),
            Segment::new(1, 5.0, "天任星"),
            Segment::new(2, 0.0, "开门"),
        ];
        let stats = CorpusStats::from_segments(&segments);
        assert_eq!(stats.segments, 3);
        assert_eq!(stats.episodes, 2);
        assert_eq!(stats.characters, 7);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(65.0), "01:05");
        assert_eq!(format_timestamp(3665.0), "01:01:05");
    }
}
