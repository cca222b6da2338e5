//! Building the corpus document from subtitle files.
//!
//! Accepted inputs:
//! - subtitle API responses (`detail.subtitlesArray` of `{startTime, text}`),
//!   or a bare JSON array of cues
//! - SubRip (`.srt`) and WebVTT (`.vtt`) files
//! - plain transcripts with one `[HH:MM:SS] text` line per cue

use super::document::{EpisodeId, EpisodeSource, Segment};
use crate::error::{Result, ZimuError};
use regex::Regex;
use serde_json::Value;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static CUE_TIMING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d{1,2}):)?(\d{1,2}):(\d{2})[,.](\d{1,3})\s*-->").expect("valid regex")
});

static TRANSCRIPT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?:(\d{1,2}):)?(\d{1,2}):(\d{2})\]\s*(.*)$").expect("valid regex")
});

/// Supported subtitle input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Json,
    Srt,
    Vtt,
    Transcript,
}

impl std::str::FromStr for SubtitleFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(SubtitleFormat::Json),
            "srt" => Ok(SubtitleFormat::Srt),
            "vtt" | "webvtt" => Ok(SubtitleFormat::Vtt),
            "transcript" | "txt" => Ok(SubtitleFormat::Transcript),
            _ => Err(format!(
                "Unknown subtitle format: {}. Use json, srt, vtt, or transcript.",
                s
            )),
        }
    }
}

impl SubtitleFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

/// One timed subtitle line before it is attached to an episode.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCue {
    pub start: f64,
    pub text: String,
}

/// Parse subtitle content into cues. Cues with blank text are dropped.
pub fn parse_subtitles(content: &str, format: SubtitleFormat) -> Result<Vec<SubtitleCue>> {
    let cues = match format {
        SubtitleFormat::Json => parse_json(content)?,
        SubtitleFormat::Srt | SubtitleFormat::Vtt => parse_cue_blocks(content),
        SubtitleFormat::Transcript => parse_transcript(content),
    };

    Ok(cues
        .into_iter()
        .filter(|cue| !cue.text.trim().is_empty())
        .collect())
}

/// Read one subtitle file and turn it into the segments of `episode`.
pub fn import_file(
    path: &Path,
    episode: EpisodeId,
    format: Option<SubtitleFormat>,
) -> Result<(EpisodeSource, Vec<Segment>)> {
    let format = format
        .or_else(|| SubtitleFormat::from_path(path))
        .ok_or_else(|| {
            ZimuError::InvalidInput(format!(
                "Cannot tell the subtitle format of {}; pass --format",
                path.display()
            ))
        })?;

    let content = std::fs::read_to_string(path)?;
    let cues = parse_subtitles(&content, format)?;
    debug!(path = %path.display(), cues = cues.len(), ?format, "Parsed subtitle file");

    let segments: Vec<Segment> = cues
        .into_iter()
        .map(|cue| Segment {
            episode: episode.clone(),
            start: cue.start,
            text: cue.text.trim().to_string(),
        })
        .collect();

    let source = EpisodeSource {
        episode,
        source: path.display().to_string(),
        segment_count: segments.len(),
    };

    Ok((source, segments))
}

fn parse_json(content: &str) -> Result<Vec<SubtitleCue>> {
    let value: Value = serde_json::from_str(content)?;

    if value.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(ZimuError::Import(format!(
            "Subtitle API reported failure: {}",
            value
        )));
    }

    let items = value
        .pointer("/detail/subtitlesArray")
        .or_else(|| value.get("subtitlesArray"))
        .or_else(|| value.get("segments"))
        .or(Some(&value))
        .and_then(Value::as_array)
        .ok_or_else(|| ZimuError::Import("No subtitle array found in JSON input".to_string()))?;

    Ok(items
        .iter()
        .filter_map(|item| {
            let text = item.get("text").and_then(Value::as_str)?;
            let start = item
                .get("startTime")
                .or_else(|| item.get("start"))
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            Some(SubtitleCue {
                start,
                text: text.to_string(),
            })
        })
        .collect())
}

/// Parse SRT/VTT style blocks: an optional index, a timing line, then text lines.
fn parse_cue_blocks(content: &str) -> Vec<SubtitleCue> {
    let mut cues = Vec::new();
    let mut current: Option<SubtitleCue> = None;

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() {
            cues.extend(current.take());
            continue;
        }

        if let Some(caps) = CUE_TIMING_RE.captures(line) {
            cues.extend(current.take());
            let start = clock_seconds(caps.get(1).map(|m| m.as_str()), &caps[2], &caps[3])
                + caps[4].parse::<f64>().unwrap_or(0.0) / 10f64.powi(caps[4].len() as i32);
            current = Some(SubtitleCue {
                start,
                text: String::new(),
            });
            continue;
        }

        if let Some(cue) = current.as_mut() {
            if !cue.text.is_empty() {
                cue.text.push(' ');
            }
            cue.text.push_str(line);
        }
    }

    cues.extend(current);
    cues
}

fn parse_transcript(content: &str) -> Vec<SubtitleCue> {
    content
        .lines()
        .filter_map(|line| {
            let caps = TRANSCRIPT_LINE_RE.captures(line.trim())?;
            Some(SubtitleCue {
                start: clock_seconds(caps.get(1).map(|m| m.as_str()), &caps[2], &caps[3]),
                text: caps[4].to_string(),
            })
        })
        .collect()
}

fn clock_seconds(hours: Option<&str>, minutes: &str, seconds: &str) -> f64 {
    let hours: u32 = hours.and_then(|h| h.parse().ok()).unwrap_or(0);
    let minutes: u32 = minutes.parse().unwrap_or(0);
    let seconds: u32 = seconds.parse().unwrap_or(0);
    f64::from(hours * 3600 + minutes * 60 + seconds)
}
