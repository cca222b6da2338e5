//! Subtitle corpus: segment model, cached loading and import.
//!
//! The corpus is a single JSON document whose `segments` array holds every
//! subtitle line of the course. It is read at most once per process and then
//! shared read-only.

mod cache;
mod document;
pub mod import;

pub use cache::{global, install, load_segments, CorpusCache};
pub use document::{
    format_timestamp, parse_document, CorpusDocument, CorpusStats, EpisodeId, EpisodeSource,
    Segment,
};
