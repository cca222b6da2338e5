//! Load-once corpus cache.

use super::document::{parse_document, Segment};
use crate::config::Settings;
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Outcome of the single load attempt.
#[derive(Debug)]
struct LoadState {
    segments: Vec<Segment>,
    error: Option<String>,
}

/// A corpus document bound to a path and loaded at most once.
///
/// The first caller reads and parses the document; concurrent first callers
/// wait for that load. A failed load is remembered and the cache stays empty
/// for its whole lifetime.
#[derive(Debug)]
pub struct CorpusCache {
    path: PathBuf,
    state: OnceLock<LoadState>,
}

impl CorpusCache {
    /// Create a cache for the document at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: OnceLock::new(),
        }
    }

    /// Create an already-loaded cache from in-memory segments.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self {
            path: PathBuf::from("<memory>"),
            state: OnceLock::from(LoadState {
                segments,
                error: None,
            }),
        }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All loaded segments, in document order. Empty if loading failed.
    pub fn load_segments(&self) -> &[Segment] {
        &self.state().segments
    }

    /// Whether at least one segment was loaded.
    pub fn has_data(&self) -> bool {
        !self.load_segments().is_empty()
    }

    /// The recorded load failure, if the load was attempted and failed.
    pub fn load_error(&self) -> Option<&str> {
        self.state().error.as_deref()
    }

    /// Whether the load has already happened.
    pub fn is_loaded(&self) -> bool {
        self.state.get().is_some()
    }

    fn state(&self) -> &LoadState {
        self.state.get_or_init(|| match read_segments(&self.path) {
            Ok(segments) => {
                info!(
                    path = %self.path.display(),
                    segments = segments.len(),
                    "Loaded subtitle corpus"
                );
                LoadState {
                    segments,
                    error: None,
                }
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to load subtitle corpus; continuing without it"
                );
                LoadState {
                    segments: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        })
    }
}

fn read_segments(path: &Path) -> Result<Vec<Segment>> {
    let raw = std::fs::read_to_string(path)?;
    parse_document(&raw)
}

static GLOBAL_CORPUS: OnceLock<CorpusCache> = OnceLock::new();

/// Bind the process-wide corpus to `path`.
///
/// Returns false if the process-wide corpus was already bound, in which case
/// the existing binding is kept.
pub fn install(path: impl Into<PathBuf>) -> bool {
    GLOBAL_CORPUS.set(CorpusCache::new(path)).is_ok()
}

/// The process-wide corpus, bound to the default corpus path unless
/// [`install`] was called first.
pub fn global() -> &'static CorpusCache {
    GLOBAL_CORPUS.get_or_init(|| CorpusCache::new(Settings::default().corpus_path()))
}

/// Segments of the process-wide corpus.
pub fn load_segments() -> &'static [Segment] {
    global().load_segments()
}
