//! Zimu - subtitle retrieval for prompt injection
//!
//! Selects the course subtitle segments most relevant to a user question and
//! assembles them, within a character budget, into a reference block that is
//! appended to a language-model system prompt.
//!
//! The name "Zimu" is the Mandarin word for "subtitles" (字幕).
//!
//! # Overview
//!
//! - The corpus is one JSON document with a `segments` array, loaded once per
//!   process and shared read-only.
//! - Questions are matched by naive substring overlap, which works for Chinese
//!   text without word boundaries.
//! - Retrieval never fails: an unavailable corpus degrades to an empty block.
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `corpus` - Segment model, load-once cache and subtitle import
//! - `retrieval` - Term extraction, scoring, ranking and context assembly
//! - `cli` - Command line interface and HTTP server
//!
//! # Example
//!
//! ```rust,no_run
//! use zimu::corpus;
//! use zimu::retrieval::{get_relevant_context, DEFAULT_MAX_CHARS};
//!
//! corpus::install("/srv/qimen/all_subtitles.json");
//!
//! let context = get_relevant_context("用神怎么取？", DEFAULT_MAX_CHARS);
//! let system_prompt = format!("你是奇门遁甲老师。{}", context);
//! ```

pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod retrieval;

pub use error::{Result, ZimuError};
