//! Configuration module for Zimu.
//!
//! Handles loading and saving application settings.

mod settings;

pub use settings::{CorpusSettings, GeneralSettings, RetrievalSettings, ServerSettings, Settings};
