//! Error types for Zimu.

use thiserror::Error;

/// Library-level error type for Zimu operations.
#[derive(Error, Debug)]
pub enum ZimuError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("Subtitle import failed: {0}")]
    Import(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Zimu operations.
pub type Result<T> = std::result::Result<T, ZimuError>;
