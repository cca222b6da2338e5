//! CLI module for Zimu.

pub mod commands;
mod output;

pub use output::Output;

use crate::config::Settings;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Zimu - subtitle retrieval for prompt injection
///
/// Finds the course subtitle segments relevant to a question and formats them
/// as a reference block for a language-model prompt.
#[derive(Parser, Debug)]
#[command(name = "zimu")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to the subtitle corpus document (overrides the configuration)
    #[arg(long, global = true, env = "ZIMU_CORPUS")]
    pub corpus: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Settings file this run reads, `-c` or the default location.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .as_deref()
            .map(Settings::expand_path)
            .unwrap_or_else(Settings::default_config_path)
    }

    /// Corpus document this run reads, `--corpus` or the configured path.
    pub fn corpus_path(&self, settings: &Settings) -> PathBuf {
        self.corpus
            .as_deref()
            .map(Settings::expand_path)
            .unwrap_or_else(|| settings.corpus_path())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the reference block that would be injected for a question
    Context {
        /// The user question
        question: String,

        /// Character budget (defaults to retrieval.max_chars)
        #[arg(short, long)]
        max_chars: Option<usize>,
    },

    /// Show the best-matching subtitle segments with their scores
    Search {
        /// The user question
        question: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Also print the extracted query terms
        #[arg(long)]
        terms: bool,
    },

    /// Show whether the subtitle corpus is available
    Status,

    /// Build the corpus document from subtitle files (one file per episode)
    Import {
        /// Subtitle files (json, srt, vtt, or [HH:MM:SS] transcripts)
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Corpus document to write (defaults to corpus.path)
        #[arg(short, long)]
        output: Option<String>,

        /// Episode number of the first input; later inputs count up from it
        #[arg(short, long, default_value = "1")]
        episode: i64,

        /// Input format (json, srt, vtt, transcript); detected from the extension if omitted
        #[arg(long)]
        format: Option<String>,

        /// Merge into the existing document instead of replacing it
        #[arg(long)]
        append: bool,
    },

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_override_leaves_settings_alone() {
        let mut settings = Settings::default();
        settings.corpus.path = Some("/srv/configured.json".to_string());

        let cli = Cli::try_parse_from(["zimu", "--corpus", "/tmp/other.json", "status"]).unwrap();
        assert_eq!(cli.corpus_path(&settings), PathBuf::from("/tmp/other.json"));
        assert_eq!(settings.corpus.path.as_deref(), Some("/srv/configured.json"));

        let cli = Cli::try_parse_from(["zimu", "status"]).unwrap();
        if cli.corpus.is_none() {
            assert_eq!(cli.corpus_path(&settings), PathBuf::from("/srv/configured.json"));
        }
    }

    #[test]
    fn test_config_path_prefers_flag() {
        let cli = Cli::try_parse_from(["zimu", "-c", "/etc/zimu.toml", "config", "path"]).unwrap();
        assert_eq!(cli.config_path(), PathBuf::from("/etc/zimu.toml"));

        let cli = Cli::try_parse_from(["zimu", "status"]).unwrap();
        assert_eq!(cli.config_path(), Settings::default_config_path());
    }

    #[test]
    fn test_parse_context_command() {
        let cli = Cli::try_parse_from(["zimu", "-vv", "context", "用神怎么取", "--max-chars", "800"])
            .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Context { question, max_chars } => {
                assert_eq!(question, "用神怎么取");
                assert_eq!(max_chars, Some(800));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_import_command() {
        let cli = Cli::try_parse_from([
            "zimu", "import", "ep1.srt", "ep2.srt", "--episode", "3", "--append",
        ])
        .unwrap();

        match cli.command {
            Commands::Import {
                inputs,
                episode,
                append,
                output,
                format,
            } => {
                assert_eq!(inputs, vec!["ep1.srt", "ep2.srt"]);
                assert_eq!(episode, 3);
                assert!(append);
                assert!(output.is_none());
                assert!(format.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_import_requires_inputs() {
        assert!(Cli::try_parse_from(["zimu", "import"]).is_err());
    }
}
