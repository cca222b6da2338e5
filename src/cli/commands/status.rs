//! Status command - report whether the subtitle corpus is usable.

use crate::cli::Output;
use crate::config::Settings;
use crate::corpus::{CorpusCache, CorpusStats};
use console::style;
use std::path::Path;

#[derive(Debug, PartialEq)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

/// Check result for a single item.
#[derive(Debug)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    message: String,
    hint: Option<String>,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run the status command.
pub fn run_status(
    corpus: &CorpusCache,
    settings: &Settings,
    config_path: &Path,
) -> anyhow::Result<()> {
    Output::header("Zimu Status");
    println!();

    let checks = vec![check_config_file(config_path), check_corpus(corpus)];
    for check in &checks {
        check.print();
    }
    println!();

    let stats = CorpusStats::from_segments(corpus.load_segments());
    Output::kv("Corpus", &corpus.path().display().to_string());
    Output::kv("Segments", &stats.segments.to_string());
    Output::kv("Episodes", &stats.episodes.to_string());
    Output::kv("Characters", &stats.characters.to_string());
    Output::kv("Budget", &format!("{} chars", settings.retrieval.max_chars));
    println!();

    if checks.iter().any(|c| c.status == CheckStatus::Error) {
        Output::warning("Subtitle context is disabled; prompts will be sent without it.");
    } else {
        Output::success("Relevant subtitle segments will be injected into prompts.");
    }

    Ok(())
}

fn check_corpus(corpus: &CorpusCache) -> CheckResult {
    let hint = "Build it with: zimu import <subtitle files...>";

    if let Some(error) = corpus.load_error() {
        return CheckResult::error("Subtitle corpus", &format!("failed to load: {}", error), hint);
    }

    let segments = corpus.load_segments().len();
    if segments == 0 {
        CheckResult::error("Subtitle corpus", "loaded but holds no segments", hint)
    } else {
        CheckResult::ok("Subtitle corpus", &format!("{} segments loaded", segments))
    }
}

fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: zimu config edit",
        )
    }
}
