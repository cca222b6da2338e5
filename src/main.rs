//! Zimu CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zimu::cli::{commands, Cli, Commands};
use zimu::config::Settings;
use zimu::corpus;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config_path();
    let settings = Settings::load_from(Some(&config_path))?;
    let corpus_path = cli.corpus_path(&settings);

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("zimu={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    corpus::install(corpus_path.clone());
    let corpus = corpus::global();

    // Execute command
    match &cli.command {
        Commands::Context {
            question,
            max_chars,
        } => {
            commands::run_context(question, *max_chars, corpus, &settings)?;
        }

        Commands::Search {
            question,
            limit,
            terms,
        } => {
            commands::run_search(question, *limit, *terms, corpus, &settings)?;
        }

        Commands::Status => {
            commands::run_status(corpus, &settings, &config_path)?;
        }

        Commands::Import {
            inputs,
            output,
            episode,
            format,
            append,
        } => {
            commands::run_import(
                inputs,
                output.clone(),
                *episode,
                format.as_deref(),
                *append,
                &corpus_path,
            )?;
        }

        Commands::Serve { host, port } => {
            let host = host.clone().unwrap_or_else(|| settings.server.host.clone());
            let port = port.unwrap_or(settings.server.port);
            commands::run_serve(&host, port, corpus, &settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, &settings, &config_path)?;
        }
    }

    Ok(())
}
