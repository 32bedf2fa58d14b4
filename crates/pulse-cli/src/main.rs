//! Pulse CLI - Chronic disease risk assessment
//!
//! Usage:
//!   pulse assess --file CDI.csv          Train per-topic models and assess every row
//!   pulse monitor --file health.csv      Screen individual records against thresholds
//!   pulse trends --file CDI.csv          Mean value per topic per year
//!   pulse topics --file CDI.csv          List the topic universe
//!   pulse init-config                    Write the default config override

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Assess {
            file,
            input,
            interactive,
            rows,
            export,
            json,
        } => commands::cmd_assess(
            config_path,
            &file,
            &input,
            interactive,
            rows,
            export.as_deref(),
            json,
        ),
        Commands::Monitor { file, topics_from } => {
            commands::cmd_monitor(config_path, &file, topics_from.as_deref())
        }
        Commands::Trends { file, last } => commands::cmd_trends(&file, last),
        Commands::Topics { file } => commands::cmd_topics(&file),
        Commands::InitConfig { force } => commands::cmd_init_config(config_path, force),
    }
}
