//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pulse - Chronic disease risk assessment
#[derive(Parser)]
#[command(name = "pulse")]
#[command(about = "Per-topic chronic disease risk classification and intervention planning", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the data dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train a model per topic and assess every location/year
    Assess {
        /// Chronic disease indicators CSV
        #[arg(short, long)]
        file: PathBuf,

        /// Ad-hoc value as TOPIC=VALUE (repeatable)
        #[arg(short, long, value_name = "TOPIC=VALUE")]
        input: Vec<String>,

        /// Prompt for ad-hoc values after training
        #[arg(long, conflicts_with = "json")]
        interactive: bool,

        /// Number of report rows to print
        #[arg(short, long, default_value = "10")]
        rows: usize,

        /// Write the full report to this CSV file
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Print the report as JSON instead of the console view
        #[arg(long)]
        json: bool,
    },

    /// Screen individual health records against threshold rules
    Monitor {
        /// Health records CSV (one column per topic)
        #[arg(short, long)]
        file: PathBuf,

        /// Indicators CSV whose topics the results are projected onto
        #[arg(long)]
        topics_from: Option<PathBuf>,
    },

    /// Show the mean value per topic per year
    Trends {
        /// Chronic disease indicators CSV
        #[arg(short, long)]
        file: PathBuf,

        /// Number of most recent years to show
        #[arg(short, long, default_value = "5")]
        last: usize,
    },

    /// List the topics found in an indicators CSV
    Topics {
        /// Chronic disease indicators CSV
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Write the default config to the override location
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
