//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `assess` - Full pipeline run, ad-hoc assessment and report export
//! - `config` - Config override initialization
//! - `input` - Ad-hoc value parsing and the interactive prompt
//! - `monitor` - Threshold screening of individual health records
//! - `trends` - Topic listing and yearly trend tables

pub mod assess;
pub mod config;
pub mod input;
pub mod monitor;
pub mod trends;

// Re-export command functions for main.rs
pub use assess::*;
pub use config::*;
pub use monitor::*;
pub use trends::*;

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use pulse_core::{import::parse_indicator_csv, Config, IndicatorImport, Recommendation};

/// Load config from `--config`, the data dir override, or built-in defaults
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    Config::load(path).context("Failed to load config")
}

/// Open and parse an indicators CSV
pub fn load_indicators(file: &Path) -> Result<IndicatorImport> {
    let csv_file =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    parse_indicator_csv(csv_file).with_context(|| format!("Failed to parse {}", file.display()))
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn recommendation_icon(recommendation: Recommendation) -> &'static str {
    match recommendation {
        Recommendation::Intervene => "🔴",
        Recommendation::Maintain => "✅",
        Recommendation::NoData => "➖",
    }
}
