//! Config override initialization

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pulse_core::config::{default_config_path, Config};

/// Write the built-in config to `target`, or the data dir override path
pub fn cmd_init_config(target: Option<&Path>, force: bool) -> Result<()> {
    let path: PathBuf = match target {
        Some(p) => p.to_path_buf(),
        None => default_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine the data directory; pass --config"))?,
    };

    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&path, Config::default_toml())
        .with_context(|| format!("Failed to write config: {}", path.display()))?;

    println!("✅ Wrote default config to {}", path.display());
    Ok(())
}
