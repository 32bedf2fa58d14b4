//! Threshold screening of individual health records

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use pulse_core::{import::parse_health_csv, reshape::reshape, ThresholdMonitor};

use super::{load_config, load_indicators, recommendation_icon};

pub fn cmd_monitor(config_path: Option<&Path>, file: &Path, topics_from: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let monitor = ThresholdMonitor::new(config.monitor);

    let csv_file =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let people = parse_health_csv(csv_file)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    let topics = match topics_from {
        Some(path) => {
            let import = load_indicators(path)?;
            Some(reshape(&import.records).registry.names().to_vec())
        }
        None => None,
    };

    println!(
        "🩺 Screening {} records against {} rules",
        people.len(),
        monitor.rules().len()
    );

    for (i, values) in people.iter().enumerate() {
        let result = monitor.detect(values);
        println!();
        println!(
            "   Record {} ({} of {} rules triggered)",
            i + 1,
            result.detected_count(),
            result.detections.len()
        );

        let plans = match &topics {
            Some(topics) => result.project(topics),
            None => result.plans.clone(),
        };
        for plan in &plans {
            let icon = recommendation_icon(plan.recommendation);
            println!("      {} {}", icon, plan.text);
        }
    }

    Ok(())
}
