//! Full pipeline run: train, assess, plan, export

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use pulse_core::{
    report::write_csv, CandidateOutcome, InterventionPlan, RiskPipeline, RiskReport,
};

use super::input::{parse_assignment, prompt_values};
use super::trends::print_trend_rows;
use super::{load_config, load_indicators, recommendation_icon, truncate};

/// Years of trend history printed after the assessment
const TREND_TAIL: usize = 5;

pub fn cmd_assess(
    config_path: Option<&Path>,
    file: &Path,
    inputs: &[String],
    interactive: bool,
    rows: usize,
    export: Option<&Path>,
    json: bool,
) -> Result<()> {
    // The prompt shares stdout with the JSON report
    anyhow::ensure!(
        !(interactive && json),
        "--interactive cannot be combined with --json"
    );

    let config = load_config(config_path)?;
    let import = load_indicators(file)?;

    if !json {
        println!("📥 Loaded {} records from {}", import.records.len(), file.display());
        if import.dropped > 0 {
            println!("   Dropped {} rows with missing values", import.dropped);
        }
    }

    let mut run = RiskPipeline::new(config.training).run(&import.records);

    let mut adhoc = inputs
        .iter()
        .map(|s| parse_assignment(s))
        .collect::<Result<Vec<_>>>()?;
    if interactive {
        if run.registry().is_empty() {
            anyhow::bail!("No topics found in {}", file.display());
        }
        let stdin = io::stdin();
        let mut reader = stdin.lock();
        let mut out = io::stdout();
        println!();
        adhoc.extend(prompt_values(run.registry().names(), &mut reader, &mut out)?);
    }
    if !adhoc.is_empty() || interactive {
        let input = run
            .input(adhoc.iter().map(|(t, v)| (t.as_str(), *v)))
            .context("Invalid ad-hoc input")?;
        run.attach_adhoc(&input)?;
    }

    let report = run.into_report();

    if let Some(path) = export {
        let out = File::create(path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        write_csv(&report, BufWriter::new(out))
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_models(&report);
    print_rows(&report, rows);

    if !report.trends.rows.is_empty() {
        println!();
        println!("📈 Trends (last {} years)", TREND_TAIL);
        print_trend_rows(&report.trends, TREND_TAIL);
    }

    if let Some(plans) = &report.adhoc {
        println!();
        println!("🩺 Ad-hoc assessment");
        print_plans(plans);
    }

    if let Some(path) = export {
        println!();
        println!("💾 Report exported to {}", path.display());
    }

    Ok(())
}

fn print_models(report: &RiskReport) {
    println!();
    println!("🧠 Models ({} topics)", report.topics.len());
    println!("   ─────────────────────────────────────────────────────────────");

    if report.topics.is_empty() {
        println!("   No topics found.");
        return;
    }

    for topic in &report.topics {
        if let Some(m) = report.models.iter().find(|m| &m.model.topic == topic) {
            println!(
                "   {:<32} {:<20} accuracy {:.2}",
                truncate(topic, 32),
                m.model.classifier_kind.display_name(),
                m.model.holdout_accuracy
            );
            for c in &m.candidates {
                if let CandidateOutcome::Skipped { reason } = &c.outcome {
                    println!("      ↳ {} skipped: {}", c.kind.display_name(), reason);
                }
            }
        } else if let Some(f) = report.failure(topic) {
            println!("   {:<32} ⚠️  untrainable: {}", truncate(topic, 32), f.reason);
        }
    }
}

fn print_rows(report: &RiskReport, limit: usize) {
    if report.models.is_empty() || limit == 0 {
        return;
    }

    println!();
    println!(
        "📋 Risk assessments (first {} of {} rows)",
        limit.min(report.rows.len()),
        report.rows.len()
    );

    for row in report.rows.iter().take(limit) {
        println!("   {} {}", row.time, row.entity);
        let flagged: Vec<&str> = row
            .cells
            .iter()
            .filter(|c| c.risk)
            .map(|c| c.plan.topic.as_str())
            .collect();
        if flagged.is_empty() {
            println!("      ✅ No elevated risk");
        } else {
            println!("      🔴 Elevated: {}", flagged.join(", "));
        }
    }
}

fn print_plans(plans: &[InterventionPlan]) {
    for plan in plans {
        let icon = recommendation_icon(plan.recommendation);
        println!("   {} {}: {}", icon, plan.topic, plan.text);
    }
}
