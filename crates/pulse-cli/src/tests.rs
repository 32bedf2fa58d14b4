//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::fmt::Write as _;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use clap::Parser;
use tempfile::TempDir;

use crate::cli::{Cli, Commands};
use crate::commands::{self, input, truncate};

/// Indicators CSV with 10 states over 2 years and three topics
fn indicators_csv() -> String {
    let mut csv = String::from("YearStart,LocationDesc,Topic,DataValue\n");
    for year in [2020, 2021] {
        for s in 0..10 {
            let base = s as f64 + (year - 2020) as f64;
            writeln!(csv, "{},State {},Obesity,{}", year, s, 25.0 + base).unwrap();
            writeln!(csv, "{},State {},Diabetes,{}", year, s, 8.0 + base / 2.0).unwrap();
            writeln!(csv, "{},State {},Asthma,{}", year, s, 9.0 + (s % 3) as f64).unwrap();
        }
    }
    csv
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ========== Assess Command Tests ==========

#[test]
fn test_cmd_assess_with_export() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "pulse.toml", "[random_forest]\nn_estimators = 10\n");
    let file = write_file(&dir, "cdi.csv", &indicators_csv());
    let export = dir.path().join("report.csv");

    let result = commands::cmd_assess(
        Some(config.as_path()),
        &file,
        &["Obesity=40".to_string()],
        false,
        3,
        Some(export.as_path()),
        false,
    );
    assert!(result.is_ok(), "{:?}", result.err());

    let written = fs::read_to_string(&export).unwrap();
    let header = written.lines().next().unwrap();
    assert!(header.starts_with("time,entity,"));
    assert!(header.contains("Diabetes_Risk"));
    assert_eq!(written.lines().count(), 21);
}

#[test]
fn test_cmd_assess_json() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "pulse.toml", "[random_forest]\nn_estimators = 10\n");
    let file = write_file(&dir, "cdi.csv", &indicators_csv());

    let result = commands::cmd_assess(Some(config.as_path()), &file, &[], false, 10, None, true);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_assess_interactive_json_rejected() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "cdi.csv", &indicators_csv());

    let err = commands::cmd_assess(None, &file, &[], true, 10, None, true).unwrap_err();
    assert!(err.to_string().contains("--interactive cannot be combined with --json"));
}

#[test]
fn test_cli_interactive_conflicts_with_json() {
    let parsed = Cli::try_parse_from(["pulse", "assess", "-f", "cdi.csv", "--interactive", "--json"]);
    assert!(parsed.is_err());

    let cli = Cli::try_parse_from(["pulse", "assess", "-f", "cdi.csv", "--json"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Assess {
            json: true,
            interactive: false,
            ..
        }
    ));
}

#[test]
fn test_cmd_assess_unknown_topic_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "pulse.toml", "[random_forest]\nn_estimators = 10\n");
    let file = write_file(&dir, "cdi.csv", &indicators_csv());

    let err = commands::cmd_assess(
        Some(config.as_path()),
        &file,
        &["Obesty=40".to_string()],
        false,
        10,
        None,
        false,
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("Unknown topic: Obesty"));
}

#[test]
fn test_cmd_assess_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.csv");
    let result = commands::cmd_assess(None, &missing, &[], false, 10, None, false);
    assert!(result.is_err());
}

#[test]
fn test_cmd_assess_tiny_dataset_completes() {
    let dir = TempDir::new().unwrap();
    let file = write_file(
        &dir,
        "tiny.csv",
        "YearStart,LocationDesc,Topic,DataValue\n\
         2020,CA,Asthma,10\n2020,CA,Diabetes,50\n\
         2021,CA,Asthma,20\n2021,CA,Diabetes,60\n",
    );
    let config = write_file(&dir, "pulse.toml", "");

    let result = commands::cmd_assess(
        Some(config.as_path()),
        &file,
        &["Asthma=12".to_string()],
        false,
        10,
        None,
        false,
    );
    assert!(result.is_ok());
}

// ========== Monitor Command Tests ==========

#[test]
fn test_cmd_monitor() {
    let dir = TempDir::new().unwrap();
    let health = write_file(&dir, "health.csv", "Diabetes,Sleep\n130,5\n90,8\n");
    let config = write_file(&dir, "pulse.toml", "");

    assert!(commands::cmd_monitor(Some(config.as_path()), &health, None).is_ok());
}

#[test]
fn test_cmd_monitor_with_topics() {
    let dir = TempDir::new().unwrap();
    let health = write_file(&dir, "health.csv", "Diabetes,Asthma\n130,0\n");
    let cdi = write_file(&dir, "cdi.csv", &indicators_csv());
    let config = write_file(&dir, "pulse.toml", "");

    assert!(commands::cmd_monitor(Some(config.as_path()), &health, Some(cdi.as_path())).is_ok());
}

#[test]
fn test_cmd_monitor_bad_config() {
    let dir = TempDir::new().unwrap();
    let health = write_file(&dir, "health.csv", "Diabetes\n130\n");
    let config = write_file(&dir, "pulse.toml", "[training]\nclassifiers = [\"knn\"]\n");

    assert!(commands::cmd_monitor(Some(config.as_path()), &health, None).is_err());
}

// ========== Trends / Topics Command Tests ==========

#[test]
fn test_cmd_trends() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "cdi.csv", &indicators_csv());
    assert!(commands::cmd_trends(&file, 5).is_ok());
}

#[test]
fn test_cmd_topics() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "cdi.csv", &indicators_csv());
    assert!(commands::cmd_topics(&file).is_ok());
}

#[test]
fn test_cmd_topics_missing_column() {
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "bad.csv", "Year,State,Topic,Value\n2020,CA,Asthma,1\n");
    assert!(commands::cmd_topics(&file).is_err());
}

// ========== Init Config Tests ==========

#[test]
fn test_cmd_init_config() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("nested").join("pulse.toml");

    commands::cmd_init_config(Some(target.as_path()), false).unwrap();
    let written = fs::read_to_string(&target).unwrap();
    assert_eq!(written, pulse_core::Config::default_toml());

    // Refuses to overwrite without --force
    assert!(commands::cmd_init_config(Some(target.as_path()), false).is_err());
    assert!(commands::cmd_init_config(Some(target.as_path()), true).is_ok());
}

// ========== Input Parsing Tests ==========

#[test]
fn test_parse_assignment() {
    assert_eq!(
        input::parse_assignment("Asthma=9.5").unwrap(),
        ("Asthma".to_string(), 9.5)
    );
    assert_eq!(
        input::parse_assignment(" Health Status = 2 ").unwrap(),
        ("Health Status".to_string(), 2.0)
    );
    assert!(input::parse_assignment("Asthma").is_err());
    assert!(input::parse_assignment("=3").is_err());
    assert!(input::parse_assignment("Asthma=high").is_err());
}

#[test]
fn test_parse_assignment_topic_with_commas() {
    let (topic, value) =
        input::parse_assignment("Nutrition, Physical Activity, and Weight Status=31").unwrap();
    assert_eq!(topic, "Nutrition, Physical Activity, and Weight Status");
    assert_eq!(value, 31.0);
}

#[test]
fn test_parse_selection() {
    assert_eq!(input::parse_selection("1, 3", 3), vec![0, 2]);
    assert_eq!(input::parse_selection("3,x,0,9,3", 3), vec![2]);
    assert!(input::parse_selection("", 3).is_empty());
}

#[test]
fn test_prompt_values() {
    let topics = vec!["Asthma".to_string(), "Diabetes".to_string(), "Sleep".to_string()];
    let mut reader = Cursor::new("3,1\n5.5\nabc\n");
    let mut out = Vec::new();

    let values = input::prompt_values(&topics, &mut reader, &mut out).unwrap();
    assert_eq!(
        values,
        vec![("Sleep".to_string(), 5.5), ("Asthma".to_string(), 0.0)]
    );

    let shown = String::from_utf8(out).unwrap();
    assert!(shown.contains(" 2. Diabetes"));
}

#[test]
fn test_prompt_values_eof() {
    let topics = vec!["Asthma".to_string()];
    let mut reader = Cursor::new("1\n");
    let mut out = Vec::new();

    // Missing value line reads as blank
    let values = input::prompt_values(&topics, &mut reader, &mut out).unwrap();
    assert_eq!(values, vec![("Asthma".to_string(), 0.0)]);
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("Asthma", 10), "Asthma");
    assert_eq!(truncate("Cardiovascular Disease", 10), "Cardiov...");
    assert_eq!(truncate("Ärztliche Versorgung", 5), "Är...");
}
