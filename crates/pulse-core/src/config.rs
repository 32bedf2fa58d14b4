//! Pipeline and monitor configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a three-layer resolution:
//! 1. Explicit path (`--config`), when it exists
//! 2. Override in data dir (~/.local/share/pulse/config/pulse.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Every key is optional; anything left out keeps its built-in default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::classifier::ClassifierParams;
use crate::error::{Error, Result};
use crate::models::ClassifierKind;
use crate::monitor::{Comparator, MonitorConfig, MonitorRule};
use crate::trainer::TrainingConfig;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/pulse.toml");

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub training: TrainingConfig,
    pub monitor: MonitorConfig,
}

impl Config {
    /// Load configuration (explicit path, then data dir override, then default)
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        match resolve_config_path(override_path) {
            Some(path) => {
                debug!(path = %path.display(), "Loading config");
                let content = fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                parse_config(&content)
            }
            None => parse_config(DEFAULT_CONFIG),
        }
    }

    /// The embedded default config file, verbatim
    pub fn default_toml() -> &'static str {
        DEFAULT_CONFIG
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("pulse").join("config").join("pulse.toml"))
}

/// The file `Config::load` would read, or `None` for the embedded default
pub fn resolve_config_path(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }
    default_config_path().filter(|p| p.exists())
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    training: Option<RawTraining>,
    random_forest: Option<RawForest>,
    logistic_regression: Option<RawLogistic>,
    svm: Option<RawSvm>,
    monitor: Option<RawMonitor>,
}

#[derive(Debug, Deserialize)]
struct RawTraining {
    test_size: Option<f64>,
    seed: Option<u64>,
    min_rows: Option<usize>,
    classifiers: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawForest {
    n_estimators: Option<usize>,
    max_depth: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawLogistic {
    learning_rate: Option<f64>,
    max_iter: Option<usize>,
    tolerance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSvm {
    c: Option<f64>,
    learning_rate: Option<f64>,
    max_iter: Option<usize>,
    tolerance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawMonitor {
    rules: Option<Vec<RawRule>>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    topic: String,
    comparator: String,
    threshold: f64,
}

/// Parse config from TOML content
pub fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();
    let training = &mut config.training;

    if let Some(t) = raw.training {
        if let Some(test_size) = t.test_size {
            training.test_size = test_size;
        }
        if let Some(seed) = t.seed {
            training.seed = seed;
        }
        if let Some(min_rows) = t.min_rows {
            training.min_rows = min_rows;
        }
        if let Some(names) = t.classifiers {
            training.classifiers = names
                .iter()
                .map(|name| name.parse::<ClassifierKind>().map_err(Error::Config))
                .collect::<Result<Vec<_>>>()?;
        }
    }

    apply_params(&mut training.params, raw.random_forest, raw.logistic_regression, raw.svm);

    if let Some(rules) = raw.monitor.and_then(|m| m.rules) {
        config.monitor.rules = rules
            .into_iter()
            .map(|r| {
                let comparator = r.comparator.parse::<Comparator>().map_err(Error::Config)?;
                Ok(MonitorRule::new(r.topic, comparator, r.threshold))
            })
            .collect::<Result<Vec<_>>>()?;
    }

    validate(&config)?;
    Ok(config)
}

fn apply_params(
    params: &mut ClassifierParams,
    forest: Option<RawForest>,
    logistic: Option<RawLogistic>,
    svm: Option<RawSvm>,
) {
    if let Some(f) = forest {
        let p = &mut params.random_forest;
        if let Some(n) = f.n_estimators {
            p.n_estimators = n;
        }
        if f.max_depth.is_some() {
            p.max_depth = f.max_depth;
        }
    }

    if let Some(l) = logistic {
        let p = &mut params.logistic_regression;
        if let Some(v) = l.learning_rate {
            p.learning_rate = v;
        }
        if let Some(v) = l.max_iter {
            p.max_iter = v;
        }
        if let Some(v) = l.tolerance {
            p.tolerance = v;
        }
    }

    if let Some(s) = svm {
        let p = &mut params.svm;
        if let Some(v) = s.c {
            p.c = v;
        }
        if let Some(v) = s.learning_rate {
            p.learning_rate = v;
        }
        if let Some(v) = s.max_iter {
            p.max_iter = v;
        }
        if let Some(v) = s.tolerance {
            p.tolerance = v;
        }
    }
}

fn validate(config: &Config) -> Result<()> {
    let t = &config.training;
    if !(t.test_size > 0.0 && t.test_size < 1.0) {
        return Err(Error::Config(format!(
            "training.test_size must be between 0 and 1, got {}",
            t.test_size
        )));
    }
    if t.classifiers.is_empty() {
        return Err(Error::Config("training.classifiers must not be empty".into()));
    }
    if t.params.random_forest.n_estimators == 0 {
        return Err(Error::Config("random_forest.n_estimators must be at least 1".into()));
    }
    config.monitor.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.training, TrainingConfig::default());
        assert_eq!(config.monitor, MonitorConfig::default());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = parse_config(
            r#"
            [training]
            seed = 7
            classifiers = ["svm", "random_forest"]

            [random_forest]
            max_depth = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.training.seed, 7);
        assert_eq!(config.training.test_size, 0.2);
        assert_eq!(
            config.training.classifiers,
            vec![ClassifierKind::Svm, ClassifierKind::RandomForest]
        );
        assert_eq!(config.training.params.random_forest.max_depth, Some(4));
        assert_eq!(config.training.params.random_forest.n_estimators, 100);
    }

    #[test]
    fn test_unknown_classifier_rejected() {
        let err = parse_config("[training]\nclassifiers = [\"knn\"]\n").unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("knn")));
    }

    #[test]
    fn test_monitor_rules_replace_defaults() {
        let config = parse_config(
            r#"
            [[monitor.rules]]
            topic = "Sleep"
            comparator = "<"
            threshold = 7.0
            "#,
        )
        .unwrap();

        assert_eq!(
            config.monitor.rules,
            vec![MonitorRule::new("Sleep", Comparator::Lt, 7.0)]
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse_config("[training]\ntest_size = 1.5\n").is_err());
        assert!(parse_config("[random_forest]\nn_estimators = 0\n").is_err());
        assert!(parse_config("[[monitor.rules]]\ntopic = \"A\"\ncomparator = \"~\"\nthreshold = 1.0\n").is_err());
        assert!(parse_config("[training\n").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[training]\nmin_rows = 12").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.training.min_rows, 12);
    }
}
