//! Rule-based screening of individual health records
//!
//! Each rule compares one raw topic value against a fixed threshold. Rules
//! come from [`MonitorConfig`] (normally loaded from the TOML config), so a
//! deployment or test can swap the table without touching code. Detections
//! go through the same planner as model predictions.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::InterventionPlan;
use crate::planner;

/// Raw values for one individual, keyed by topic name
pub type HealthValues = HashMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    /// value > threshold
    Gt,
    /// value >= threshold
    Ge,
    /// value < threshold
    Lt,
    /// value <= threshold
    Le,
    /// value == threshold
    Eq,
}

impl Comparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Gt => "gt",
            Comparator::Ge => "ge",
            Comparator::Lt => "lt",
            Comparator::Le => "le",
            Comparator::Eq => "eq",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Eq => "==",
        }
    }

    pub fn matches(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparator::Gt => value > threshold,
            Comparator::Ge => value >= threshold,
            Comparator::Lt => value < threshold,
            Comparator::Le => value <= threshold,
            Comparator::Eq => value == threshold,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Comparator {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "gt" | ">" => Ok(Comparator::Gt),
            "ge" | ">=" => Ok(Comparator::Ge),
            "lt" | "<" => Ok(Comparator::Lt),
            "le" | "<=" => Ok(Comparator::Le),
            "eq" | "==" => Ok(Comparator::Eq),
            _ => Err(format!("Unknown comparator: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorRule {
    pub topic: String,
    pub comparator: Comparator,
    pub threshold: f64,
}

impl MonitorRule {
    pub fn new(topic: impl Into<String>, comparator: Comparator, threshold: f64) -> Self {
        Self {
            topic: topic.into(),
            comparator,
            threshold,
        }
    }
}

/// Ordered rule table for the monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub rules: Vec<MonitorRule>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        use Comparator::*;

        let mut rules = vec![
            MonitorRule::new("Disability", Ge, 1.0),
            MonitorRule::new("Arthritis", Ge, 1.0),
            // 0 = not immunized
            MonitorRule::new("Immunization", Eq, 0.0),
            // fasting glucose mg/dL
            MonitorRule::new("Diabetes", Gt, 125.0),
            // 0 = good, 1 = fair, 2 = poor
            MonitorRule::new("Health Status", Ge, 2.0),
            // drinks per week
            MonitorRule::new("Alcohol", Gt, 14.0),
            MonitorRule::new("Asthma", Ge, 1.0),
            // hours per night
            MonitorRule::new("Sleep", Lt, 6.0),
        ];
        for topic in [
            "Oral Health",
            "Mental Health",
            "Cardiovascular Disease",
            "Cancer",
            "Tobacco",
            "Nutrition, Physical Activity, and Weight Status",
            "Chronic Obstructive Pulmonary Disease",
            "Social Determinants of Health",
            "Cognitive Health and Caregiving",
            "Maternal Health",
            "Chronic Kidney Disease",
        ] {
            rules.push(MonitorRule::new(topic, Ge, 1.0));
        }

        Self { rules }
    }
}

impl MonitorConfig {
    /// Reject duplicate topics and non-finite thresholds
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.topic.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate monitor rule for topic: {}",
                    rule.topic
                )));
            }
            if !rule.threshold.is_finite() {
                return Err(Error::Config(format!(
                    "monitor threshold for {} must be finite",
                    rule.topic
                )));
            }
        }
        Ok(())
    }
}

/// Outcome of one rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub topic: String,
    /// Value compared (0.0 when the record lacked the topic)
    pub value: f64,
    pub detected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// One entry per rule, in rule order
    pub detections: Vec<Detection>,
    pub plans: Vec<InterventionPlan>,
}

impl DetectionResult {
    pub fn is_detected(&self, topic: &str) -> Option<bool> {
        self.detections
            .iter()
            .find(|d| d.topic == topic)
            .map(|d| d.detected)
    }

    /// Plans for an arbitrary topic list; topics without a rule get the
    /// no-data plan
    pub fn project(&self, topics: &[String]) -> Vec<InterventionPlan> {
        topics
            .iter()
            .map(|topic| planner::plan(&display_name(topic), self.is_detected(topic)))
            .collect()
    }

    pub fn detected_count(&self) -> usize {
        self.detections.iter().filter(|d| d.detected).count()
    }
}

pub struct ThresholdMonitor {
    config: MonitorConfig,
}

impl Default for ThresholdMonitor {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}

impl ThresholdMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self { config }
    }

    pub fn rules(&self) -> &[MonitorRule] {
        &self.config.rules
    }

    /// Apply every rule to one individual's values
    pub fn detect(&self, values: &HealthValues) -> DetectionResult {
        let detections: Vec<Detection> = self
            .config
            .rules
            .iter()
            .map(|rule| {
                let value = values.get(&rule.topic).copied().unwrap_or(0.0);
                Detection {
                    topic: rule.topic.clone(),
                    value,
                    detected: rule.comparator.matches(value, rule.threshold),
                }
            })
            .collect();

        let plans = detections
            .iter()
            .map(|d| planner::plan(&display_name(&d.topic), Some(d.detected)))
            .collect();

        DetectionResult { detections, plans }
    }
}

/// Topic keys may use underscores in place of spaces
fn display_name(topic: &str) -> String {
    topic.replace('_', " ")
}
