//! Data models for Pulse

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One long-format observation from the indicator dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    /// Observation year (YearStart)
    pub time: i32,
    /// Location the observation applies to (LocationDesc)
    pub entity: String,
    /// Disease topic (Topic)
    pub topic: String,
    /// Observed value (DataValue)
    pub value: f64,
}

impl IndicatorRecord {
    pub fn new(time: i32, entity: impl Into<String>, topic: impl Into<String>, value: f64) -> Self {
        Self {
            time,
            entity: entity.into(),
            topic: topic.into(),
            value,
        }
    }
}

/// Index of a topic in a [`TopicRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicId(usize);

impl TopicId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Canonical topic universe, in first-seen order
///
/// Built once while reshaping. Every later lookup by name goes through
/// [`TopicRegistry::resolve`], so a misspelled topic is an error rather than
/// an all-zero column.
#[derive(Debug, Clone, Default)]
pub struct TopicRegistry {
    names: Vec<String>,
    index: HashMap<String, TopicId>,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a topic name, returning its existing id if already known
    pub fn intern(&mut self, name: &str) -> TopicId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = TopicId(self.names.len());
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), id);
        id
    }

    /// Look up a topic by exact name
    pub fn id(&self, name: &str) -> Option<TopicId> {
        self.index.get(name).copied()
    }

    /// Look up a topic by exact name, failing on unknown names
    pub fn resolve(&self, name: &str) -> Result<TopicId> {
        self.id(name)
            .ok_or_else(|| Error::UnknownTopic(name.to_string()))
    }

    pub fn name(&self, id: TopicId) -> &str {
        &self.names[id.0]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All topic ids in first-seen order
    pub fn ids(&self) -> Vec<TopicId> {
        (0..self.names.len()).map(TopicId).collect()
    }

    /// All topic names in first-seen order
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Wide-table row key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowKey {
    pub time: i32,
    pub entity: String,
}

/// One (time, entity) row of the wide matrix
///
/// `values` is dense: one cell per registry topic, indexed by [`TopicId`].
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub key: RowKey,
    pub values: Vec<f64>,
}

impl WideRow {
    pub fn value(&self, topic: TopicId) -> f64 {
        self.values.get(topic.index()).copied().unwrap_or(0.0)
    }
}

/// Dense wide matrix produced by the reshaper
#[derive(Debug, Clone, Default)]
pub struct WideTable {
    pub registry: TopicRegistry,
    pub rows: Vec<WideRow>,
}

impl WideTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one topic, in row order
    pub fn column(&self, topic: TopicId) -> Vec<f64> {
        self.rows.iter().map(|r| r.value(topic)).collect()
    }
}

/// Classifier families evaluated for each topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    RandomForest,
    LogisticRegression,
    Svm,
}

impl ClassifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierKind::RandomForest => "random_forest",
            ClassifierKind::LogisticRegression => "logistic_regression",
            ClassifierKind::Svm => "svm",
        }
    }

    /// Name used in console output
    pub fn display_name(&self) -> &'static str {
        match self {
            ClassifierKind::RandomForest => "RandomForest",
            ClassifierKind::LogisticRegression => "LogisticRegression",
            ClassifierKind::Svm => "SVM",
        }
    }

    /// Fixed evaluation order
    pub fn all() -> &'static [ClassifierKind] {
        &[
            ClassifierKind::RandomForest,
            ClassifierKind::LogisticRegression,
            ClassifierKind::Svm,
        ]
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClassifierKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random_forest" | "randomforest" => Ok(ClassifierKind::RandomForest),
            "logistic_regression" | "logisticregression" => Ok(ClassifierKind::LogisticRegression),
            "svm" | "svc" => Ok(ClassifierKind::Svm),
            _ => Err(format!("Unknown classifier: {}", s)),
        }
    }
}

/// Summary of the model selected for a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicModel {
    pub topic: String,
    /// Median used to derive the labels
    pub threshold: f64,
    pub classifier_kind: ClassifierKind,
    pub holdout_accuracy: f64,
}

/// Predicted risk for one (row, topic) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub time: i32,
    pub entity: String,
    pub topic: String,
    /// True when the model predicts a value above the topic median
    pub risk: bool,
}

/// Recommended action for a topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Intervene,
    Maintain,
    /// No model (or no rule) exists for the topic
    NoData,
}

impl Recommendation {
    pub fn from_risk(risk: Option<bool>) -> Self {
        match risk {
            Some(true) => Recommendation::Intervene,
            Some(false) => Recommendation::Maintain,
            None => Recommendation::NoData,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Intervene => "intervene",
            Recommendation::Maintain => "maintain",
            Recommendation::NoData => "no_data",
        }
    }

    /// Risk flag as written to report columns (1, 0, or empty)
    pub fn risk_flag(&self) -> &'static str {
        match self {
            Recommendation::Intervene => "1",
            Recommendation::Maintain => "0",
            Recommendation::NoData => "",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Human-readable recommendation for a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionPlan {
    pub topic: String,
    pub recommendation: Recommendation,
    pub text: String,
}
