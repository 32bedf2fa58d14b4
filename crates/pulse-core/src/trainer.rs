//! Per-topic model training and selection
//!
//! For each topic the trainer:
//! 1. Splits rows into a reproducible 80/20 train/holdout partition
//! 2. Fits every configured classifier on the training rows
//! 3. Keeps the one with the highest holdout accuracy (earlier kinds win ties)
//! 4. Refits that kind on all rows for production predictions
//!
//! A classifier that fails to fit is skipped. A topic is untrainable when
//! its labels have a single class, it has too few rows for a holdout split,
//! or no classifier fits.

use aprender::model_selection::train_test_split;
use aprender::primitives::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classifier::{self, Classifier, ClassifierParams};
use crate::error::{Error, Result};
use crate::features::FeatureMatrix;
use crate::label::TopicLabels;
use crate::models::{ClassifierKind, TopicId, TopicModel};

/// Training configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    /// Fraction of rows held out for evaluation
    pub test_size: f64,
    /// Seed for the holdout shuffle and forest sampling
    pub seed: u64,
    /// Topics with fewer rows are untrainable
    pub min_rows: usize,
    /// Candidates in evaluation order
    pub classifiers: Vec<ClassifierKind>,
    pub params: ClassifierParams,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: 42,
            min_rows: 5,
            classifiers: ClassifierKind::all().to_vec(),
            params: ClassifierParams::default(),
        }
    }
}

/// How one candidate fared on the holdout rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateOutcome {
    Scored { accuracy: f64 },
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub kind: ClassifierKind,
    pub outcome: CandidateOutcome,
}

/// A topic's selected classifier, refit on every row
pub struct TrainedModel {
    pub summary: TopicModel,
    pub topic: TopicId,
    /// Feature columns, in the order the classifier expects them
    pub features: Vec<TopicId>,
    pub candidates: Vec<CandidateScore>,
    classifier: Box<dyn Classifier>,
}

impl TrainedModel {
    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }
}

impl std::fmt::Debug for TrainedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainedModel")
            .field("summary", &self.summary)
            .field("features", &self.features)
            .field("candidates", &self.candidates)
            .finish()
    }
}

/// Train and holdout partitions of one topic's rows
#[derive(Debug, Clone, PartialEq)]
pub struct Holdout {
    pub x_train: FeatureMatrix,
    pub x_test: FeatureMatrix,
    pub y_train: Vec<bool>,
    pub y_test: Vec<bool>,
}

/// Deterministic train/holdout partition
///
/// Row order is shuffled by aprender's seeded `train_test_split`;
/// `round(n * test_size)` rows are held out and both sides must be non-empty.
pub fn holdout_split(x: &FeatureMatrix, y: &[bool], test_size: f64, seed: u64) -> Result<Holdout> {
    let targets = Vector::from_vec(y.iter().map(|&l| if l { 1.0 } else { 0.0 }).collect());
    let (x_train, x_test, y_train, y_test) =
        train_test_split(x.as_matrix(), &targets, test_size as f32, Some(seed))
            .map_err(Error::DataShape)?;

    let to_labels =
        |v: &Vector<f32>| -> Vec<bool> { v.as_slice().iter().map(|&l| l > 0.5).collect() };
    Ok(Holdout {
        x_train: x_train.into(),
        x_test: x_test.into(),
        y_train: to_labels(&y_train),
        y_test: to_labels(&y_test),
    })
}

/// Fraction of predictions that exactly match the labels
pub fn accuracy(predicted: &[bool], truth: &[bool]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .zip(truth)
        .filter(|(p, t)| p == t)
        .count();
    correct as f64 / truth.len() as f64
}

pub struct RiskModelTrainer {
    config: TrainingConfig,
}

impl Default for RiskModelTrainer {
    fn default() -> Self {
        Self::new(TrainingConfig::default())
    }
}

impl RiskModelTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train and select a model for one topic
    ///
    /// `x` must be built from `features`, with rows aligned to `labels`.
    /// Fails only with [`Error::UntrainableTopic`].
    pub fn train(
        &self,
        topic_name: &str,
        x: &FeatureMatrix,
        labels: &TopicLabels,
        features: Vec<TopicId>,
    ) -> Result<TrainedModel> {
        let y = &labels.labels;
        let n_rows = x.n_rows();

        if n_rows < self.config.min_rows.max(2) {
            return Err(Error::untrainable(
                topic_name,
                format!(
                    "only {} rows; at least {} needed for a holdout split",
                    n_rows,
                    self.config.min_rows.max(2)
                ),
            ));
        }
        if !labels.has_both_classes() {
            return Err(Error::untrainable(
                topic_name,
                "label has no variance (all rows on one side of the median)",
            ));
        }

        let split = holdout_split(x, y, self.config.test_size, self.config.seed)
            .map_err(|e| Error::untrainable(topic_name, e.to_string()))?;

        let mut candidates = Vec::with_capacity(self.config.classifiers.len());
        let mut best: Option<(ClassifierKind, f64)> = None;

        for &kind in &self.config.classifiers {
            match self.evaluate(kind, &split) {
                Ok(acc) => {
                    debug!(topic = topic_name, classifier = kind.as_str(), accuracy = acc, "Candidate scored");
                    if best.map_or(true, |(_, best_acc)| acc > best_acc) {
                        best = Some((kind, acc));
                    }
                    candidates.push(CandidateScore {
                        kind,
                        outcome: CandidateOutcome::Scored { accuracy: acc },
                    });
                }
                Err(e) => {
                    debug!(topic = topic_name, classifier = kind.as_str(), error = %e, "Candidate skipped");
                    candidates.push(CandidateScore {
                        kind,
                        outcome: CandidateOutcome::Skipped {
                            reason: e.to_string(),
                        },
                    });
                }
            }
        }

        let Some((kind, holdout_accuracy)) = best else {
            return Err(Error::untrainable(topic_name, "every classifier failed to fit"));
        };

        let mut classifier = classifier::build(kind, &self.config.params, self.config.seed);
        classifier
            .fit(x, y)
            .map_err(|e| Error::untrainable(topic_name, format!("refit on full data failed: {}", e)))?;

        info!(
            topic = topic_name,
            classifier = kind.as_str(),
            accuracy = holdout_accuracy,
            "Selected model"
        );

        Ok(TrainedModel {
            summary: TopicModel {
                topic: topic_name.to_string(),
                threshold: labels.threshold,
                classifier_kind: kind,
                holdout_accuracy,
            },
            topic: labels.topic,
            features,
            candidates,
            classifier,
        })
    }

    fn evaluate(&self, kind: ClassifierKind, split: &Holdout) -> Result<f64> {
        let mut classifier = classifier::build(kind, &self.config.params, self.config.seed);
        classifier.fit(&split.x_train, &split.y_train)?;
        let predicted = classifier.predict(&split.x_test)?;
        Ok(accuracy(&predicted, &split.y_test))
    }
}
