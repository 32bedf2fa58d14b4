//! Random forest classifier
//!
//! Adapter over `aprender::tree::RandomForestClassifier`: bootstrap-sampled
//! CART trees seeded from `seed + i`. Votes are read through
//! `predict_proba` so a split vote always resolves to the negative class.

use aprender::tree::RandomForestClassifier as Forest;
use serde::{Deserialize, Serialize};

use super::{check_width, class_indices, validate_fit, Classifier};
use crate::error::{Error, Result};
use crate::features::FeatureMatrix;
use crate::models::ClassifierKind;

/// Random forest hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    /// Maximum tree depth (root has depth 0); unbounded when `None`
    pub max_depth: Option<usize>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomForestClassifier {
    params: ForestParams,
    seed: u64,
    inner: Option<Forest>,
    n_features: Option<usize>,
}

impl RandomForestClassifier {
    pub fn new(params: ForestParams, seed: u64) -> Self {
        Self {
            params,
            seed,
            inner: None,
            n_features: None,
        }
    }
}

impl Classifier for RandomForestClassifier {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::RandomForest
    }

    fn fit(&mut self, x: &FeatureMatrix, y: &[bool]) -> Result<()> {
        let kind = self.kind();
        validate_fit(kind, x, y)?;
        if self.params.n_estimators == 0 {
            return Err(Error::fit(kind, "n_estimators must be at least 1"));
        }

        let mut forest = Forest::new(self.params.n_estimators).with_random_state(self.seed);
        if let Some(depth) = self.params.max_depth {
            forest = forest.with_max_depth(depth);
        }
        forest
            .fit(x.as_matrix(), &class_indices(y))
            .map_err(|e| Error::fit(kind, e.to_string()))?;

        self.inner = Some(forest);
        self.n_features = Some(x.n_cols());
        Ok(())
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<bool>> {
        check_width(self.kind(), self.n_features, x)?;
        let Some(forest) = &self.inner else {
            return Err(Error::fit(self.kind(), "model not fitted"));
        };

        // A forest fit on negatives only reports a single class column
        let proba = forest.predict_proba(x.as_matrix());
        let has_positive = proba.n_cols() > 1;
        Ok((0..x.n_rows())
            .map(|r| has_positive && proba.get(r, 1) > proba.get(r, 0))
            .collect())
    }
}
