//! Logistic regression classifier

use aprender::classification::LogisticRegression as Logistic;
use aprender::preprocessing::StandardScaler;
use serde::{Deserialize, Serialize};

use super::{
    check_width, class_indices, fit_scaler, from_class_indices, require_both_classes, scale,
    validate_fit, Classifier,
};
use crate::error::{Error, Result};
use crate::features::FeatureMatrix;
use crate::models::ClassifierKind;

/// Logistic regression hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    pub learning_rate: f64,
    pub max_iter: usize,
    /// Stop once every gradient component is below this
    pub tolerance: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            max_iter: 1000,
            tolerance: 1e-6,
        }
    }
}

/// Binary logistic regression over standardized features
///
/// The scaler is fit on the training rows only, so raw indicator magnitudes
/// do not dominate aprender's gradient descent step.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    params: LogisticParams,
    scaler: Option<StandardScaler>,
    inner: Option<Logistic>,
    n_features: Option<usize>,
}

impl LogisticRegression {
    pub fn new(params: LogisticParams) -> Self {
        Self {
            params,
            scaler: None,
            inner: None,
            n_features: None,
        }
    }

    /// Probability of the positive class for each row
    pub fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<f64>> {
        check_width(self.kind(), self.n_features, x)?;
        let (Some(scaler), Some(model)) = (&self.scaler, &self.inner) else {
            return Err(Error::fit(self.kind(), "model not fitted"));
        };

        let scaled = scale(scaler, x)?;
        Ok(model
            .predict_proba(&scaled)
            .as_slice()
            .iter()
            .map(|&p| f64::from(p))
            .collect())
    }
}

impl Classifier for LogisticRegression {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::LogisticRegression
    }

    fn fit(&mut self, x: &FeatureMatrix, y: &[bool]) -> Result<()> {
        let kind = self.kind();
        validate_fit(kind, x, y)?;
        require_both_classes(kind, y)?;

        let (scaler, scaled) = fit_scaler(kind, x)?;
        let mut model = Logistic::new()
            .with_learning_rate(self.params.learning_rate as f32)
            .with_max_iter(self.params.max_iter)
            .with_tolerance(self.params.tolerance as f32);
        model
            .fit(&scaled, &class_indices(y))
            .map_err(|e| Error::fit(kind, e.to_string()))?;

        let diverged = !model.intercept().is_finite()
            || model.coefficients().as_slice().iter().any(|w| !w.is_finite());
        if diverged {
            return Err(Error::fit(kind, "gradient descent diverged"));
        }

        self.scaler = Some(scaler);
        self.inner = Some(model);
        self.n_features = Some(x.n_cols());
        Ok(())
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<bool>> {
        check_width(self.kind(), self.n_features, x)?;
        let (Some(scaler), Some(model)) = (&self.scaler, &self.inner) else {
            return Err(Error::fit(self.kind(), "model not fitted"));
        };

        let scaled = scale(scaler, x)?;
        Ok(from_class_indices(&model.predict(&scaled)))
    }
}
