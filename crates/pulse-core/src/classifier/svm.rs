//! Linear support vector machine

use aprender::classification::LinearSVM;
use aprender::preprocessing::StandardScaler;
use serde::{Deserialize, Serialize};

use super::{
    check_width, class_indices, fit_scaler, from_class_indices, require_both_classes, scale,
    validate_fit, Classifier,
};
use crate::error::{Error, Result};
use crate::features::FeatureMatrix;
use crate::models::ClassifierKind;

/// Linear SVM hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvmParams {
    /// Inverse regularization strength; larger fits the data more closely
    pub c: f64,
    pub learning_rate: f64,
    pub max_iter: usize,
    /// Stop once the parameter update norm drops below this
    pub tolerance: f64,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            learning_rate: 0.01,
            max_iter: 1000,
            tolerance: 1e-6,
        }
    }
}

/// Soft-margin linear SVM over standardized features
#[derive(Debug, Clone)]
pub struct LinearSvm {
    params: SvmParams,
    scaler: Option<StandardScaler>,
    inner: Option<LinearSVM>,
    n_features: Option<usize>,
}

impl LinearSvm {
    pub fn new(params: SvmParams) -> Self {
        Self {
            params,
            scaler: None,
            inner: None,
            n_features: None,
        }
    }

    fn fitted(&self, x: &FeatureMatrix) -> Result<(&StandardScaler, &LinearSVM)> {
        check_width(self.kind(), self.n_features, x)?;
        match (&self.scaler, &self.inner) {
            (Some(scaler), Some(model)) => Ok((scaler, model)),
            _ => Err(Error::fit(self.kind(), "model not fitted")),
        }
    }

    /// Signed distance proxy `w·x + b`; non-negative means high risk
    pub fn decision_function(&self, x: &FeatureMatrix) -> Result<Vec<f64>> {
        let (scaler, model) = self.fitted(x)?;
        let decisions = model
            .decision_function(&scale(scaler, x)?)
            .map_err(|e| Error::DataShape(e.to_string()))?;
        Ok(decisions.into_iter().map(f64::from).collect())
    }
}

impl Classifier for LinearSvm {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::Svm
    }

    fn fit(&mut self, x: &FeatureMatrix, y: &[bool]) -> Result<()> {
        let kind = self.kind();
        validate_fit(kind, x, y)?;
        if !(self.params.c > 0.0) {
            return Err(Error::fit(kind, format!("c must be positive, got {}", self.params.c)));
        }
        require_both_classes(kind, y)?;

        let (scaler, scaled) = fit_scaler(kind, x)?;
        let mut model = LinearSVM::new()
            .with_c(self.params.c as f32)
            .with_learning_rate(self.params.learning_rate as f32)
            .with_max_iter(self.params.max_iter)
            .with_tolerance(self.params.tolerance as f32);
        model
            .fit(&scaled, &class_indices(y))
            .map_err(|e| Error::fit(kind, e.to_string()))?;

        let decisions = model
            .decision_function(&scaled)
            .map_err(|e| Error::fit(kind, e.to_string()))?;
        if decisions.iter().any(|d| !d.is_finite()) {
            return Err(Error::fit(kind, "subgradient descent diverged"));
        }

        self.scaler = Some(scaler);
        self.inner = Some(model);
        self.n_features = Some(x.n_cols());
        Ok(())
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<bool>> {
        let (scaler, model) = self.fitted(x)?;
        let classes = model
            .predict(&scale(scaler, x)?)
            .map_err(|e| Error::DataShape(e.to_string()))?;
        Ok(from_class_indices(&classes))
    }
}
