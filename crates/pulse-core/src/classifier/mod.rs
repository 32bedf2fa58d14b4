//! Binary classifiers used for per-topic risk models
//!
//! Three families are available behind the [`Classifier`] trait, each a thin
//! adapter over an `aprender` model:
//!
//! - **Random forest** - `aprender::tree::RandomForestClassifier`
//! - **Logistic regression** - `aprender::classification::LogisticRegression`
//!   on standardized features
//! - **Linear SVM** - `aprender::classification::LinearSVM` on standardized
//!   features
//!
//! Every `fit` reports failures as [`Error::ClassifierFit`] so the trainer
//! can drop a candidate without aborting the topic.

pub mod forest;
pub mod logistic;
pub mod svm;

pub use forest::{ForestParams, RandomForestClassifier};
pub use logistic::{LogisticParams, LogisticRegression};
pub use svm::{LinearSvm, SvmParams};

use aprender::preprocessing::StandardScaler;
use aprender::primitives::Matrix;
use aprender::traits::Transformer;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::features::FeatureMatrix;
use crate::models::ClassifierKind;

/// A binary classifier over dense features
pub trait Classifier: Send + Sync {
    fn kind(&self) -> ClassifierKind;

    /// Fit to `x` (n_samples x n_features) and boolean labels
    fn fit(&mut self, x: &FeatureMatrix, y: &[bool]) -> Result<()>;

    /// Predict a label per row of `x`
    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<bool>>;
}

/// Hyperparameters for every classifier family
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifierParams {
    pub random_forest: ForestParams,
    pub logistic_regression: LogisticParams,
    pub svm: SvmParams,
}

/// Construct an unfitted classifier of the given kind
pub fn build(kind: ClassifierKind, params: &ClassifierParams, seed: u64) -> Box<dyn Classifier> {
    match kind {
        ClassifierKind::RandomForest => Box::new(RandomForestClassifier::new(
            params.random_forest.clone(),
            seed,
        )),
        ClassifierKind::LogisticRegression => {
            Box::new(LogisticRegression::new(params.logistic_regression.clone()))
        }
        ClassifierKind::Svm => Box::new(LinearSvm::new(params.svm.clone())),
    }
}

/// Shared input checks for `fit`
pub(crate) fn validate_fit(kind: ClassifierKind, x: &FeatureMatrix, y: &[bool]) -> Result<()> {
    if x.n_rows() != y.len() {
        return Err(Error::fit(
            kind,
            format!("{} samples but {} labels", x.n_rows(), y.len()),
        ));
    }
    if x.n_rows() == 0 {
        return Err(Error::fit(kind, "cannot fit with zero samples"));
    }
    if x.n_cols() == 0 {
        return Err(Error::fit(kind, "cannot fit with zero feature columns"));
    }
    if !x.all_finite() {
        return Err(Error::fit(kind, "features contain non-finite values"));
    }
    Ok(())
}

/// Linear models need both classes in the training labels
pub(crate) fn require_both_classes(kind: ClassifierKind, y: &[bool]) -> Result<()> {
    let positives = y.iter().filter(|&&l| l).count();
    if positives == 0 || positives == y.len() {
        return Err(Error::fit(
            kind,
            "training labels contain a single class",
        ));
    }
    Ok(())
}

/// Fitted models remember their width; a missing width means `fit` never ran
pub(crate) fn check_width(kind: ClassifierKind, fitted: Option<usize>, x: &FeatureMatrix) -> Result<()> {
    let expected = fitted.ok_or_else(|| Error::fit(kind, "model not fitted"))?;
    if x.n_cols() != expected {
        return Err(Error::FeatureMismatch {
            expected,
            actual: x.n_cols(),
        });
    }
    Ok(())
}

/// aprender labels classes by index: false -> 0, true -> 1
pub(crate) fn class_indices(y: &[bool]) -> Vec<usize> {
    y.iter().map(|&label| usize::from(label)).collect()
}

pub(crate) fn from_class_indices(y: &[usize]) -> Vec<bool> {
    y.iter().map(|&class| class == 1).collect()
}

/// Fit a z-score scaler on the training features and return the scaled copy
pub(crate) fn fit_scaler(kind: ClassifierKind, x: &FeatureMatrix) -> Result<(StandardScaler, Matrix<f32>)> {
    let mut scaler = StandardScaler::new();
    let scaled = scaler
        .fit_transform(x.as_matrix())
        .map_err(|e| Error::fit(kind, e.to_string()))?;
    Ok((scaler, scaled))
}

pub(crate) fn scale(scaler: &StandardScaler, x: &FeatureMatrix) -> Result<Matrix<f32>> {
    scaler
        .transform(x.as_matrix())
        .map_err(|e| Error::DataShape(e.to_string()))
}
