//! Leakage-safe feature selection and dense feature matrices

use aprender::primitives::Matrix;

use crate::error::{Error, Result};
use crate::models::{TopicId, WideTable};

/// Every topic except the target, in universe order
///
/// The target's own value would reconstruct its label, so it is never a
/// feature. All occurrences are removed; a target missing from the universe
/// leaves it unchanged.
pub fn select_features(universe: &[TopicId], target: TopicId) -> Vec<TopicId> {
    universe.iter().copied().filter(|&t| t != target).collect()
}

/// Dense feature matrix handed to the classifiers
///
/// Wraps aprender's row-major `Matrix<f32>`; indicator values are narrowed
/// from f64 when the matrix is built.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    inner: Matrix<f32>,
}

impl FeatureMatrix {
    pub fn from_vec(n_rows: usize, n_cols: usize, data: Vec<f32>) -> Result<Self> {
        let given = data.len();
        let inner = Matrix::from_vec(n_rows, n_cols, data).map_err(|e| {
            Error::DataShape(format!(
                "matrix {}x{} with {} values: {}",
                n_rows, n_cols, given, e
            ))
        })?;
        Ok(Self { inner })
    }

    /// Project registry-indexed rows onto `columns`
    ///
    /// A row shorter than a requested topic index contributes 0.0 for it.
    pub fn from_rows<'a, I>(rows: I, columns: &[TopicId]) -> Self
    where
        I: IntoIterator<Item = &'a [f64]>,
    {
        let rows: Vec<&[f64]> = rows.into_iter().collect();
        let mut inner = Matrix::zeros(rows.len(), columns.len());
        for (r, row) in rows.iter().enumerate() {
            for (c, col) in columns.iter().enumerate() {
                if let Some(&value) = row.get(col.index()) {
                    inner.set(r, c, value as f32);
                }
            }
        }
        Self { inner }
    }

    /// Feature matrix over every row of the wide table
    pub fn from_table(table: &WideTable, columns: &[TopicId]) -> Self {
        Self::from_rows(table.rows.iter().map(|r| r.values.as_slice()), columns)
    }

    pub fn as_matrix(&self) -> &Matrix<f32> {
        &self.inner
    }

    pub fn n_rows(&self) -> usize {
        self.inner.n_rows()
    }

    pub fn n_cols(&self) -> usize {
        self.inner.n_cols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.inner.shape()
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.inner.get(row, col)
    }

    pub fn row(&self, row: usize) -> &[f32] {
        let width = self.n_cols();
        &self.inner.as_slice()[row * width..(row + 1) * width]
    }

    pub fn column(&self, col: usize) -> Vec<f32> {
        (0..self.n_rows()).map(|r| self.get(r, col)).collect()
    }

    pub fn all_finite(&self) -> bool {
        self.inner.as_slice().iter().all(|v| v.is_finite())
    }
}

impl From<Matrix<f32>> for FeatureMatrix {
    fn from(inner: Matrix<f32>) -> Self {
        Self { inner }
    }
}
