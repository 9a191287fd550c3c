//! Pearson correlations between features and with the label.

use rayon::prelude::*;
use tracing::warn;

use crate::error::{RankfeatError, Result};
use crate::selection::matrix::FeatureMatrix;

/// Pearson correlation coefficient of `x` and `y`.
///
/// Returns 0 where the coefficient is undefined: mismatched lengths, fewer
/// than two samples, or a constant input.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return 0.0;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if r.is_nan() { 0.0 } else { r }
}

/// Feature-feature and feature-label correlations of a matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationTable {
    n: usize,
    /// Row-major n x n, symmetric, diagonal 1.
    feature_feature: Vec<f64>,
    feature_class: Vec<f64>,
}

impl CorrelationTable {
    /// Correlate every column pair and every column with the labels.
    pub fn compute(matrix: &FeatureMatrix) -> Self {
        let n = matrix.n_features();
        let columns: Vec<Vec<f64>> = (0..n).map(|j| matrix.column(j)).collect();
        let labels = matrix.labels();

        let constant = columns
            .iter()
            .filter(|column| column.windows(2).all(|w| w[0] == w[1]))
            .count();
        if constant > 0 {
            warn!(constant, features = n, "constant feature columns correlate as 0");
        }

        let feature_class: Vec<f64> = columns
            .par_iter()
            .map(|column| pearson_correlation(column, &labels))
            .collect();

        let upper: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                (i + 1..n)
                    .map(|j| pearson_correlation(&columns[i], &columns[j]))
                    .collect()
            })
            .collect();

        let mut feature_feature = vec![0.0; n * n];
        for (i, row) in upper.iter().enumerate() {
            feature_feature[i * n + i] = 1.0;
            for (offset, r) in row.iter().enumerate() {
                let j = i + 1 + offset;
                feature_feature[i * n + j] = *r;
                feature_feature[j * n + i] = *r;
            }
        }

        CorrelationTable {
            n,
            feature_feature,
            feature_class,
        }
    }

    /// Build a table from precomputed correlations.
    ///
    /// `feature_feature` is indexed `[i][j]` and must be `n x n` where `n` is
    /// the length of `feature_class`. NaN entries are stored as 0.
    pub fn from_parts(feature_feature: Vec<Vec<f64>>, feature_class: Vec<f64>) -> Result<Self> {
        let n = feature_class.len();
        if feature_feature.len() != n || feature_feature.iter().any(|row| row.len() != n) {
            return Err(RankfeatError::invalid_argument(format!(
                "feature-feature correlations must be {n} x {n}"
            )));
        }

        let clean = |r: f64| if r.is_nan() { 0.0 } else { r };
        Ok(CorrelationTable {
            n,
            feature_feature: feature_feature.into_iter().flatten().map(clean).collect(),
            feature_class: feature_class.into_iter().map(clean).collect(),
        })
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Correlation of features `i` and `j`.
    pub fn feature_feature(&self, i: usize, j: usize) -> f64 {
        self.feature_feature[i * self.n + j]
    }

    /// Correlation of feature `i` with the label.
    pub fn feature_class(&self, i: usize) -> f64 {
        self.feature_class[i]
    }
}
