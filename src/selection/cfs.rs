//! Correlation-based feature subset selection.

use std::cmp::Ordering as CmpOrdering;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{RankfeatError, Result};
use crate::selection::correlation::CorrelationTable;
use crate::selection::matrix::FeatureMatrix;

/// Added under the square root of the merit denominator.
const MERIT_EPSILON: f64 = 1e-5;

/// CFS merit of a feature subset.
///
/// A single feature scores its label correlation. Larger subsets score
/// `k * avg_fc / sqrt(k + k * (k - 1) * avg_ff + 1e-5)`, with `avg_ff` taken
/// over unordered feature pairs. Strongly anti-correlated subsets can make
/// the radicand negative, which yields NaN.
pub fn merit(subset: &[usize], table: &CorrelationTable) -> f64 {
    match subset {
        [] => 0.0,
        [feature] => table.feature_class(*feature),
        _ => {
            let k = subset.len() as f64;
            let avg_fc = subset.iter().map(|f| table.feature_class(*f)).sum::<f64>() / k;

            let pairs = subset.len() * (subset.len() - 1) / 2;
            let ff_sum: f64 = subset
                .iter()
                .tuple_combinations()
                .map(|(a, b)| table.feature_feature(*a, *b))
                .sum();
            let avg_ff = ff_sum / pairs as f64;

            k * avg_fc / (k + k * (k - 1.0) * avg_ff + MERIT_EPSILON).sqrt()
        }
    }
}

/// How subsets of each size are searched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Score every subset of every size in the range.
    #[default]
    Exhaustive,
    /// Extend the previous size's winner by its best single feature.
    Forward,
}

/// Parameters of a [`FeatureSelector`] run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Smallest subset size, at least 1.
    pub from: usize,
    /// Largest subset size. All features when `None`.
    #[serde(default)]
    pub to: Option<usize>,
    #[serde(default)]
    pub strategy: SearchStrategy,
    /// Stop before starting a new size once this much time has passed.
    #[serde(default)]
    pub time_budget: Option<Duration>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        SelectionConfig {
            from: 1,
            to: None,
            strategy: SearchStrategy::Exhaustive,
            time_budget: None,
        }
    }
}

impl SelectionConfig {
    /// Sizes `from..=to` for subsets of `n` features.
    pub fn range(&self, n: usize) -> Result<(usize, usize)> {
        let to = self.to.unwrap_or(n);
        if self.from == 0 || self.from > to || to > n {
            return Err(RankfeatError::config(format!(
                "subset sizes must satisfy 1 <= from <= to <= {n}, got from = {}, to = {to}",
                self.from
            )));
        }
        Ok((self.from, to))
    }
}

/// Cooperative stop signal for a running selection.
///
/// Clones share the same flag. The selector looks at it between subset
/// sizes only.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Best subset of one size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSubset {
    pub size: usize,
    pub merit: f64,
    /// Column indices, ascending.
    pub indices: Vec<usize>,
    /// Feature names of `indices`.
    pub features: Vec<String>,
}

/// Result of a selection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionReport {
    /// One winner per completed size, ascending by size.
    pub subsets: Vec<ScoredSubset>,
    /// False when the run was cancelled or ran out of time.
    pub completed: bool,
}

impl SelectionReport {
    /// The winner with the highest merit over all sizes, smallest size on ties.
    pub fn best(&self) -> Option<&ScoredSubset> {
        self.subsets
            .iter()
            .reduce(|best, s| if beats(s.merit, 0, best.merit, 0) { s } else { best })
    }
}

/// Whether `(merit, order)` ranks before `(other, other_order)`.
///
/// Higher merit wins, NaN loses to any number, and equal merits go to the
/// lower enumeration order.
fn beats(merit: f64, order: usize, other: f64, other_order: usize) -> bool {
    match (merit.is_nan(), other.is_nan()) {
        (false, true) => true,
        (true, false) => false,
        (true, true) => order < other_order,
        (false, false) => match merit.partial_cmp(&other) {
            Some(CmpOrdering::Greater) => true,
            Some(CmpOrdering::Less) => false,
            _ => order < other_order,
        },
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    order: usize,
    merit: f64,
    indices: Vec<usize>,
}

fn better(a: Candidate, b: Candidate) -> Candidate {
    if beats(a.merit, a.order, b.merit, b.order) { a } else { b }
}

/// Picks, for every subset size in a range, the subset with the highest CFS
/// merit.
///
/// # Examples
///
/// ```
/// use rankfeat::selection::{CorrelationTable, FeatureSelector, SelectionConfig};
///
/// let table = CorrelationTable::from_parts(
///     vec![vec![1.0, 0.1], vec![0.1, 1.0]],
///     vec![0.5, -0.2],
/// )
/// .unwrap();
/// let names = vec!["a".to_string(), "b".to_string()];
///
/// let selector = FeatureSelector::new(SelectionConfig { to: Some(1), ..Default::default() });
/// let report = selector.select_with_table(&names, &table).unwrap();
///
/// assert_eq!(report.subsets[0].features, vec!["a"]);
/// assert_eq!(report.subsets[0].merit, 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureSelector {
    config: SelectionConfig,
    cancellation: CancellationToken,
}

impl FeatureSelector {
    pub fn new(config: SelectionConfig) -> Self {
        FeatureSelector {
            config,
            cancellation: CancellationToken::new(),
        }
    }

    /// Use `token` to stop the run from another thread.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Correlate the matrix and search it.
    pub fn select(&self, matrix: &FeatureMatrix) -> Result<SelectionReport> {
        self.config.range(matrix.n_features())?;
        let table = CorrelationTable::compute(matrix);
        self.select_with_table(matrix.names(), &table)
    }

    /// Search precomputed correlations. `names` labels the table's features.
    pub fn select_with_table(
        &self,
        names: &[String],
        table: &CorrelationTable,
    ) -> Result<SelectionReport> {
        if names.len() != table.len() {
            return Err(RankfeatError::invalid_argument(format!(
                "{} feature names for {} correlated features",
                names.len(),
                table.len()
            )));
        }
        let (from, to) = self.config.range(table.len())?;

        let started = Instant::now();
        let mut subsets = Vec::with_capacity(to - from + 1);
        let mut completed = true;
        let mut forward: Vec<usize> = Vec::new();

        let first = match self.config.strategy {
            SearchStrategy::Exhaustive => from,
            SearchStrategy::Forward => 1,
        };
        for size in first..=to {
            if let Some(reason) = self.stop_reason(started) {
                warn!(size, reason, "feature selection stopped early");
                completed = false;
                break;
            }

            let winner = match self.config.strategy {
                SearchStrategy::Exhaustive => best_of_size(table, size),
                SearchStrategy::Forward => {
                    let winner = best_extension(table, &forward);
                    if let Some(candidate) = &winner {
                        forward = candidate.indices.clone();
                    }
                    winner
                }
            };
            let Some(winner) = winner else {
                break;
            };

            debug!(
                size,
                merit = winner.merit,
                indices = ?winner.indices,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "best subset"
            );

            if size >= from {
                subsets.push(ScoredSubset {
                    size,
                    merit: winner.merit,
                    features: winner.indices.iter().map(|i| names[*i].clone()).collect(),
                    indices: winner.indices,
                });
            }
        }

        info!(
            features = table.len(),
            from,
            to,
            strategy = ?self.config.strategy,
            reported = subsets.len(),
            completed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "feature selection finished"
        );

        Ok(SelectionReport { subsets, completed })
    }

    fn stop_reason(&self, started: Instant) -> Option<&'static str> {
        if self.cancellation.is_cancelled() {
            return Some("cancelled");
        }
        match self.config.time_budget {
            Some(budget) if started.elapsed() >= budget => Some("time budget exhausted"),
            _ => None,
        }
    }
}

/// Best subset of `size` features, in lexicographic enumeration order on ties.
fn best_of_size(table: &CorrelationTable, size: usize) -> Option<Candidate> {
    (0..table.len())
        .combinations(size)
        .enumerate()
        .par_bridge()
        .map(|(order, indices)| Candidate {
            order,
            merit: merit(&indices, table),
            indices,
        })
        .reduce_with(better)
}

/// Best one-feature extension of `base`, lowest added index on ties.
fn best_extension(table: &CorrelationTable, base: &[usize]) -> Option<Candidate> {
    (0..table.len())
        .into_par_iter()
        .filter(|feature| !base.contains(feature))
        .map(|feature| {
            let mut indices = base.to_vec();
            indices.push(feature);
            indices.sort_unstable();
            Candidate {
                order: feature,
                merit: merit(&indices, table),
                indices,
            }
        })
        .reduce_with(better)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(ff: Vec<Vec<f64>>, fc: Vec<f64>) -> CorrelationTable {
        CorrelationTable::from_parts(ff, fc).unwrap()
    }

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{i}")).collect()
    }

    fn identity(n: usize) -> Vec<Vec<f64>> {
        (0..n)
            .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect()
    }

    #[test]
    fn test_single_feature_merit_is_label_correlation() {
        let t = table(identity(2), vec![0.5, -0.2]);
        assert_eq!(merit(&[0], &t), 0.5);
        assert_eq!(merit(&[1], &t), -0.2);
    }

    #[test]
    fn test_pair_merit() {
        let t = table(
            vec![vec![1.0, 0.2], vec![0.2, 1.0]],
            vec![0.6, 0.4],
        );
        let expected = 2.0 * 0.5 / (2.0 + 2.0 * 0.2 + 1e-5f64).sqrt();
        assert!((merit(&[0, 1], &t) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_range_validation() {
        let t = table(identity(3), vec![0.1, 0.2, 0.3]);
        for config in [
            SelectionConfig { from: 0, ..Default::default() },
            SelectionConfig { from: 3, to: Some(2), ..Default::default() },
            SelectionConfig { from: 1, to: Some(4), ..Default::default() },
        ] {
            let err = FeatureSelector::new(config)
                .select_with_table(&names(3), &t)
                .unwrap_err();
            assert!(err.is_config());
        }
    }

    #[test]
    fn test_exhaustive_picks_best_per_size() {
        // f0 and f1 are redundant, f2 is independent
        let t = table(
            vec![
                vec![1.0, 0.9, 0.0],
                vec![0.9, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
            ],
            vec![0.6, 0.5, 0.4],
        );
        let report = FeatureSelector::new(SelectionConfig::default())
            .select_with_table(&names(3), &t)
            .unwrap();

        assert!(report.completed);
        assert_eq!(report.subsets.len(), 3);
        assert_eq!(report.subsets[0].indices, vec![0]);
        assert_eq!(report.subsets[1].indices, vec![0, 2]);
        assert_eq!(report.subsets[1].features, vec!["f0", "f2"]);
        assert_eq!(report.subsets[2].indices, vec![0, 1, 2]);
        assert_eq!(report.best().unwrap().indices, vec![0, 2]);
    }

    #[test]
    fn test_ties_go_to_first_subset() {
        let t = table(identity(4), vec![0.3, 0.3, 0.3, 0.3]);
        let report = FeatureSelector::new(SelectionConfig { to: Some(2), ..Default::default() })
            .select_with_table(&names(4), &t)
            .unwrap();

        assert_eq!(report.subsets[0].indices, vec![0]);
        assert_eq!(report.subsets[1].indices, vec![0, 1]);
    }

    #[test]
    fn test_nan_merit_never_wins() {
        assert!(beats(-1.0, 5, f64::NAN, 0));
        assert!(!beats(f64::NAN, 0, -1.0, 5));
        assert!(beats(f64::NAN, 0, f64::NAN, 1));
    }

    #[test]
    fn test_forward_extends_previous_winner() {
        let t = table(
            vec![
                vec![1.0, 0.9, 0.0],
                vec![0.9, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
            ],
            vec![0.6, 0.5, 0.4],
        );
        let report = FeatureSelector::new(SelectionConfig {
            from: 2,
            strategy: SearchStrategy::Forward,
            ..Default::default()
        })
        .select_with_table(&names(3), &t)
        .unwrap();

        assert_eq!(report.subsets.len(), 2);
        assert_eq!(report.subsets[0].size, 2);
        assert_eq!(report.subsets[0].indices, vec![0, 2]);
        assert_eq!(report.subsets[1].indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_cancelled_before_start() {
        let t = table(identity(3), vec![0.1, 0.2, 0.3]);
        let token = CancellationToken::new();
        token.cancel();

        let report = FeatureSelector::new(SelectionConfig::default())
            .with_cancellation(token)
            .select_with_table(&names(3), &t)
            .unwrap();
        assert!(!report.completed);
        assert!(report.subsets.is_empty());
    }

    #[test]
    fn test_zero_time_budget_stops() {
        let t = table(identity(3), vec![0.1, 0.2, 0.3]);
        let report = FeatureSelector::new(SelectionConfig {
            time_budget: Some(Duration::ZERO),
            ..Default::default()
        })
        .select_with_table(&names(3), &t)
        .unwrap();
        assert!(!report.completed);
    }
}
