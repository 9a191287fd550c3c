//! Correlation-based feature selection (CFS).
//!
//! Features are scored as subsets: a good subset correlates with the label
//! and little with itself. [`FeatureSelector`] reports the best subset of each
//! size in a range, searching either every subset or greedily.
//!
//! # Examples
//!
//! ```
//! use rankfeat::selection::{FeatureMatrix, FeatureRow, FeatureSelector, SelectionConfig};
//!
//! let mut matrix = FeatureMatrix::new(["tf", "noise"]);
//! for (i, (label, tf, noise)) in [(1.0, 3.0, 0.2), (0.0, 0.0, 0.9), (1.0, 2.0, 0.4), (0.0, 1.0, 0.1)]
//!     .into_iter()
//!     .enumerate()
//! {
//!     matrix
//!         .push_row(FeatureRow::new("q1", format!("d{i}"), label, vec![tf, noise]))
//!         .unwrap();
//! }
//!
//! let report = FeatureSelector::new(SelectionConfig::default()).select(&matrix).unwrap();
//! assert_eq!(report.subsets[0].features, vec!["tf"]);
//! ```

pub mod cfs;
pub mod correlation;
pub mod matrix;

pub use cfs::{
    CancellationToken, FeatureSelector, ScoredSubset, SearchStrategy, SelectionConfig,
    SelectionReport, merit,
};
pub use correlation::{CorrelationTable, pearson_correlation};
pub use matrix::{FeatureMatrix, FeatureRow};
