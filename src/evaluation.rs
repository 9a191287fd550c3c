//! Rank quality evaluation.
//!
//! [`metrics`] holds the metric functions over relevance vectors.
//! [`RankEvaluator`] applies a configured set of them to every query of a run.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//!
//! use rankfeat::evaluation::{EvaluationConfig, GoldStandard, Metric, RankEvaluator, RankedList};
//!
//! let mut gold = GoldStandard::new();
//! gold.insert(
//!     "q1".to_string(),
//!     HashMap::from([("d1".to_string(), 2.0), ("d2".to_string(), 1.0)]),
//! );
//!
//! let evaluator = RankEvaluator::new(EvaluationConfig::new(2, &[Metric::Precision])).unwrap();
//! let report = evaluator.evaluate(&gold, &[RankedList::new("q1", ["d2", "d9"])]);
//!
//! assert_eq!(report.scores(Metric::Precision), Some(&[0.5][..]));
//! ```

pub mod evaluator;
pub mod metrics;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use evaluator::{EvaluationConfig, EvaluationReport, Metric, RankEvaluator};

/// Graded relevance of documents for one query, keyed by document id.
pub type Judgments = HashMap<String, f64>;

/// Judgments of every query, keyed by query id.
pub type GoldStandard = HashMap<String, Judgments>;

/// Documents returned for one query, best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedList {
    pub query_id: String,
    pub doc_ids: Vec<String>,
}

impl RankedList {
    pub fn new<Q, I, S>(query_id: Q, doc_ids: I) -> Self
    where
        Q: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RankedList {
            query_id: query_id.into(),
            doc_ids: doc_ids.into_iter().map(Into::into).collect(),
        }
    }
}
