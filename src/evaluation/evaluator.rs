//! Per-query and per-run rank evaluation.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{RankfeatError, Result};
use crate::evaluation::metrics::{
    gold_ndcg_at_k, join_scores, mean_prefix_precision, ndcg_at_k, precision_at_k,
};
use crate::evaluation::{GoldStandard, Judgments, RankedList};

/// A rank quality metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Precision at k.
    #[serde(rename = "precision")]
    Precision,
    /// NDCG against the returned documents.
    #[serde(rename = "ndcg")]
    Ndcg,
    /// NDCG against every gold judgment.
    #[serde(rename = "ndcgg")]
    GoldNdcg,
    /// Mean precision over every prefix up to k.
    #[serde(rename = "map")]
    Map,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Precision, Metric::Ndcg, Metric::GoldNdcg, Metric::Map];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Precision => "precision",
            Metric::Ndcg => "ndcg",
            Metric::GoldNdcg => "ndcgg",
            Metric::Map => "map",
        }
    }

    fn score(&self, relevance: &[f64], gold: &Judgments, k: usize) -> f64 {
        match self {
            Metric::Precision => precision_at_k(relevance, k),
            Metric::Ndcg => ndcg_at_k(relevance, k),
            Metric::GoldNdcg => gold_ndcg_at_k(relevance, gold, k),
            Metric::Map => mean_prefix_precision(relevance, k),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn default_k() -> usize {
    10
}

fn default_metrics() -> Vec<Metric> {
    Metric::ALL.to_vec()
}

/// Cutoff and metrics of a [`RankEvaluator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Cutoff, at least 1.
    #[serde(default = "default_k")]
    pub k: usize,
    /// Metrics to compute, at least one.
    #[serde(default = "default_metrics")]
    pub metrics: Vec<Metric>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        EvaluationConfig {
            k: default_k(),
            metrics: default_metrics(),
        }
    }
}

impl EvaluationConfig {
    pub fn new(k: usize, metrics: &[Metric]) -> Self {
        EvaluationConfig {
            k,
            metrics: metrics.to_vec(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(RankfeatError::config("cutoff k must be at least 1"));
        }
        if self.metrics.is_empty() {
            return Err(RankfeatError::config("at least one metric is required"));
        }
        Ok(())
    }
}

/// Scores of one run, per metric, in the query order of the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Query ids in input order.
    pub query_ids: Vec<String>,
    /// Per-query scores of each metric, aligned with `query_ids`.
    pub scores: BTreeMap<Metric, Vec<f64>>,
}

impl EvaluationReport {
    /// Per-query scores of `metric`.
    pub fn scores(&self, metric: Metric) -> Option<&[f64]> {
        self.scores.get(&metric).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.query_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.query_ids.is_empty()
    }
}

/// Scores ranked lists against graded gold judgments.
#[derive(Debug, Clone)]
pub struct RankEvaluator {
    config: EvaluationConfig,
}

impl RankEvaluator {
    /// Create an evaluator, rejecting `k = 0` and an empty metric list.
    pub fn new(config: EvaluationConfig) -> Result<Self> {
        config.validate()?;
        Ok(RankEvaluator { config })
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Score one ranked list. Every metric is 1.0 when `gold` is empty.
    pub fn score_query<S: AsRef<str>>(
        &self,
        gold: &Judgments,
        predicted: &[S],
    ) -> BTreeMap<Metric, f64> {
        if gold.is_empty() {
            return self.config.metrics.iter().map(|m| (*m, 1.0)).collect();
        }

        let k = self.config.k;
        let relevance = join_scores(gold, predicted, k);
        self.config
            .metrics
            .iter()
            .map(|metric| (*metric, metric.score(&relevance, gold, k)))
            .collect()
    }

    /// Score every ranked list in parallel.
    ///
    /// A query missing from `gold_standard` is scored as if it had no
    /// judgments.
    pub fn evaluate(&self, gold_standard: &GoldStandard, ranked: &[RankedList]) -> EvaluationReport {
        let empty = HashMap::new();
        let per_query: Vec<BTreeMap<Metric, f64>> = ranked
            .par_iter()
            .map(|list| {
                let gold = match gold_standard.get(&list.query_id) {
                    Some(gold) => gold,
                    None => {
                        warn!(query = %list.query_id, "no gold judgments for query");
                        &empty
                    }
                };
                self.score_query(gold, &list.doc_ids)
            })
            .collect();

        let mut scores: BTreeMap<Metric, Vec<f64>> = BTreeMap::new();
        for metric in &self.config.metrics {
            let column = per_query
                .iter()
                .map(|row| row.get(metric).copied().unwrap_or(0.0))
                .collect();
            scores.insert(*metric, column);
        }

        info!(
            queries = ranked.len(),
            k = self.config.k,
            metrics = ?self.config.metrics,
            "evaluated ranking run"
        );

        EvaluationReport {
            query_ids: ranked.iter().map(|list| list.query_id.clone()).collect(),
            scores,
        }
    }
}
