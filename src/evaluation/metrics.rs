//! Rank quality metrics over relevance vectors.
//!
//! A relevance vector holds the gold relevance of each returned document in
//! rank order, 0 for documents without a judgment. Positions are 1-indexed in
//! the formulas below.

use std::collections::HashMap;

/// Relevance vector of the first `k` ids of `predicted`.
///
/// Ids without a gold judgment get 0, and the vector is right-padded with
/// zeros when fewer than `k` ids were returned.
///
/// ```
/// use std::collections::HashMap;
///
/// use rankfeat::evaluation::metrics::join_scores;
///
/// let gold = HashMap::from([("d1".to_string(), 3.0), ("d2".to_string(), 1.0)]);
/// assert_eq!(join_scores(&gold, &["d1", "d3", "d2"], 4), vec![3.0, 0.0, 1.0, 0.0]);
/// ```
pub fn join_scores<S: AsRef<str>>(
    gold: &HashMap<String, f64>,
    predicted: &[S],
    k: usize,
) -> Vec<f64> {
    let mut relevance: Vec<f64> = predicted
        .iter()
        .take(k)
        .map(|id| gold.get(id.as_ref()).copied().unwrap_or(0.0))
        .collect();
    relevance.resize(k, 0.0);
    relevance
}

/// Fraction of the first `k` positions holding a relevant document.
pub fn precision_at_k(relevance: &[f64], k: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }
    let relevant = relevance.iter().take(k).filter(|r| **r > 0.0).count();
    relevant as f64 / k as f64
}

/// `DCG@k = sum(r_i / log2(i + 1))` for `i` in `1..=k`.
pub fn dcg_at_k(relevance: &[f64], k: usize) -> f64 {
    relevance
        .iter()
        .take(k)
        .enumerate()
        .map(|(i, r)| r / ((i + 2) as f64).log2())
        .sum()
}

fn sorted_descending(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.into_iter().collect();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

fn normalized(dcg: f64, ideal: f64) -> f64 {
    if ideal == 0.0 { 0.0 } else { dcg / ideal }
}

/// DCG normalized by the DCG of the same vector sorted descending.
///
/// Only the returned documents count toward the ideal, so a list that ranks
/// its few relevant hits first scores 1.0 even when it missed others.
pub fn ndcg_at_k(relevance: &[f64], k: usize) -> f64 {
    let ideal = sorted_descending(relevance.iter().copied());
    normalized(dcg_at_k(relevance, k), dcg_at_k(&ideal, k))
}

/// DCG normalized by the DCG of every gold judgment of the query sorted
/// descending.
pub fn gold_ndcg_at_k(relevance: &[f64], gold: &HashMap<String, f64>, k: usize) -> f64 {
    let ideal = sorted_descending(gold.values().copied());
    normalized(dcg_at_k(relevance, k), dcg_at_k(&ideal, k))
}

/// Mean of `precision@i` over `i` in `1..=k`.
///
/// This is reported as "MAP" but is not average precision: every prefix
/// counts, relevant at that position or not.
pub fn mean_prefix_precision(relevance: &[f64], k: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }
    let total: f64 = (1..=k).map(|i| precision_at_k(relevance, i)).sum();
    total / k as f64
}
