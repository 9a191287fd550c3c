//! Term frequency statistics.

use crate::analysis::count_occurrences;
use crate::error::Result;
use crate::features::family::{FeatureExtractor, FeatureFamily, Summary};
use crate::features::pair::AnalyzedPair;
use crate::features::vector::FeatureVector;

/// Raw substring counts of each distinct query term in the passage.
pub(crate) fn raw_term_counts(pair: &AnalyzedPair) -> Vec<f64> {
    pair.distinct_query_terms()
        .into_iter()
        .map(|term| count_occurrences(&pair.passage_lower, term) as f64)
        .collect()
}

/// Sum, min, max, mean and variance of query term counts, raw and divided by
/// the number of distinct query terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermFrequencyExtractor;

impl TermFrequencyExtractor {
    pub fn new() -> Self {
        TermFrequencyExtractor
    }
}

impl FeatureExtractor for TermFrequencyExtractor {
    fn family(&self) -> FeatureFamily {
        FeatureFamily::TermFrequency
    }

    fn extract(&self, pair: &AnalyzedPair, out: &mut FeatureVector) -> Result<()> {
        let raw = raw_term_counts(pair);
        let terms = raw.len() as f64;
        let normalized: Vec<f64> = raw.iter().map(|count| count / terms).collect();

        Summary::of(&raw).write_to(out, "tf");
        Summary::of(&normalized).write_to(out, "length_norm_tf");
        Ok(())
    }
}
