//! Feature families and the extractor interface.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::features::pair::AnalyzedPair;
use crate::features::vector::FeatureVector;

/// A group of related features, enabled or disabled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureFamily {
    /// Statistics of query term counts in the passage.
    TermFrequency,
    /// idf and tf-idf statistics.
    InverseDocumentFrequency,
    /// Stemmed query/passage overlap.
    TermOverlap,
    /// Stemmed overlap after synonym expansion.
    SynonymOverlap,
    /// Smoothed language model scores.
    LanguageModel,
    /// Dirichlet-smoothed query likelihood.
    QueryLikelihood,
    /// Passage length and exact match.
    Simple,
}

impl FeatureFamily {
    /// Every family, in the order the engine runs them by default.
    pub const ALL: [FeatureFamily; 7] = [
        FeatureFamily::TermFrequency,
        FeatureFamily::InverseDocumentFrequency,
        FeatureFamily::TermOverlap,
        FeatureFamily::SynonymOverlap,
        FeatureFamily::LanguageModel,
        FeatureFamily::QueryLikelihood,
        FeatureFamily::Simple,
    ];

    /// Names of the features this family writes.
    pub fn feature_names(&self) -> &'static [&'static str] {
        match self {
            FeatureFamily::TermFrequency => &[
                "sum_tf",
                "min_tf",
                "max_tf",
                "mean_tf",
                "var_tf",
                "sum_length_norm_tf",
                "min_length_norm_tf",
                "max_length_norm_tf",
                "mean_length_norm_tf",
                "var_length_norm_tf",
            ],
            FeatureFamily::InverseDocumentFrequency => &[
                "idf_sum",
                "sum_tfidf",
                "min_tfidf",
                "max_tfidf",
                "mean_tfidf",
                "var_tfidf",
            ],
            FeatureFamily::TermOverlap => &["term_overlap", "covered_query_term_number"],
            FeatureFamily::SynonymOverlap => &["synonym_overlap"],
            FeatureFamily::LanguageModel => &["lms_abs", "lms_dir", "lms_jm"],
            FeatureFamily::QueryLikelihood => &["query_likelihood"],
            FeatureFamily::Simple => &["passage_length", "exact_match"],
        }
    }
}

impl fmt::Display for FeatureFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureFamily::TermFrequency => "term_frequency",
            FeatureFamily::InverseDocumentFrequency => "inverse_document_frequency",
            FeatureFamily::TermOverlap => "term_overlap",
            FeatureFamily::SynonymOverlap => "synonym_overlap",
            FeatureFamily::LanguageModel => "language_model",
            FeatureFamily::QueryLikelihood => "query_likelihood",
            FeatureFamily::Simple => "simple",
        };
        f.write_str(name)
    }
}

/// Computes the features of one family for an analyzed pair.
///
/// An extractor writes exactly the names returned by
/// [`FeatureFamily::feature_names`] for its family, for every pair.
pub trait FeatureExtractor: Send + Sync {
    /// The family this extractor implements.
    fn family(&self) -> FeatureFamily;

    /// Write this family's features for `pair` into `out`.
    fn extract(&self, pair: &AnalyzedPair, out: &mut FeatureVector) -> Result<()>;
}

/// Sum, extremes, mean and population variance of a sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Summary {
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub variance: f64,
}

impl Summary {
    /// Summarize `values`; an empty sample is all zeros.
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Summary::default();
        }

        let n = values.len() as f64;
        let sum: f64 = values.iter().sum();
        let mean = sum / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Summary {
            sum,
            min,
            max,
            mean,
            variance,
        }
    }

    /// Write the five statistics as `sum_<suffix>`, `min_<suffix>`, and so on.
    pub fn write_to(&self, out: &mut FeatureVector, suffix: &str) {
        out.insert(format!("sum_{suffix}"), self.sum);
        out.insert(format!("min_{suffix}"), self.min);
        out.insert(format!("max_{suffix}"), self.max);
        out.insert(format!("mean_{suffix}"), self.mean);
        out.insert(format!("var_{suffix}"), self.variance);
    }
}
