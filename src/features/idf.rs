//! idf and tf-idf statistics.

use std::sync::Arc;

use crate::error::Result;
use crate::features::family::{FeatureExtractor, FeatureFamily, Summary};
use crate::features::pair::AnalyzedPair;
use crate::features::term_frequency::raw_term_counts;
use crate::features::vector::FeatureVector;
use crate::stats::{StatisticsScope, TermStatsCache};

/// Robertson-Sparck Jones idf: `log10((N - n + 0.5) / (n + 0.5))`.
///
/// Not clamped. A term found in more than half of the documents gets a
/// negative weight.
pub fn idf(document_count: u64, document_frequency: u64) -> f64 {
    let n = document_count as f64;
    let df = document_frequency as f64;
    ((n - df + 0.5) / (df + 0.5)).log10()
}

/// `idf_sum` over distinct query terms plus statistics of their tf-idf,
/// where tf is normalized by the largest count in the pair.
pub struct InverseDocumentFrequencyExtractor {
    cache: Arc<TermStatsCache>,
    scope: StatisticsScope,
    document_count: Option<u64>,
}

impl std::fmt::Debug for InverseDocumentFrequencyExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InverseDocumentFrequencyExtractor")
            .field("scope", &self.scope)
            .field("document_count", &self.document_count)
            .finish()
    }
}

impl InverseDocumentFrequencyExtractor {
    /// `document_count` overrides N; otherwise N is read for `scope.index`.
    pub fn new(
        cache: Arc<TermStatsCache>,
        scope: StatisticsScope,
        document_count: Option<u64>,
    ) -> Self {
        InverseDocumentFrequencyExtractor {
            cache,
            scope,
            document_count,
        }
    }

    fn document_count(&self) -> Result<u64> {
        match self.document_count {
            Some(count) => Ok(count),
            None => self.cache.document_count(&self.scope.index),
        }
    }
}

impl FeatureExtractor for InverseDocumentFrequencyExtractor {
    fn family(&self) -> FeatureFamily {
        FeatureFamily::InverseDocumentFrequency
    }

    fn extract(&self, pair: &AnalyzedPair, out: &mut FeatureVector) -> Result<()> {
        let terms = pair.distinct_query_terms();
        if terms.is_empty() {
            out.insert("idf_sum", 0.0);
            Summary::default().write_to(out, "tfidf");
            return Ok(());
        }

        let n = self.document_count()?;
        let weights = terms
            .iter()
            .map(|term| Ok(idf(n, self.cache.document_frequency(term, &self.scope)?)))
            .collect::<Result<Vec<f64>>>()?;

        let raw = raw_term_counts(pair);
        let max = raw.iter().copied().fold(0.0, f64::max);
        let tfidf: Vec<f64> = raw
            .iter()
            .zip(&weights)
            .map(|(count, weight)| {
                let tf = if max > 0.0 { count / max } else { 0.0 };
                tf * weight
            })
            .collect();

        out.insert("idf_sum", weights.iter().sum());
        Summary::of(&tfidf).write_to(out, "tfidf");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::stats::InMemoryStatistics;

    fn extractor(stats: InMemoryStatistics, document_count: Option<u64>) -> InverseDocumentFrequencyExtractor {
        InverseDocumentFrequencyExtractor::new(
            Arc::new(TermStatsCache::new(Arc::new(stats))),
            StatisticsScope::new("economics", "title"),
            document_count,
        )
    }

    #[test]
    fn test_idf_formula() {
        assert!((idf(1000, 10) - (990.5f64 / 10.5).log10()).abs() < 1e-12);
        assert!(idf(10, 9) < 0.0);
    }

    #[test]
    fn test_tfidf_statistics() {
        let stats = InMemoryStatistics::new()
            .with_document_count("economics", 1000)
            .with_term("economics", "title", "euro", 10, 20)
            .with_term("economics", "title", "crisis", 100, 200);
        let mut out = FeatureVector::new("q", "p");
        extractor(stats, None)
            .extract(
                &AnalyzedPair::new("euro crisis", "euro euro crisis"),
                &mut out,
            )
            .unwrap();

        let idf_euro = idf(1000, 10);
        let idf_crisis = idf(1000, 100);
        assert!((out.get("idf_sum").unwrap() - (idf_euro + idf_crisis)).abs() < 1e-12);
        assert!((out.get("max_tfidf").unwrap() - idf_euro).abs() < 1e-12);
        assert!((out.get("min_tfidf").unwrap() - idf_crisis * 0.5).abs() < 1e-12);

        let min = out.get("min_tfidf").unwrap();
        let mean = out.get("mean_tfidf").unwrap();
        let max = out.get("max_tfidf").unwrap();
        assert!(min <= mean && mean <= max);
    }

    #[test]
    fn test_no_matches_gives_zero_tfidf_not_nan() {
        let stats = InMemoryStatistics::new().with_term("economics", "title", "euro", 10, 20);
        let mut out = FeatureVector::new("q", "p");
        extractor(stats, Some(500))
            .extract(&AnalyzedPair::new("euro", "nothing here"), &mut out)
            .unwrap();

        assert_eq!(out.get("sum_tfidf"), Some(0.0));
        assert_eq!(out.get("var_tfidf"), Some(0.0));
        assert!((out.get("idf_sum").unwrap() - idf(500, 10)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_query_skips_statistics() {
        let mut out = FeatureVector::new("q", "p");
        let extractor = extractor(InMemoryStatistics::new(), None);
        extractor
            .extract(&AnalyzedPair::new("", "some passage"), &mut out)
            .unwrap();

        assert_eq!(out.len(), 6);
        assert!(out.values().iter().all(|v| *v == 0.0));
        assert_eq!(extractor.cache.stats().misses, 0);
    }
}
