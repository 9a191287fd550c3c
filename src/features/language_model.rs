//! Smoothed language model scores.
//!
//! Scores are sums over raw query tokens (duplicates kept) of log-smoothed
//! passage probabilities, with collection frequencies and the collection
//! length read from one [`StatisticsScope`]. A query token unseen in the
//! collection contributes nothing, and neither does any token when the
//! collection length is 0.

use std::sync::Arc;

use ahash::AHashMap;

use crate::error::Result;
use crate::features::family::{FeatureExtractor, FeatureFamily};
use crate::features::pair::AnalyzedPair;
use crate::features::vector::FeatureVector;
use crate::stats::{StatisticsScope, TermStatsCache};

/// Per-token quantities shared by every smoothing method.
#[derive(Debug, Clone, Copy)]
struct TokenStatistics<'a> {
    term: &'a str,
    /// Occurrences in the passage.
    tf: f64,
    /// `cf / C`.
    collection_probability: f64,
}

/// Collect statistics for every query token with cf > 0, in query order.
fn token_statistics<'a>(
    cache: &TermStatsCache,
    scope: &StatisticsScope,
    pair: &'a AnalyzedPair,
) -> Result<Vec<TokenStatistics<'a>>> {
    let collection_length = cache.collection_length(scope)?;
    if collection_length == 0 {
        return Ok(Vec::new());
    }

    let mut tokens = Vec::with_capacity(pair.query_tokens.len());
    for term in &pair.query_tokens {
        let cf = cache.collection_frequency(term, scope)?;
        if cf == 0 {
            continue;
        }
        tokens.push(TokenStatistics {
            term,
            tf: pair.passage_term_count(term) as f64,
            collection_probability: cf as f64 / collection_length as f64,
        });
    }
    Ok(tokens)
}

/// Absolute discounting, Dirichlet and Jelinek-Mercer scores.
pub struct LanguageModelExtractor {
    cache: Arc<TermStatsCache>,
    scope: StatisticsScope,
    delta: f64,
    mu: f64,
    alpha: f64,
}

impl std::fmt::Debug for LanguageModelExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageModelExtractor")
            .field("scope", &self.scope)
            .field("delta", &self.delta)
            .field("mu", &self.mu)
            .field("alpha", &self.alpha)
            .finish()
    }
}

impl LanguageModelExtractor {
    pub fn new(
        cache: Arc<TermStatsCache>,
        scope: StatisticsScope,
        delta: f64,
        mu: f64,
        alpha: f64,
    ) -> Self {
        LanguageModelExtractor {
            cache,
            scope,
            delta,
            mu,
            alpha,
        }
    }
}

impl FeatureExtractor for LanguageModelExtractor {
    fn family(&self) -> FeatureFamily {
        FeatureFamily::LanguageModel
    }

    fn extract(&self, pair: &AnalyzedPair, out: &mut FeatureVector) -> Result<()> {
        let (mut abs, mut dir, mut jm) = (0.0, 0.0, 0.0);

        if !pair.passage_tokens.is_empty() && !pair.query_tokens.is_empty() {
            let length = pair.passage_tokens.len() as f64;
            let unique = pair.passage_unique_terms() as f64;

            for token in token_statistics(&self.cache, &self.scope, pair)? {
                let p = token.collection_probability;
                abs += (1.0
                    + (token.tf - self.delta).max(0.0) / length
                    + self.delta * unique / length * p)
                    .ln();
                dir += (1.0 + (token.tf + self.mu * p) / (length + self.mu)).ln();
                jm += (1.0 + (1.0 - self.alpha) * token.tf / length + self.alpha * p).ln();
            }
        }

        out.insert("lms_abs", abs);
        out.insert("lms_dir", dir);
        out.insert("lms_jm", jm);
        Ok(())
    }
}

/// Dirichlet-smoothed query likelihood, weighted by query term frequency.
pub struct QueryLikelihoodExtractor {
    cache: Arc<TermStatsCache>,
    scope: StatisticsScope,
    mu: f64,
}

impl std::fmt::Debug for QueryLikelihoodExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryLikelihoodExtractor")
            .field("scope", &self.scope)
            .field("mu", &self.mu)
            .finish()
    }
}

impl QueryLikelihoodExtractor {
    pub fn new(cache: Arc<TermStatsCache>, scope: StatisticsScope, mu: f64) -> Self {
        QueryLikelihoodExtractor { cache, scope, mu }
    }
}

impl FeatureExtractor for QueryLikelihoodExtractor {
    fn family(&self) -> FeatureFamily {
        FeatureFamily::QueryLikelihood
    }

    fn extract(&self, pair: &AnalyzedPair, out: &mut FeatureVector) -> Result<()> {
        let mut score = 0.0;

        if !pair.passage_tokens.is_empty() && !pair.query_tokens.is_empty() {
            let mut query_counts: AHashMap<&str, usize> = AHashMap::new();
            for token in &pair.query_tokens {
                *query_counts.entry(token.as_str()).or_insert(0) += 1;
            }

            let length = pair.passage_tokens.len() as f64;
            for token in token_statistics(&self.cache, &self.scope, pair)? {
                let qtf = query_counts.get(token.term).copied().unwrap_or(0) as f64;
                score += qtf
                    * ((token.tf + self.mu * token.collection_probability) / (length + self.mu))
                        .ln();
            }
        }

        out.insert("query_likelihood", score);
        Ok(())
    }
}
