//! The feature engine.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::analysis::{PorterStemmer, Stemmer, StopWords, SynonymDictionary, SynonymLookup};
use crate::error::Result;
use crate::features::config::FeatureEngineConfig;
use crate::features::family::{FeatureExtractor, FeatureFamily};
use crate::features::idf::InverseDocumentFrequencyExtractor;
use crate::features::language_model::{LanguageModelExtractor, QueryLikelihoodExtractor};
use crate::features::overlap::{SynonymOverlapExtractor, TermOverlapExtractor};
use crate::features::pair::{AnalyzedPair, Passage, Query};
use crate::features::simple::SimpleExtractor;
use crate::features::term_frequency::TermFrequencyExtractor;
use crate::features::vector::FeatureVector;
use crate::stats::{CacheStats, TermStatisticsProvider, TermStatsCache};

/// Computes feature vectors for (query, passage) pairs.
///
/// The engine is `Send + Sync`; [`compute`](FeatureEngine::compute) may be
/// called from many threads at once. The only state shared between calls is
/// the statistics cache.
pub struct FeatureEngine {
    config: FeatureEngineConfig,
    cache: Arc<TermStatsCache>,
    extractors: Vec<Box<dyn FeatureExtractor>>,
    feature_names: Vec<&'static str>,
}

impl std::fmt::Debug for FeatureEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureEngine")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .field("feature_names", &self.feature_names)
            .finish()
    }
}

impl FeatureEngine {
    /// Start building an engine on top of a statistics provider.
    pub fn builder(provider: Arc<dyn TermStatisticsProvider>) -> FeatureEngineBuilder {
        FeatureEngineBuilder::new(provider)
    }

    /// Build an engine with the default English stop words, the Porter
    /// stemmer and no synonyms.
    pub fn new(
        config: FeatureEngineConfig,
        provider: Arc<dyn TermStatisticsProvider>,
    ) -> Result<Self> {
        Self::builder(provider).config(config).build()
    }

    /// Compute every enabled feature for one pair.
    ///
    /// Fails only when the statistics provider does.
    pub fn compute(&self, query: &Query, passage: &Passage) -> Result<FeatureVector> {
        let pair = AnalyzedPair::new(&query.text, &passage.text);
        let mut vector = FeatureVector::new(query.id.as_str(), passage.id.as_str());
        for extractor in &self.extractors {
            extractor.extract(&pair, &mut vector)?;
        }
        Ok(vector)
    }

    /// Compute many pairs in parallel. Output order follows input order.
    pub fn compute_batch(&self, pairs: &[(Query, Passage)]) -> Result<Vec<FeatureVector>> {
        let vectors = pairs
            .par_iter()
            .map(|(query, passage)| self.compute(query, passage))
            .collect::<Result<Vec<_>>>()?;

        let stats = self.cache.stats();
        info!(
            pairs = vectors.len(),
            cache_hits = stats.hits,
            cache_misses = stats.misses,
            "computed feature batch"
        );
        Ok(vectors)
    }

    /// Names of every feature this engine produces, ascending.
    pub fn feature_names(&self) -> &[&'static str] {
        &self.feature_names
    }

    /// Enabled families, in execution order.
    pub fn families(&self) -> Vec<FeatureFamily> {
        self.extractors.iter().map(|e| e.family()).collect()
    }

    pub fn config(&self) -> &FeatureEngineConfig {
        &self.config
    }

    /// Counters of the statistics cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

/// Builder for [`FeatureEngine`].
///
/// Stop words, stemmer and synonym lookup default to English stop words, the
/// Porter stemmer and an empty dictionary.
pub struct FeatureEngineBuilder {
    provider: Arc<dyn TermStatisticsProvider>,
    config: FeatureEngineConfig,
    stop_words: StopWords,
    stemmer: Box<dyn Stemmer>,
    synonyms: Box<dyn SynonymLookup>,
}

impl FeatureEngineBuilder {
    pub fn new(provider: Arc<dyn TermStatisticsProvider>) -> Self {
        FeatureEngineBuilder {
            provider,
            config: FeatureEngineConfig::default(),
            stop_words: StopWords::english(),
            stemmer: Box::new(PorterStemmer::new()),
            synonyms: Box::new(SynonymDictionary::new()),
        }
    }

    pub fn config(mut self, config: FeatureEngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    pub fn stemmer(mut self, stemmer: Box<dyn Stemmer>) -> Self {
        self.stemmer = stemmer;
        self
    }

    pub fn synonyms(mut self, synonyms: Box<dyn SynonymLookup>) -> Self {
        self.synonyms = synonyms;
        self
    }

    /// Validate the configuration and build the extractor list.
    pub fn build(self) -> Result<FeatureEngine> {
        self.config.validate()?;

        let config = self.config;
        let cache = Arc::new(TermStatsCache::new(self.provider));
        let stemmer: Arc<dyn Stemmer> = Arc::from(self.stemmer);
        let synonyms: Arc<dyn SynonymLookup> = Arc::from(self.synonyms);

        let extractors: Vec<Box<dyn FeatureExtractor>> = config
            .families
            .iter()
            .map(|family| -> Box<dyn FeatureExtractor> {
                match family {
                    FeatureFamily::TermFrequency => Box::new(TermFrequencyExtractor::new()),
                    FeatureFamily::InverseDocumentFrequency => {
                        Box::new(InverseDocumentFrequencyExtractor::new(
                            cache.clone(),
                            config.idf_scope.clone(),
                            config.document_count,
                        ))
                    }
                    FeatureFamily::TermOverlap => Box::new(TermOverlapExtractor::new(
                        self.stop_words.clone(),
                        stemmer.clone(),
                    )),
                    FeatureFamily::SynonymOverlap => Box::new(SynonymOverlapExtractor::new(
                        self.stop_words.clone(),
                        stemmer.clone(),
                        synonyms.clone(),
                    )),
                    FeatureFamily::LanguageModel => Box::new(LanguageModelExtractor::new(
                        cache.clone(),
                        config.language_model_scope.clone(),
                        config.delta,
                        config.mu,
                        config.alpha,
                    )),
                    FeatureFamily::QueryLikelihood => Box::new(QueryLikelihoodExtractor::new(
                        cache.clone(),
                        config.language_model_scope.clone(),
                        config.query_likelihood_mu,
                    )),
                    FeatureFamily::Simple => Box::new(SimpleExtractor::new()),
                }
            })
            .collect();

        let mut feature_names: Vec<&'static str> = config
            .families
            .iter()
            .flat_map(|family| family.feature_names().iter().copied())
            .collect();
        feature_names.sort_unstable();

        debug!(
            families = ?config.families,
            features = feature_names.len(),
            stemmer = stemmer.name(),
            "built feature engine"
        );

        Ok(FeatureEngine {
            config,
            cache,
            extractors,
            feature_names,
        })
    }
}
