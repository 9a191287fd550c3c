//! # rankfeat
//!
//! Learning-to-rank tooling for offline information retrieval experiments.
//!
//! ## Features
//!
//! - Ranking features for (query, passage) pairs: term frequency statistics,
//!   idf and tf-idf aggregates, stemmed and synonym overlap, smoothed
//!   language model scores
//! - Collection statistics read through a pluggable provider and cached per
//!   engine
//! - Rank quality metrics: precision, NDCG against returned or gold
//!   documents, mean prefix precision
//! - Correlation-based feature subset selection, exhaustive or greedy

pub mod analysis;
pub mod error;
pub mod evaluation;
pub mod features;
pub mod selection;
pub mod stats;

pub mod prelude {
    pub use crate::analysis::{
        IdentityStemmer, PorterStemmer, Stemmer, StopWords, SynonymDictionary, SynonymLookup,
    };
    pub use crate::error::{RankfeatError, Result};
    pub use crate::evaluation::{
        EvaluationConfig, EvaluationReport, GoldStandard, Judgments, Metric, RankEvaluator,
        RankedList,
    };
    pub use crate::features::{
        FeatureEngine, FeatureEngineConfig, FeatureFamily, FeatureVector, Passage, Query,
    };
    pub use crate::selection::{
        CancellationToken, FeatureMatrix, FeatureRow, FeatureSelector, SearchStrategy,
        SelectionConfig, SelectionReport,
    };
    pub use crate::stats::{InMemoryStatistics, StatisticsScope, TermStatisticsProvider};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
