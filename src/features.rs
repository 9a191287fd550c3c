//! Feature extraction for (query, passage) pairs.
//!
//! A [`FeatureEngine`] owns a list of feature extractors, one per enabled
//! [`FeatureFamily`], and a [`TermStatsCache`](crate::stats::TermStatsCache)
//! shared by every extractor that needs collection statistics. Calling
//! [`FeatureEngine::compute`] runs each extractor over the analyzed pair and
//! collects the results in a name-sorted [`FeatureVector`].
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use rankfeat::features::{FeatureEngine, FeatureEngineConfig, Passage, Query};
//! use rankfeat::stats::InMemoryStatistics;
//!
//! let stats = InMemoryStatistics::new()
//!     .with_document_count("economics", 100)
//!     .with_collection_length("economics", "fulltext", 10_000)
//!     .with_term("economics", "title", "euro", 10, 12)
//!     .with_term("economics", "fulltext", "euro", 80, 150);
//!
//! let engine = FeatureEngine::builder(Arc::new(stats))
//!     .config(FeatureEngineConfig::default())
//!     .build()
//!     .unwrap();
//!
//! let vector = engine
//!     .compute(&Query::new("q1", "euro"), &Passage::new("d1", "The euro crisis"))
//!     .unwrap();
//!
//! assert_eq!(vector.get("exact_match"), Some(1.0));
//! assert_eq!(vector.get("passage_length"), Some(3.0));
//! ```

pub mod config;
pub mod engine;
pub mod family;
pub mod idf;
pub mod language_model;
pub mod overlap;
pub mod pair;
pub mod simple;
pub mod term_frequency;
pub mod vector;

pub use config::FeatureEngineConfig;
pub use engine::{FeatureEngine, FeatureEngineBuilder};
pub use family::{FeatureExtractor, FeatureFamily};
pub use pair::{AnalyzedPair, Passage, Query};
pub use vector::FeatureVector;
