//! Collection and term statistics.
//!
//! Statistics come from an external search service that this crate does not
//! talk to directly. [`TermStatisticsProvider`] is the interface such a
//! service adapter implements; [`TermStatsCache`] memoizes its answers for the
//! lifetime of one feature engine.

pub mod cache;
pub mod memory;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use cache::{CacheStats, TermStatsCache};
pub use memory::InMemoryStatistics;

/// Index and field that statistics are read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatisticsScope {
    /// Index name in the external service.
    pub index: String,
    /// Field name inside the index.
    pub field: String,
}

impl StatisticsScope {
    /// Create a new scope.
    pub fn new<I: Into<String>, F: Into<String>>(index: I, field: F) -> Self {
        StatisticsScope {
            index: index.into(),
            field: field.into(),
        }
    }
}

impl Default for StatisticsScope {
    fn default() -> Self {
        StatisticsScope::new("economics", "title")
    }
}

/// Source of collection-level and term-level statistics.
///
/// Unseen terms, fields or indices yield 0 rather than an error. An error is
/// reserved for a provider that cannot answer at all (after whatever retry
/// policy it applies itself) and must be reported as
/// [`RankfeatError::StatisticsUnavailable`](crate::error::RankfeatError::StatisticsUnavailable).
///
/// Implementations must tolerate repeated identical calls.
pub trait TermStatisticsProvider: Send + Sync {
    /// Total number of term occurrences in `field` of `index`.
    fn collection_length(&self, index: &str, field: &str) -> Result<u64>;

    /// Number of documents in `index`.
    fn document_count(&self, index: &str) -> Result<u64>;

    /// Number of documents whose `field` contains `term`.
    fn term_document_frequency(&self, term: &str, index: &str, field: &str) -> Result<u64>;

    /// Total number of occurrences of `term` in `field` across the collection.
    fn term_collection_frequency(&self, term: &str, index: &str, field: &str) -> Result<u64>;
}
