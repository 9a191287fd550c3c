//! In-memory statistics provider.

use std::collections::HashMap;

use crate::error::Result;
use crate::stats::TermStatisticsProvider;

#[derive(Debug, Clone, Default)]
struct FieldStatistics {
    collection_length: u64,
    document_frequency: HashMap<String, u64>,
    collection_frequency: HashMap<String, u64>,
}

/// Statistics held in memory, keyed by index and field.
///
/// Useful for offline runs where the statistics were exported beforehand, and
/// for tests.
///
/// # Examples
///
/// ```
/// use rankfeat::stats::{InMemoryStatistics, TermStatisticsProvider};
///
/// let stats = InMemoryStatistics::new()
///     .with_document_count("economics", 1000)
///     .with_collection_length("economics", "title", 5000)
///     .with_term("economics", "title", "crisis", 40, 55);
///
/// assert_eq!(stats.term_document_frequency("crisis", "economics", "title").unwrap(), 40);
/// assert_eq!(stats.term_collection_frequency("unseen", "economics", "title").unwrap(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStatistics {
    document_counts: HashMap<String, u64>,
    fields: HashMap<(String, String), FieldStatistics>,
}

impl InMemoryStatistics {
    /// Create an empty provider; every statistic is 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document count of `index`.
    pub fn with_document_count(mut self, index: &str, count: u64) -> Self {
        self.document_counts.insert(index.to_string(), count);
        self
    }

    /// Set the collection length of `field` in `index`.
    pub fn with_collection_length(mut self, index: &str, field: &str, length: u64) -> Self {
        self.field_mut(index, field).collection_length = length;
        self
    }

    /// Set document and collection frequency of `term`.
    pub fn with_term(
        mut self,
        index: &str,
        field: &str,
        term: &str,
        document_frequency: u64,
        collection_frequency: u64,
    ) -> Self {
        let stats = self.field_mut(index, field);
        stats
            .document_frequency
            .insert(term.to_string(), document_frequency);
        stats
            .collection_frequency
            .insert(term.to_string(), collection_frequency);
        self
    }

    fn field_mut(&mut self, index: &str, field: &str) -> &mut FieldStatistics {
        self.fields
            .entry((index.to_string(), field.to_string()))
            .or_default()
    }

    fn field(&self, index: &str, field: &str) -> Option<&FieldStatistics> {
        self.fields.get(&(index.to_string(), field.to_string()))
    }
}

impl TermStatisticsProvider for InMemoryStatistics {
    fn collection_length(&self, index: &str, field: &str) -> Result<u64> {
        Ok(self
            .field(index, field)
            .map(|f| f.collection_length)
            .unwrap_or(0))
    }

    fn document_count(&self, index: &str) -> Result<u64> {
        Ok(self.document_counts.get(index).copied().unwrap_or(0))
    }

    fn term_document_frequency(&self, term: &str, index: &str, field: &str) -> Result<u64> {
        Ok(self
            .field(index, field)
            .and_then(|f| f.document_frequency.get(term).copied())
            .unwrap_or(0))
    }

    fn term_collection_frequency(&self, term: &str, index: &str, field: &str) -> Result<u64> {
        Ok(self
            .field(index, field)
            .and_then(|f| f.collection_frequency.get(term).copied())
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_everything_is_zero() {
        let stats = InMemoryStatistics::new();
        assert_eq!(stats.document_count("nope").unwrap(), 0);
        assert_eq!(stats.collection_length("nope", "title").unwrap(), 0);
        assert_eq!(
            stats.term_document_frequency("x", "nope", "title").unwrap(),
            0
        );
    }

    #[test]
    fn test_fields_are_separate() {
        let stats = InMemoryStatistics::new()
            .with_term("economics", "title", "euro", 3, 4)
            .with_term("economics", "fulltext", "euro", 30, 90);

        assert_eq!(
            stats
                .term_collection_frequency("euro", "economics", "title")
                .unwrap(),
            4
        );
        assert_eq!(
            stats
                .term_collection_frequency("euro", "economics", "fulltext")
                .unwrap(),
            90
        );
    }
}
