//! Memoizing wrapper around a [`TermStatisticsProvider`].

use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::stats::{StatisticsScope, TermStatisticsProvider};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TermKey {
    index: String,
    field: String,
    term: String,
}

impl TermKey {
    fn new(term: &str, scope: &StatisticsScope) -> Self {
        TermKey {
            index: scope.index.clone(),
            field: scope.field.clone(),
            term: term.to_string(),
        }
    }
}

/// Hit/miss counters of a [`TermStatsCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups forwarded to the provider.
    pub misses: u64,
    /// Entries currently cached, across all statistic kinds.
    pub entries: usize,
}

/// Cache of provider answers, owned by one feature engine.
///
/// Lookups take a shared read lock and never wait on each other. Two threads
/// missing the same key at the same time both ask the provider and the later
/// answer overwrites the earlier one. Provider errors are passed through and
/// never cached, so a later call retries the lookup.
pub struct TermStatsCache {
    provider: Arc<dyn TermStatisticsProvider>,
    collection_frequencies: RwLock<AHashMap<TermKey, u64>>,
    document_frequencies: RwLock<AHashMap<TermKey, u64>>,
    collection_lengths: RwLock<AHashMap<StatisticsScope, u64>>,
    document_counts: RwLock<AHashMap<String, u64>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for TermStatsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermStatsCache")
            .field("provider", &"<dyn TermStatisticsProvider>")
            .field("stats", &self.stats())
            .finish()
    }
}

impl TermStatsCache {
    /// Create an empty cache in front of `provider`.
    pub fn new(provider: Arc<dyn TermStatisticsProvider>) -> Self {
        TermStatsCache {
            provider,
            collection_frequencies: RwLock::new(AHashMap::new()),
            document_frequencies: RwLock::new(AHashMap::new()),
            collection_lengths: RwLock::new(AHashMap::new()),
            document_counts: RwLock::new(AHashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Collection frequency of `term` in `scope`.
    pub fn collection_frequency(&self, term: &str, scope: &StatisticsScope) -> Result<u64> {
        self.get_or_fetch(&self.collection_frequencies, TermKey::new(term, scope), || {
            debug!(term, index = %scope.index, field = %scope.field, "fetching collection frequency");
            self.provider
                .term_collection_frequency(term, &scope.index, &scope.field)
        })
    }

    /// Document frequency of `term` in `scope`.
    pub fn document_frequency(&self, term: &str, scope: &StatisticsScope) -> Result<u64> {
        self.get_or_fetch(&self.document_frequencies, TermKey::new(term, scope), || {
            debug!(term, index = %scope.index, field = %scope.field, "fetching document frequency");
            self.provider
                .term_document_frequency(term, &scope.index, &scope.field)
        })
    }

    /// Total term occurrences in `scope`.
    pub fn collection_length(&self, scope: &StatisticsScope) -> Result<u64> {
        self.get_or_fetch(&self.collection_lengths, scope.clone(), || {
            debug!(index = %scope.index, field = %scope.field, "fetching collection length");
            self.provider.collection_length(&scope.index, &scope.field)
        })
    }

    /// Number of documents in `index`.
    pub fn document_count(&self, index: &str) -> Result<u64> {
        self.get_or_fetch(&self.document_counts, index.to_string(), || {
            debug!(index, "fetching document count");
            self.provider.document_count(index)
        })
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.collection_frequencies.read().len()
                + self.document_frequencies.read().len()
                + self.collection_lengths.read().len()
                + self.document_counts.read().len(),
        }
    }

    /// Drop every cached entry and reset the counters.
    pub fn clear(&self) {
        self.collection_frequencies.write().clear();
        self.document_frequencies.write().clear();
        self.collection_lengths.write().clear();
        self.document_counts.write().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    fn get_or_fetch<K, F>(&self, map: &RwLock<AHashMap<K, u64>>, key: K, fetch: F) -> Result<u64>
    where
        K: Eq + Hash,
        F: FnOnce() -> Result<u64>,
    {
        let cached = map.read().get(&key).copied();
        if let Some(value) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = fetch()?;
        map.write().insert(key, value);
        Ok(value)
    }
}
