//! Queries, passages and their analyzed form.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::{Stemmer, StopWords, tokenize};

/// A query: identifier plus raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub id: String,
    pub text: String,
}

impl Query {
    pub fn new<I: Into<String>, T: Into<String>>(id: I, text: T) -> Self {
        Query {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A passage scored against a query: identifier plus raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub id: String,
    pub text: String,
}

impl Passage {
    pub fn new<I: Into<String>, T: Into<String>>(id: I, text: T) -> Self {
        Passage {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Stopword-filtered, stemmed tokens of a pair.
#[derive(Debug, Clone, Default)]
pub struct StemmedTokens {
    pub query: Vec<String>,
    pub passage: Vec<String>,
}

/// A (query, passage) pair tokenized once and shared by every extractor.
#[derive(Debug)]
pub struct AnalyzedPair {
    /// Lower-cased query text.
    pub query_lower: String,
    /// Lower-cased passage text.
    pub passage_lower: String,
    /// Query tokens in order, duplicates kept.
    pub query_tokens: Vec<String>,
    /// Passage tokens in order.
    pub passage_tokens: Vec<String>,
    passage_counts: AHashMap<String, usize>,
}

impl AnalyzedPair {
    pub fn new(query: &str, passage: &str) -> Self {
        let query_tokens = tokenize(query);
        let passage_tokens = tokenize(passage);

        let mut passage_counts = AHashMap::new();
        for token in &passage_tokens {
            *passage_counts.entry(token.clone()).or_insert(0) += 1;
        }

        AnalyzedPair {
            query_lower: query.to_lowercase(),
            passage_lower: passage.to_lowercase(),
            query_tokens,
            passage_tokens,
            passage_counts,
        }
    }

    /// Distinct query tokens in first-seen order.
    pub fn distinct_query_terms(&self) -> Vec<&str> {
        let mut seen = Vec::with_capacity(self.query_tokens.len());
        for token in &self.query_tokens {
            if !seen.contains(&token.as_str()) {
                seen.push(token.as_str());
            }
        }
        seen
    }

    /// How often `term` occurs among the passage tokens.
    pub fn passage_term_count(&self, term: &str) -> usize {
        self.passage_counts.get(term).copied().unwrap_or(0)
    }

    /// Number of distinct passage tokens.
    pub fn passage_unique_terms(&self) -> usize {
        self.passage_counts.len()
    }

    /// Stopword-filtered, stemmed and lower-cased tokens of both sides.
    ///
    /// Recomputed on every call, so extractors with different analyzers can
    /// share one pair.
    pub fn stems(&self, stop_words: &StopWords, stemmer: &dyn Stemmer) -> StemmedTokens {
        let stem_all = |text: &str| -> Vec<String> {
            stop_words
                .remove(text)
                .iter()
                .map(|token| stemmer.stem(token).to_lowercase())
                .collect()
        };
        StemmedTokens {
            query: stem_all(&self.query_lower),
            passage: stem_all(&self.passage_lower),
        }
    }
}
