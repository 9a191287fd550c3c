//! Synonym lookup capability.
//!
//! The synonym-overlap features only need "give me the synonyms of this
//! term". [`SynonymLookup`] is that capability; [`SynonymDictionary`] is an
//! in-memory implementation built from synonym groups.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::error::Result;

/// Capability that expands a term into its synonyms.
pub trait SynonymLookup: Send + Sync {
    /// Synonyms of `term`. Unknown terms yield an empty set.
    fn lookup(&self, term: &str) -> BTreeSet<String>;
}

impl<L: SynonymLookup + ?Sized> SynonymLookup for Box<L> {
    fn lookup(&self, term: &str) -> BTreeSet<String> {
        (**self).lookup(term)
    }
}

/// Synonym dictionary backed by a hash map.
///
/// Every member of a group maps to every other member of the same group. A
/// term that appears in several groups collects the synonyms of all of them.
#[derive(Debug, Clone, Default)]
pub struct SynonymDictionary {
    synonyms: HashMap<String, BTreeSet<String>>,
}

impl SynonymDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dictionary from a JSON file.
    ///
    /// The file contains an array of synonym groups:
    ///
    /// ```json
    /// [
    ///   ["crisis", "recession", "depression"],
    ///   ["market", "marketplace"]
    /// ]
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a dictionary from a JSON array of synonym groups.
    pub fn from_json(json: &str) -> Result<Self> {
        let groups: Vec<Vec<String>> = serde_json::from_str(json)?;
        Ok(Self::from_synonym_groups(groups))
    }

    /// Build a dictionary from synonym groups. Terms are lower-cased.
    pub fn from_synonym_groups<I, G, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary = Self::new();
        for group in groups {
            let terms: Vec<String> = group
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect();
            dictionary.add_group(&terms);
        }
        dictionary
    }

    /// Add one group of mutually synonymous terms.
    pub fn add_group(&mut self, terms: &[String]) {
        for (i, term) in terms.iter().enumerate() {
            let entry = self.synonyms.entry(term.clone()).or_default();
            for (j, other) in terms.iter().enumerate() {
                if i != j && other != term {
                    entry.insert(other.clone());
                }
            }
        }
    }

    /// Number of terms with at least one entry.
    pub fn len(&self) -> usize {
        self.synonyms.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty()
    }
}

impl SynonymLookup for SynonymDictionary {
    fn lookup(&self, term: &str) -> BTreeSet<String> {
        self.synonyms
            .get(&term.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }
}
