//! Feature vectors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named feature values of one (query, passage) pair.
///
/// Values iterate in ascending name order, so position `i` of
/// [`FeatureVector::values`] means the same feature for every vector produced
/// by one engine. That is what flat ranking-training formats such as
/// `label qid:N 1:v1 2:v2 ... #doc_id:D` need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    query_id: String,
    passage_id: String,
    values: BTreeMap<String, f64>,
}

impl FeatureVector {
    /// Create an empty vector for a pair.
    pub fn new<Q: Into<String>, P: Into<String>>(query_id: Q, passage_id: P) -> Self {
        FeatureVector {
            query_id: query_id.into(),
            passage_id: passage_id.into(),
            values: BTreeMap::new(),
        }
    }

    /// Set a feature value, replacing any previous one.
    pub fn insert<S: Into<String>>(&mut self, name: S, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Value of a feature.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    pub fn passage_id(&self) -> &str {
        &self.passage_id
    }

    /// Feature names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// `(name, value)` pairs in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Values in ascending name order.
    pub fn values(&self) -> Vec<f64> {
        self.values.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
