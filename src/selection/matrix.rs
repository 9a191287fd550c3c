//! Labeled feature matrices.

use serde::{Deserialize, Serialize};

use crate::error::{RankfeatError, Result};
use crate::evaluation::GoldStandard;
use crate::features::FeatureVector;

/// One labeled (query, document) example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub query_id: String,
    pub doc_id: String,
    /// Gold relevance of the document for the query.
    pub label: f64,
    /// Feature values, aligned with the matrix's feature names.
    pub values: Vec<f64>,
}

impl FeatureRow {
    pub fn new<Q: Into<String>, D: Into<String>>(
        query_id: Q,
        doc_id: D,
        label: f64,
        values: Vec<f64>,
    ) -> Self {
        FeatureRow {
            query_id: query_id.into(),
            doc_id: doc_id.into(),
            label,
            values,
        }
    }
}

/// Named feature columns plus labeled rows.
///
/// Every row has exactly one value per column; deserialization re-checks this.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFeatureMatrix")]
pub struct FeatureMatrix {
    names: Vec<String>,
    rows: Vec<FeatureRow>,
}

/// Unchecked serialized form of a [`FeatureMatrix`].
#[derive(Deserialize)]
struct RawFeatureMatrix {
    names: Vec<String>,
    rows: Vec<FeatureRow>,
}

impl TryFrom<RawFeatureMatrix> for FeatureMatrix {
    type Error = RankfeatError;

    fn try_from(raw: RawFeatureMatrix) -> Result<Self> {
        let mut matrix = FeatureMatrix::new(raw.names);
        matrix.rows.reserve(raw.rows.len());
        for row in raw.rows {
            matrix.push_row(row)?;
        }
        Ok(matrix)
    }
}

impl FeatureMatrix {
    /// Create an empty matrix with the given columns.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FeatureMatrix {
            names: names.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Its width must match the number of columns.
    pub fn push_row(&mut self, row: FeatureRow) -> Result<()> {
        if row.values.len() != self.names.len() {
            return Err(RankfeatError::invalid_argument(format!(
                "row ({}, {}) has {} values, expected {}",
                row.query_id,
                row.doc_id,
                row.values.len(),
                self.names.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Build a matrix from feature vectors, labeled from `gold`.
    ///
    /// Columns are the (sorted) feature names of the first vector; every
    /// vector must carry exactly the same names. Pairs without a judgment get
    /// label 0.
    pub fn from_vectors(vectors: &[FeatureVector], gold: &GoldStandard) -> Result<Self> {
        let Some(first) = vectors.first() else {
            return Ok(FeatureMatrix::default());
        };

        let mut matrix = FeatureMatrix::new(first.names());
        for vector in vectors {
            if !vector.names().eq(matrix.names.iter().map(String::as_str)) {
                return Err(RankfeatError::invalid_argument(format!(
                    "feature vector ({}, {}) does not have the same feature names as the first vector",
                    vector.query_id(),
                    vector.passage_id()
                )));
            }

            let label = gold
                .get(vector.query_id())
                .and_then(|judgments| judgments.get(vector.passage_id()))
                .copied()
                .unwrap_or(0.0);
            matrix.rows.push(FeatureRow::new(
                vector.query_id(),
                vector.passage_id(),
                label,
                vector.values(),
            ));
        }
        Ok(matrix)
    }

    /// Feature names, one per column.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// Number of feature columns.
    pub fn n_features(&self) -> usize {
        self.names.len()
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of column `index`, in row order.
    pub fn column(&self, index: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row.values[index]).collect()
    }

    /// Labels in row order.
    pub fn labels(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.label).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vector(query: &str, passage: &str, values: &[(&str, f64)]) -> FeatureVector {
        let mut vector = FeatureVector::new(query, passage);
        for (name, value) in values {
            vector.insert(*name, *value);
        }
        vector
    }

    #[test]
    fn test_push_row_checks_width() {
        let mut matrix = FeatureMatrix::new(["a", "b"]);
        assert!(matrix.push_row(FeatureRow::new("q", "d1", 1.0, vec![0.1, 0.2])).is_ok());

        let err = matrix
            .push_row(FeatureRow::new("q", "d2", 0.0, vec![0.1]))
            .unwrap_err();
        assert!(matches!(err, RankfeatError::InvalidArgument(_)));
        assert_eq!(matrix.n_rows(), 1);
    }

    #[test]
    fn test_deserialize_checks_width() {
        let json = r#"{
            "names": ["a", "b"],
            "rows": [
                {"query_id": "q", "doc_id": "d1", "label": 1.0, "values": [0.1, 0.2]},
                {"query_id": "q", "doc_id": "d2", "label": 0.0, "values": [0.3]}
            ]
        }"#;
        let err = serde_json::from_str::<FeatureMatrix>(json).unwrap_err();
        assert!(err.to_string().contains("expected 2"));

        let mut matrix = FeatureMatrix::new(["a", "b"]);
        matrix
            .push_row(FeatureRow::new("q", "d1", 1.0, vec![0.1, 0.2]))
            .unwrap();
        let json = serde_json::to_string(&matrix).unwrap();
        assert_eq!(serde_json::from_str::<FeatureMatrix>(&json).unwrap(), matrix);
    }

    #[test]
    fn test_from_vectors_labels_from_gold() {
        let gold: GoldStandard = HashMap::from([(
            "q1".to_string(),
            HashMap::from([("d1".to_string(), 2.0)]),
        )]);
        let vectors = vec![
            vector("q1", "d1", &[("b", 1.0), ("a", 2.0)]),
            vector("q1", "d2", &[("a", 3.0), ("b", 4.0)]),
        ];

        let matrix = FeatureMatrix::from_vectors(&vectors, &gold).unwrap();
        assert_eq!(matrix.names(), &["a".to_string(), "b".to_string()]);
        assert_eq!(matrix.labels(), vec![2.0, 0.0]);
        assert_eq!(matrix.column(0), vec![2.0, 3.0]);
        assert_eq!(matrix.column(1), vec![1.0, 4.0]);
    }

    #[test]
    fn test_from_vectors_rejects_mismatched_names() {
        let vectors = vec![
            vector("q1", "d1", &[("a", 1.0)]),
            vector("q1", "d2", &[("a", 1.0), ("b", 1.0)]),
        ];
        let err = FeatureMatrix::from_vectors(&vectors, &GoldStandard::new()).unwrap_err();
        assert!(matches!(err, RankfeatError::InvalidArgument(_)));
    }

    #[test]
    fn test_from_no_vectors() {
        let matrix = FeatureMatrix::from_vectors(&[], &GoldStandard::new()).unwrap();
        assert!(matrix.is_empty());
        assert_eq!(matrix.n_features(), 0);
    }
}
