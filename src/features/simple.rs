//! Passage length and exact match.

use crate::error::Result;
use crate::features::family::{FeatureExtractor, FeatureFamily};
use crate::features::pair::AnalyzedPair;
use crate::features::vector::FeatureVector;

#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleExtractor;

impl SimpleExtractor {
    pub fn new() -> Self {
        SimpleExtractor
    }
}

impl FeatureExtractor for SimpleExtractor {
    fn family(&self) -> FeatureFamily {
        FeatureFamily::Simple
    }

    fn extract(&self, pair: &AnalyzedPair, out: &mut FeatureVector) -> Result<()> {
        let exact = pair.passage_lower.contains(pair.query_lower.as_str());
        out.insert("passage_length", pair.passage_tokens.len() as f64);
        out.insert("exact_match", if exact { 1.0 } else { 0.0 });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(query: &str, passage: &str) -> FeatureVector {
        let mut out = FeatureVector::new("q", "p");
        SimpleExtractor::new()
            .extract(&AnalyzedPair::new(query, passage), &mut out)
            .unwrap();
        out
    }

    #[test]
    fn test_exact_match_ignores_case() {
        let out = extract("Euro Crisis", "the EURO crisis deepens");
        assert_eq!(out.get("exact_match"), Some(1.0));
        assert_eq!(out.get("passage_length"), Some(4.0));
    }

    #[test]
    fn test_no_exact_match() {
        let out = extract("crisis euro", "the euro crisis");
        assert_eq!(out.get("exact_match"), Some(0.0));
    }

    #[test]
    fn test_empty_passage() {
        let out = extract("euro", "");
        assert_eq!(out.get("passage_length"), Some(0.0));
        assert_eq!(out.get("exact_match"), Some(0.0));
    }
}
