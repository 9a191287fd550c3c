//! Stemmed term overlap, with and without synonym expansion.
//!
//! Both ratios count (query form, passage stem) pairs where the query form is
//! a substring of the passage stem. A short query stem can match several
//! passage stems, so the ratios are not bounded by 1.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::analysis::{Stemmer, StopWords, SynonymLookup};
use crate::error::Result;
use crate::features::family::{FeatureExtractor, FeatureFamily};
use crate::features::pair::AnalyzedPair;
use crate::features::vector::FeatureVector;

fn substring_pairs<'a, I>(forms: I, passage: &[String]) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    forms
        .into_iter()
        .map(|form| passage.iter().filter(|stem| stem.contains(form)).count())
        .sum()
}

fn ratio(matches: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        matches as f64 / total as f64
    }
}

/// `term_overlap` and `covered_query_term_number`.
pub struct TermOverlapExtractor {
    stop_words: StopWords,
    stemmer: Arc<dyn Stemmer>,
}

impl std::fmt::Debug for TermOverlapExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermOverlapExtractor")
            .field("stop_words", &self.stop_words.len())
            .field("stemmer", &self.stemmer.name())
            .finish()
    }
}

impl TermOverlapExtractor {
    pub fn new(stop_words: StopWords, stemmer: Arc<dyn Stemmer>) -> Self {
        TermOverlapExtractor {
            stop_words,
            stemmer,
        }
    }
}

impl FeatureExtractor for TermOverlapExtractor {
    fn family(&self) -> FeatureFamily {
        FeatureFamily::TermOverlap
    }

    fn extract(&self, pair: &AnalyzedPair, out: &mut FeatureVector) -> Result<()> {
        let stems = pair.stems(&self.stop_words, self.stemmer.as_ref());

        let matches = substring_pairs(stems.query.iter().map(String::as_str), &stems.passage);
        let covered: usize = stems
            .query
            .iter()
            .map(|q| stems.passage.iter().filter(|p| *p == q).count())
            .sum();

        out.insert("term_overlap", ratio(matches, stems.query.len()));
        out.insert("covered_query_term_number", covered as f64);
        Ok(())
    }
}

/// `synonym_overlap`: every query stem is replaced by itself plus its
/// synonyms, each stemmed again.
pub struct SynonymOverlapExtractor {
    stop_words: StopWords,
    stemmer: Arc<dyn Stemmer>,
    synonyms: Arc<dyn SynonymLookup>,
}

impl std::fmt::Debug for SynonymOverlapExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynonymOverlapExtractor")
            .field("stop_words", &self.stop_words.len())
            .field("stemmer", &self.stemmer.name())
            .finish_non_exhaustive()
    }
}

impl SynonymOverlapExtractor {
    pub fn new(
        stop_words: StopWords,
        stemmer: Arc<dyn Stemmer>,
        synonyms: Arc<dyn SynonymLookup>,
    ) -> Self {
        SynonymOverlapExtractor {
            stop_words,
            stemmer,
            synonyms,
        }
    }

    /// Stemmed, lower-cased expansion forms of one query stem.
    fn expand(&self, stem: &str) -> Vec<String> {
        let mut group: BTreeSet<String> = self.synonyms.lookup(stem);
        group.insert(stem.to_string());
        group
            .iter()
            .map(|form| self.stemmer.stem(form).to_lowercase())
            .collect()
    }
}

impl FeatureExtractor for SynonymOverlapExtractor {
    fn family(&self) -> FeatureFamily {
        FeatureFamily::SynonymOverlap
    }

    fn extract(&self, pair: &AnalyzedPair, out: &mut FeatureVector) -> Result<()> {
        let stems = pair.stems(&self.stop_words, self.stemmer.as_ref());

        let forms: Vec<String> = stems.query.iter().flat_map(|q| self.expand(q)).collect();
        let matches = substring_pairs(forms.iter().map(String::as_str), &stems.passage);

        out.insert("synonym_overlap", ratio(matches, forms.len()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::analysis::{IdentityStemmer, PorterStemmer, SynonymDictionary};

    fn term_overlap(query: &str, passage: &str) -> FeatureVector {
        let mut out = FeatureVector::new("q", "p");
        TermOverlapExtractor::new(StopWords::english(), Arc::new(PorterStemmer::new()))
            .extract(&AnalyzedPair::new(query, passage), &mut out)
            .unwrap();
        out
    }

    #[test]
    fn test_full_overlap() {
        let out = term_overlap("the markets", "Markets of the world");
        assert_eq!(out.get("term_overlap"), Some(1.0));
        assert_eq!(out.get("covered_query_term_number"), Some(1.0));
    }

    #[test]
    fn test_overlap_can_exceed_one() {
        // one query stem "market" is contained in two passage stems
        let out = term_overlap("market", "marketing supermarkets");
        assert_eq!(out.get("term_overlap"), Some(2.0));
        assert_eq!(out.get("covered_query_term_number"), Some(1.0));
    }

    #[test]
    fn test_only_stop_words_gives_zero() {
        let out = term_overlap("the of and", "the euro");
        assert_eq!(out.get("term_overlap"), Some(0.0));
        assert_eq!(out.get("covered_query_term_number"), Some(0.0));
    }

    #[test]
    fn test_synonym_expansion() {
        let synonyms = SynonymDictionary::from_synonym_groups(vec![vec!["car", "auto"]]);
        let extractor = SynonymOverlapExtractor::new(
            StopWords::none(),
            Arc::new(IdentityStemmer::new()),
            Arc::new(synonyms),
        );
        let mut out = FeatureVector::new("q", "p");
        extractor
            .extract(&AnalyzedPair::new("car", "auto dealer"), &mut out)
            .unwrap();

        // forms {auto, car}; only "auto" matches
        assert_eq!(out.get("synonym_overlap"), Some(0.5));
    }

    #[test]
    fn test_synonym_overlap_without_synonyms() {
        let extractor = SynonymOverlapExtractor::new(
            StopWords::english(),
            Arc::new(PorterStemmer::new()),
            Arc::new(SynonymDictionary::new()),
        );
        let mut out = FeatureVector::new("q", "p");
        extractor
            .extract(&AnalyzedPair::new("crisis", "the crisis deepens"), &mut out)
            .unwrap();
        assert_eq!(out.get("synonym_overlap"), Some(1.0));

        let mut out = FeatureVector::new("q", "p");
        extractor
            .extract(&AnalyzedPair::new("the", "the crisis deepens"), &mut out)
            .unwrap();
        assert_eq!(out.get("synonym_overlap"), Some(0.0));
    }

    #[test]
    fn test_extractors_with_different_stemmers_share_a_pair() {
        let pair = AnalyzedPair::new("markets", "the marketing");
        let porter =
            TermOverlapExtractor::new(StopWords::english(), Arc::new(PorterStemmer::new()));
        let identity = SynonymOverlapExtractor::new(
            StopWords::none(),
            Arc::new(IdentityStemmer::new()),
            Arc::new(SynonymDictionary::new()),
        );

        let mut out = FeatureVector::new("q", "p");
        porter.extract(&pair, &mut out).unwrap();
        identity.extract(&pair, &mut out).unwrap();

        let mut fresh = FeatureVector::new("q", "p");
        identity
            .extract(&AnalyzedPair::new("markets", "the marketing"), &mut fresh)
            .unwrap();
        assert_eq!(out.get("synonym_overlap"), fresh.get("synonym_overlap"));
        // "markets" is not contained in the unstemmed "marketing"
        assert_eq!(out.get("synonym_overlap"), Some(0.0));
        assert_eq!(out.get("term_overlap"), Some(1.0));
    }
}
