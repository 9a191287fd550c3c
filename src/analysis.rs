//! Text analysis used by the feature families.
//!
//! Feature computation works on very plain text handling: lower-casing and
//! whitespace splitting, a stopword set, a pluggable stemmer and a pluggable
//! synonym lookup. The stemmer and synonym lookup are capabilities injected
//! into the engine, so callers can swap in their own implementations.

pub mod stem;
pub mod stop;
pub mod synonym;
pub mod tokenizer;

pub use stem::{IdentityStemmer, PorterStemmer, Stemmer};
pub use stop::StopWords;
pub use synonym::{SynonymDictionary, SynonymLookup};
pub use tokenizer::{count_occurrences, tokenize};
