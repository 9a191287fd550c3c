//! Stemming capability.
//!
//! The engine depends only on the [`Stemmer`] trait; [`PorterStemmer`] is the
//! default implementation and [`IdentityStemmer`] disables stemming.

pub mod porter;

pub use porter::PorterStemmer;

/// Trait for stemming algorithms.
pub trait Stemmer: Send + Sync {
    /// Stem a word to its root form.
    fn stem(&self, word: &str) -> String;

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}

/// Stemmer that returns words unchanged.
#[derive(Debug, Clone, Default)]
pub struct IdentityStemmer;

impl IdentityStemmer {
    pub fn new() -> Self {
        IdentityStemmer
    }
}

impl Stemmer for IdentityStemmer {
    fn stem(&self, word: &str) -> String {
        word.to_string()
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}

impl<S: Stemmer + ?Sized> Stemmer for Box<S> {
    fn stem(&self, word: &str) -> String {
        (**self).stem(word)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
