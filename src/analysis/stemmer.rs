//! Stemming algorithms for reducing words to their root forms.
//!
//! Stemmers are applied to both query words and text tokens when the
//! `stemming` match option is set, so "running" in a query finds "runs" in
//! the text.

use std::sync::Arc;

use crate::analysis::tokenizer::primary_language;
use crate::error::{FtError, Result};

pub mod porter;

pub use porter::PorterStemmer;

/// Trait for stemming algorithms.
pub trait Stemmer: Send + Sync {
    /// Stem a word to its root form.
    fn stem(&self, word: &str) -> String;

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}

/// Create the stemmer for an optional ISO language code.
///
/// English (and an unspecified language) uses the Porter algorithm. Other
/// languages have no stemmer yet and are rejected rather than stemmed with
/// English rules.
pub fn create_stemmer(language: Option<&str>) -> Result<Arc<dyn Stemmer>> {
    match language.map(primary_language).as_deref() {
        None | Some("en") => Ok(Arc::new(PorterStemmer::new())),
        Some(other) => Err(FtError::analysis(format!(
            "No stemmer available for language '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_stemmer() {
        assert_eq!(create_stemmer(None).unwrap().name(), "porter");
        assert_eq!(create_stemmer(Some("en-GB")).unwrap().name(), "porter");
        assert!(create_stemmer(Some("ja")).is_err());
    }
}
