//! Tokenizer implementations for text analysis.
//!
//! Tokenizers split a text buffer into words with exact byte offsets. The
//! highlighter tokenizes every text node it segments, and the indexed store
//! tokenizes text nodes once when documents are added; both must use the same
//! tokenizer for index-accelerated highlighting to agree with the generic path.
//!
//! # Available Tokenizers
//!
//! - [`whitespace::WhitespaceTokenizer`] - Splits on whitespace characters
//! - [`unicode_word::UnicodeWordTokenizer`] - Uses Unicode word boundaries
//!
//! # Examples
//!
//! ```
//! use xmlft::analysis::tokenizer::Tokenizer;
//! use xmlft::analysis::tokenizer::whitespace::WhitespaceTokenizer;
//!
//! let tokenizer = WhitespaceTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello world").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokenizer.count_words("Hello world").unwrap(), 2);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::token::TokenStream;
use crate::error::{FtError, Result};

pub mod unicode_word;
pub mod whitespace;

pub use unicode_word::UnicodeWordTokenizer;
pub use whitespace::WhitespaceTokenizer;

/// Trait for tokenizers that convert text into word tokens.
///
/// The trait requires `Send + Sync` so one tokenizer can be shared by
/// highlighters running on different threads.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of word tokens, in text order.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Count the words of the given text.
    fn count_words(&self, text: &str) -> Result<usize> {
        Ok(self.tokenize(text)?.count())
    }

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// Tokenizer families that can be selected by configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerKind {
    /// Unicode word boundaries (UAX #29)
    #[default]
    UnicodeWord,
    /// Whitespace-separated words
    Whitespace,
}

/// ISO 639-1 codes of the languages the tokenizers can handle.
const SUPPORTED_LANGUAGES: &[&str] = &[
    "ar", "cs", "da", "de", "el", "en", "es", "fi", "fr", "hu", "it", "ja", "ko", "nl", "no",
    "pl", "pt", "ro", "ru", "sv", "tr", "zh",
];

/// Strip a region suffix from a language tag and lowercase it ("en-US" -> "en").
pub fn primary_language(language: &str) -> String {
    language
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Check whether a language tag names a supported language.
pub fn is_supported_language(language: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&primary_language(language).as_str())
}

/// Create a tokenizer of the given kind for an optional ISO language code.
///
/// Every supported language currently shares the same word segmentation
/// rules; the language code is validated so that unsupported languages are
/// reported instead of silently tokenized with the wrong rules.
pub fn create_tokenizer(kind: TokenizerKind, language: Option<&str>) -> Result<Arc<dyn Tokenizer>> {
    if let Some(language) = language {
        if !is_supported_language(language) {
            return Err(FtError::analysis(format!(
                "Language '{language}' is not supported"
            )));
        }
    }

    let tokenizer: Arc<dyn Tokenizer> = match kind {
        TokenizerKind::UnicodeWord => Arc::new(UnicodeWordTokenizer::new()),
        TokenizerKind::Whitespace => Arc::new(WhitespaceTokenizer::new()),
    };
    Ok(tokenizer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_language() {
        assert_eq!(primary_language("en-US"), "en");
        assert_eq!(primary_language("DE"), "de");
        assert_eq!(primary_language("pt_BR"), "pt");
    }

    #[test]
    fn test_create_tokenizer() {
        let tokenizer = create_tokenizer(TokenizerKind::Whitespace, Some("en")).unwrap();
        assert_eq!(tokenizer.name(), "whitespace");

        let tokenizer = create_tokenizer(TokenizerKind::default(), None).unwrap();
        assert_eq!(tokenizer.name(), "unicode_word");
    }

    #[test]
    fn test_unsupported_language() {
        let result = create_tokenizer(TokenizerKind::UnicodeWord, Some("xx"));
        assert!(matches!(result, Err(FtError::Analysis(_))));
    }
}
