//! Whitespace tokenizer implementation.

use super::Tokenizer;

use crate::analysis::token::{Token, TokenStream, TokenType};
use crate::error::Result;

/// A tokenizer that splits text on whitespace.
///
/// Punctuation stays attached to the surrounding word, so `"fox."` is one token.
#[derive(Clone, Debug, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    /// Create a new whitespace tokenizer.
    pub fn new() -> Self {
        WhitespaceTokenizer
    }

    fn push_word(tokens: &mut Vec<Token>, text: &str, start: usize, end: usize) {
        let word = &text[start..end];
        let position = tokens.len();
        tokens.push(
            Token::with_offsets(word, position, start, end)
                .with_token_type(TokenType::detect(word)),
        );
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        let mut word_start = None;

        for (offset, c) in text.char_indices() {
            if c.is_whitespace() {
                if let Some(start) = word_start.take() {
                    Self::push_word(&mut tokens, text, start, offset);
                }
            } else if word_start.is_none() {
                word_start = Some(offset);
            }
        }
        if let Some(start) = word_start {
            Self::push_word(&mut tokens, text, start, text.len());
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn count_words(&self, text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count())
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_tokenizer() {
        let tokenizer = WhitespaceTokenizer::new();
        let tokens: Vec<Token> = tokenizer.tokenize("hello  world\ttest").unwrap().collect();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[1].text, "world");
        assert_eq!(tokens[1].start_offset, 7);
        assert_eq!(tokens[2].text, "test");
        assert_eq!(tokens[2].position, 2);
    }

    #[test]
    fn test_repeated_words_keep_their_offsets() {
        let tokenizer = WhitespaceTokenizer::new();
        let tokens: Vec<Token> = tokenizer.tokenize("to be or not to be").unwrap().collect();

        assert_eq!(tokens[4].text, "to");
        assert_eq!(tokens[4].start_offset, 13);
        assert_eq!(tokens[5].end_offset, 18);
    }

    #[test]
    fn test_count_words() {
        let tokenizer = WhitespaceTokenizer::new();
        assert_eq!(tokenizer.count_words(" brown fox").unwrap(), 2);
        assert_eq!(tokenizer.count_words("   ").unwrap(), 0);
    }

    #[test]
    fn test_tokenizer_name() {
        assert_eq!(WhitespaceTokenizer::new().name(), "whitespace");
    }
}
