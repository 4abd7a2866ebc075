//! Matching of flattened query terms against tokenized text.

use std::sync::Arc;

use log::debug;

use crate::analysis::normalize::Normalizer;
use crate::analysis::stemmer::{Stemmer, create_stemmer};
use crate::analysis::token::Token;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;
use crate::highlight::span::TermHit;
use crate::query::flatten::{BasicTerm, QueryTermSet};
use crate::query::options::MatchOptions;
use crate::query::wildcard::WildcardPattern;

/// A term compiled against the match options.
#[derive(Debug, Clone)]
enum CompiledTerm {
    /// Normalized tokens that must occur consecutively.
    Words(Vec<String>),
    Wildcard(WildcardPattern),
}

/// A text token in the forms the compiled terms compare against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedToken {
    /// Case and diacritics folded form, compared with wildcards.
    pub folded: String,
    /// Stemmed form, present when stemming is enabled.
    pub stemmed: Option<String>,
}

impl NormalizedToken {
    /// The form compared with literal words.
    pub fn word(&self) -> &str {
        self.stemmed.as_deref().unwrap_or(&self.folded)
    }
}

/// Finds occurrences of a query's terms in text.
///
/// Text is tokenized once and scanned left to right. At every token the
/// lowest-ranked term starting there wins; its hit covers all tokens of the
/// term and scanning resumes after them, so hits never overlap and come out
/// in increasing offset order.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use xmlft::analysis::tokenizer::WhitespaceTokenizer;
/// use xmlft::query::{MatchOptions, Selection, TermMatcher, flatten};
///
/// let terms = flatten(&Selection::word("quick")).unwrap();
/// let matcher =
///     TermMatcher::new(&terms, &MatchOptions::new(), Arc::new(WhitespaceTokenizer::new())).unwrap();
///
/// let hits = matcher.find_hits("the Quick brown fox").unwrap();
/// assert_eq!(hits.len(), 1);
/// assert_eq!((hits[0].start, hits[0].len), (4, 5));
/// ```
#[derive(Clone)]
pub struct TermMatcher {
    terms: Vec<CompiledTerm>,
    normalizer: Normalizer,
    stemmer: Option<Arc<dyn Stemmer>>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl std::fmt::Debug for TermMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermMatcher")
            .field("terms", &self.terms)
            .field("normalizer", &self.normalizer)
            .field("stemmer", &self.stemmer.as_ref().map(|s| s.name()))
            .field("tokenizer", &self.tokenizer.name())
            .finish()
    }
}

impl TermMatcher {
    /// Compile the terms of a query.
    pub fn new(
        terms: &QueryTermSet,
        options: &MatchOptions,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Result<Self> {
        let normalizer = Normalizer::new(options);
        let stemmer = if options.stemming {
            Some(create_stemmer(options.language.as_deref())?)
        } else {
            None
        };

        let mut matcher = TermMatcher {
            terms: Vec::with_capacity(terms.len()),
            normalizer,
            stemmer,
            tokenizer,
        };

        for weighted in terms.iter() {
            let compiled = match &weighted.term {
                BasicTerm::Word(word) => {
                    let words: Vec<String> = matcher
                        .tokenizer
                        .tokenize(word)?
                        .map(|token| matcher.query_word(&token.text))
                        .collect();
                    if words.is_empty() {
                        debug!("query word {word:?} contains no tokens and will never match");
                    }
                    CompiledTerm::Words(words)
                }
                BasicTerm::Wildcard(pattern) => {
                    CompiledTerm::Wildcard(WildcardPattern::new(
                        matcher.normalizer.query(pattern),
                    )?)
                }
            };
            matcher.terms.push(compiled);
        }

        Ok(matcher)
    }

    /// The tokenizer used for text and query words.
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    /// Number of compiled terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether there are no terms to match.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of consecutive tokens a match of the term spans (0 if it can never match).
    pub fn term_len(&self, rank: usize) -> usize {
        match self.terms.get(rank) {
            Some(CompiledTerm::Words(words)) => words.len(),
            Some(CompiledTerm::Wildcard(_)) => 1,
            None => 0,
        }
    }

    /// Normalize a token found in text.
    pub fn normalize(&self, token: &str) -> NormalizedToken {
        let folded = self.normalizer.token(token).into_owned();
        let stemmed = self.stemmer.as_ref().map(|stemmer| stemmer.stem(&folded));
        NormalizedToken { folded, stemmed }
    }

    /// Whether `token` matches the `index`-th token of the term of the given rank.
    pub fn matches_token(&self, rank: usize, index: usize, token: &NormalizedToken) -> bool {
        match self.terms.get(rank) {
            Some(CompiledTerm::Words(words)) => words.get(index).is_some_and(|w| w == token.word()),
            Some(CompiledTerm::Wildcard(pattern)) => index == 0 && pattern.matches(&token.folded),
            None => false,
        }
    }

    /// Find all hits in a text buffer, ordered by start offset.
    pub fn find_hits(&self, text: &str) -> Result<Vec<TermHit>> {
        if self.terms.is_empty() {
            return Ok(Vec::new());
        }

        let tokens: Vec<Token> = self.tokenizer.tokenize(text)?.collect();
        let normalized: Vec<NormalizedToken> =
            tokens.iter().map(|token| self.normalize(&token.text)).collect();

        let mut hits = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let found = (0..self.terms.len())
                .find_map(|rank| self.match_at(rank, &normalized, i).map(|words| (rank, words)));
            match found {
                Some((rank, words)) => {
                    let first = &tokens[i];
                    let last = &tokens[i + words - 1];
                    hits.push(TermHit {
                        rank,
                        start: first.start_offset,
                        len: last.end_offset - first.start_offset,
                        position: Some(i),
                        words,
                    });
                    i += words;
                }
                None => i += 1,
            }
        }

        Ok(hits)
    }

    /// Number of tokens matched by the term starting at token `i`, if it matches there.
    fn match_at(&self, rank: usize, tokens: &[NormalizedToken], i: usize) -> Option<usize> {
        let len = self.term_len(rank);
        if len == 0 || i + len > tokens.len() {
            return None;
        }
        (0..len)
            .all(|j| self.matches_token(rank, j, &tokens[i + j]))
            .then_some(len)
    }

    fn query_word(&self, word: &str) -> String {
        let folded = self.normalizer.query(word);
        match &self.stemmer {
            Some(stemmer) => stemmer.stem(&folded),
            None => folded.into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokenizer::{UnicodeWordTokenizer, WhitespaceTokenizer};
    use crate::query::flatten::flatten;
    use crate::query::options::CaseMode;
    use crate::query::selection::Selection;

    fn matcher(selection: Selection, options: MatchOptions) -> TermMatcher {
        let terms = flatten(&selection).unwrap();
        TermMatcher::new(&terms, &options, Arc::new(UnicodeWordTokenizer::new())).unwrap()
    }

    fn spans(matcher: &TermMatcher, text: &str) -> Vec<(usize, String)> {
        matcher
            .find_hits(text)
            .unwrap()
            .into_iter()
            .map(|hit| (hit.rank, text[hit.start..hit.start + hit.len].to_string()))
            .collect()
    }

    #[test]
    fn test_case_insensitive_words() {
        let m = matcher(
            Selection::any(vec![Selection::word("fox"), Selection::word("DOG")]),
            MatchOptions::new(),
        );
        assert_eq!(
            spans(&m, "The Fox jumps over the dog."),
            vec![(0, "Fox".to_string()), (1, "dog".to_string())]
        );
    }

    #[test]
    fn test_case_modes() {
        let m = matcher(Selection::word("fox"), MatchOptions::new().case(CaseMode::Sensitive));
        assert_eq!(spans(&m, "Fox fox"), vec![(0, "fox".to_string())]);

        let m = matcher(Selection::word("Fox"), MatchOptions::new().case(CaseMode::Lower));
        assert_eq!(spans(&m, "Fox fox FOX"), vec![(0, "fox".to_string())]);

        let m = matcher(Selection::word("fox"), MatchOptions::new().case(CaseMode::Upper));
        assert_eq!(spans(&m, "Fox fox FOX"), vec![(0, "FOX".to_string())]);
    }

    #[test]
    fn test_diacritics() {
        let m = matcher(Selection::word("resume"), MatchOptions::new());
        assert_eq!(spans(&m, "my résumé"), vec![(0, "résumé".to_string())]);

        let m = matcher(
            Selection::word("resume"),
            MatchOptions::new().diacritics_sensitive(true),
        );
        assert!(spans(&m, "my résumé").is_empty());
    }

    #[test]
    fn test_stemming() {
        let m = matcher(Selection::word("running"), MatchOptions::new().stemming(true));
        assert_eq!(
            spans(&m, "He runs and ran"),
            vec![(0, "runs".to_string())]
        );
    }

    #[test]
    fn test_multi_token_word() {
        let m = matcher(Selection::word("brown fox"), MatchOptions::new());
        let hits = m.find_hits("a brown dog and a brown  fox").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].words, 2);
        assert_eq!(hits[0].position, Some(5));
        let text = "a brown dog and a brown  fox";
        assert_eq!(&text[hits[0].start..hits[0].end()], "brown  fox");
    }

    #[test]
    fn test_lowest_rank_wins_and_hits_do_not_overlap() {
        let m = matcher(
            Selection::any(vec![
                Selection::word("new"),
                Selection::word("new york"),
                Selection::wildcard("y.*"),
            ]),
            MatchOptions::new(),
        );
        assert_eq!(
            spans(&m, "new york"),
            vec![(0, "new".to_string()), (2, "york".to_string())]
        );

        let m = matcher(
            Selection::any(vec![Selection::word("new york"), Selection::word("new")]),
            MatchOptions::new(),
        );
        assert_eq!(spans(&m, "new york"), vec![(0, "new york".to_string())]);
    }

    #[test]
    fn test_wildcards_are_not_stemmed() {
        let m = matcher(Selection::wildcard("connect.+"), MatchOptions::new().stemming(true));
        assert_eq!(spans(&m, "Connected"), vec![(0, "Connected".to_string())]);
    }

    #[test]
    fn test_whitespace_tokenizer_keeps_punctuation() {
        let terms = flatten(&Selection::word("fox")).unwrap();
        let m = TermMatcher::new(&terms, &MatchOptions::new(), Arc::new(WhitespaceTokenizer::new()))
            .unwrap();
        assert!(m.find_hits("the fox.").unwrap().is_empty());
        assert_eq!(m.find_hits("the fox").unwrap().len(), 1);
    }

    #[test]
    fn test_word_without_tokens_never_matches() {
        let m = matcher(Selection::word("--"), MatchOptions::new());
        assert_eq!(m.term_len(0), 0);
        assert!(m.find_hits("-- --").unwrap().is_empty());
    }
}
