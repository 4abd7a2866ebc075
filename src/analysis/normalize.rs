//! Case and diacritics folding applied before terms are compared with tokens.
//!
//! Query terms and text tokens are folded on different sides for the
//! `Lower`/`Upper` case modes: the query side is converted, the token side is
//! left alone, so only tokens that are already lower (upper) case match.

use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::query::options::{CaseMode, MatchOptions};

/// Remove diacritical marks ("résumé" -> "resume").
pub fn strip_diacritics(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect())
}

/// Folds tokens and query terms according to match options.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    case: CaseMode,
    diacritics_sensitive: bool,
}

impl Normalizer {
    /// Create a normalizer for the given match options.
    pub fn new(options: &MatchOptions) -> Self {
        Normalizer {
            case: options.case,
            diacritics_sensitive: options.diacritics_sensitive,
        }
    }

    /// Fold a token found in the text.
    pub fn token<'t>(&self, token: &'t str) -> Cow<'t, str> {
        let folded = match self.case {
            CaseMode::Insensitive => lowercase(token),
            CaseMode::Sensitive | CaseMode::Lower | CaseMode::Upper => Cow::Borrowed(token),
        };
        self.diacritics(folded)
    }

    /// Fold a word or pattern of the query.
    pub fn query<'t>(&self, term: &'t str) -> Cow<'t, str> {
        let folded = match self.case {
            CaseMode::Insensitive | CaseMode::Lower => lowercase(term),
            CaseMode::Upper => Cow::Owned(term.to_uppercase()),
            CaseMode::Sensitive => Cow::Borrowed(term),
        };
        self.diacritics(folded)
    }

    fn diacritics<'t>(&self, text: Cow<'t, str>) -> Cow<'t, str> {
        if self.diacritics_sensitive {
            return text;
        }
        match text {
            Cow::Borrowed(text) => strip_diacritics(text),
            Cow::Owned(text) => Cow::Owned(strip_diacritics(&text).into_owned()),
        }
    }
}

fn lowercase(text: &str) -> Cow<'_, str> {
    if text.chars().any(|c| c.is_uppercase()) {
        Cow::Owned(text.to_lowercase())
    } else {
        Cow::Borrowed(text)
    }
}
