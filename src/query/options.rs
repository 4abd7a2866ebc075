//! Match options attached to a full-text selection.

use serde::{Deserialize, Serialize};

/// How letter case is compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseMode {
    /// Case is ignored on both sides.
    #[default]
    Insensitive,
    /// Query and token must agree exactly.
    Sensitive,
    /// Only lower-case tokens match; the query is lower-cased.
    Lower,
    /// Only upper-case tokens match; the query is upper-cased.
    Upper,
}

/// Word-proximity constraints compiled with the query.
///
/// They restrict which documents satisfy a query. Highlighting and term
/// weighting do not evaluate them, but they are kept with the options so the
/// caller sees the full set it compiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProximityFilter {
    /// All matches lie within a window of `words` words.
    Window { words: usize },
    /// Consecutive matches are between `min` and `max` words apart.
    Distance { min: usize, max: usize },
    /// Matches occur in query order.
    Ordered,
}

/// Options controlling how query terms match tokens.
///
/// # Examples
///
/// ```
/// use xmlft::query::{CaseMode, MatchOptions};
///
/// let options: MatchOptions =
///     serde_json::from_str(r#"{ "language": "en", "stemming": true }"#).unwrap();
/// assert_eq!(options.case, CaseMode::Insensitive);
/// assert!(options.stemming);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// ISO 639 language code, optionally with a region ("en", "en-US").
    pub language: Option<String>,
    /// Case comparison mode.
    pub case: CaseMode,
    /// Whether diacritical marks must match.
    pub diacritics_sensitive: bool,
    /// Whether words are stemmed before comparison.
    pub stemming: bool,
    /// Proximity filters of the query.
    pub filters: Vec<ProximityFilter>,
}

impl MatchOptions {
    /// Create default options (case and diacritics insensitive, no stemming).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the language.
    pub fn language<S: Into<String>>(mut self, language: S) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the case mode.
    pub fn case(mut self, case: CaseMode) -> Self {
        self.case = case;
        self
    }

    /// Set diacritics sensitivity.
    pub fn diacritics_sensitive(mut self, sensitive: bool) -> Self {
        self.diacritics_sensitive = sensitive;
        self
    }

    /// Enable or disable stemming.
    pub fn stemming(mut self, stemming: bool) -> Self {
        self.stemming = stemming;
        self
    }

    /// Add a proximity filter.
    pub fn filter(mut self, filter: ProximityFilter) -> Self {
        self.filters.push(filter);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = MatchOptions::new()
            .language("de")
            .case(CaseMode::Sensitive)
            .stemming(true)
            .filter(ProximityFilter::Window { words: 5 });

        assert_eq!(options.language.as_deref(), Some("de"));
        assert_eq!(options.case, CaseMode::Sensitive);
        assert!(!options.diacritics_sensitive);
        assert_eq!(options.filters, vec![ProximityFilter::Window { words: 5 }]);
    }

    #[test]
    fn test_filters_from_json() {
        let options: MatchOptions = serde_json::from_str(
            r#"{ "case": "upper", "filters": [{ "type": "distance", "min": 0, "max": 3 }, { "type": "ordered" }] }"#,
        )
        .unwrap();

        assert_eq!(options.case, CaseMode::Upper);
        assert_eq!(
            options.filters,
            vec![
                ProximityFilter::Distance { min: 0, max: 3 },
                ProximityFilter::Ordered
            ]
        );
    }
}
