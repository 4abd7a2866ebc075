//! Full-text queries: selection trees, match options and their compiled forms.
//!
//! A [`Selection`] tree is produced by the query compiler. The
//! [`flatten`](flatten::flatten) step reduces it to a [`QueryTermSet`] of
//! weighted basic terms, which a [`TermMatcher`] then compiles against the
//! [`MatchOptions`] to find term occurrences in text.

pub mod flatten;
pub mod matcher;
pub mod options;
pub mod selection;
pub mod wildcard;

pub use flatten::{BasicTerm, QueryTermSet, WeightedTerm, flatten};
pub use matcher::TermMatcher;
pub use options::{CaseMode, MatchOptions, ProximityFilter};
pub use selection::Selection;
pub use wildcard::WildcardPattern;
