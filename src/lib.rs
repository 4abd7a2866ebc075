//! # xmlft
//!
//! Full-text query weighting, scoring and highlighting over XML node trees.
//!
//! ## Features
//!
//! - Selection trees of words, wildcards, conjunctions, disjunctions and
//!   mild-not, flattened into weighted query terms
//! - Pluggable scoring formulas
//! - Pull-based highlighting traversal that splits text into plain and term spans
//! - Index-accelerated traversal that only tokenizes text nodes holding hits
//! - Case, diacritics and stemming match options

pub mod analysis;
pub mod error;
pub mod highlight;
pub mod index;
pub mod query;
pub mod scoring;
pub mod tree;

pub mod prelude {
    pub use crate::error::{FtError, Result};
    pub use crate::highlight::{Event, HighlightConfig, HighlightMode, Highlighter, Mode, Traversal};
    pub use crate::index::IndexedStore;
    pub use crate::query::{MatchOptions, Selection};
    pub use crate::scoring::{DefaultScoring, Scoring};
    pub use crate::tree::{DocId, NodeId, NodeTree, TreeBuilder};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
