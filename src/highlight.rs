//! Query highlighting and scoring over node trees.
//!
//! A [`Highlighter`] is built once per query. It flattens the selection into
//! weighted terms, compiles them for matching and prepares the relevance
//! model. It then hands out independent [`Traversal`]s over any node, and
//! scores nodes by counting the term events those traversals report.
//!
//! # Examples
//!
//! ```
//! use xmlft::highlight::{Event, Highlighter};
//! use xmlft::query::{MatchOptions, Selection};
//! use xmlft::tree::{DocId, NodeTree, TreeBuilder};
//!
//! let tree = TreeBuilder::document(DocId::new(0))
//!     .element("p")
//!     .text("The quick brown fox")
//!     .end()
//!     .build()
//!     .unwrap();
//!
//! let highlighter = Highlighter::new(&Selection::word("fox"), MatchOptions::new()).unwrap();
//! let mut traversal = highlighter.traverse(&tree, tree.root().unwrap()).unwrap();
//! assert_eq!(traversal.marked_text().unwrap(), "The quick brown <mark>fox</mark>");
//!
//! let score = highlighter.score(&tree, tree.root().unwrap()).unwrap();
//! assert!(score > 0.0 && score < 1.0);
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::{Tokenizer, TokenizerKind, create_tokenizer};
use crate::error::Result;
use crate::index::{PostingIndex, ResolvedQuery};
use crate::query::flatten::{QueryTermSet, flatten};
use crate::query::matcher::TermMatcher;
use crate::query::options::MatchOptions;
use crate::query::selection::Selection;
use crate::scoring::{DEFAULT_ALPHA, DefaultScoring, RelevanceModel, Scoring};
use crate::tree::{NodeId, NodeTree};

pub mod event;
pub mod segment;
pub mod span;
pub mod traversal;

pub use event::Event;
pub use segment::{Segmenter, segment};
pub use span::{SpanKind, TermHit, TextSpan};
pub use traversal::{Mode, Traversal};

/// Which hit source a traversal may use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightMode {
    /// Follow the posting index when the document has a compatible one.
    #[default]
    Auto,
    /// Always tokenize every text node.
    Generic,
}

/// Configuration for highlighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Hit source selection.
    pub mode: HighlightMode,
    /// Tokenizer used for text and query words.
    pub tokenizer: TokenizerKind,
    /// HTML tag wrapping matched terms in marked text (e.g., "mark", "em").
    pub tag: String,
    /// CSS class to add to highlight tags.
    pub css_class: Option<String>,
    /// Mixing constant of the default scoring model.
    pub alpha: f64,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        HighlightConfig {
            mode: HighlightMode::Auto,
            tokenizer: TokenizerKind::UnicodeWord,
            tag: "mark".to_string(),
            css_class: None,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl HighlightConfig {
    /// Create a new highlight configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hit source selection.
    pub fn mode(mut self, mode: HighlightMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the tokenizer.
    pub fn tokenizer(mut self, tokenizer: TokenizerKind) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Set the HTML tag for highlighting.
    pub fn tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set the CSS class for highlight tags.
    pub fn css_class<S: Into<String>>(mut self, css_class: S) -> Self {
        self.css_class = Some(css_class.into());
        self
    }

    /// Set the scoring mixing constant.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Build the opening HTML tag.
    pub fn opening_tag(&self) -> String {
        if let Some(ref css_class) = self.css_class {
            format!("<{} class=\"{}\">", self.tag, css_class)
        } else {
            format!("<{}>", self.tag)
        }
    }

    /// Build the closing HTML tag.
    pub fn closing_tag(&self) -> String {
        format!("</{}>", self.tag)
    }
}

/// Highlights and scores one full-text query.
///
/// The highlighter can be shared between threads; every traversal it creates
/// owns its own cursor state. The query is resolved against a posting index
/// once, and the result is kept until an index of another generation is seen.
pub struct Highlighter {
    terms: QueryTermSet,
    options: MatchOptions,
    config: HighlightConfig,
    tokenizer: Arc<dyn Tokenizer>,
    matcher: TermMatcher,
    model: RelevanceModel,
    resolved: RwLock<Option<(u64, ResolvedQuery)>>,
}

impl fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Highlighter")
            .field("terms", &self.terms.texts())
            .field("options", &self.options)
            .field("config", &self.config)
            .field("tokenizer", &self.tokenizer.name())
            .field("scoring", &self.model.scoring().name())
            .finish()
    }
}

impl Highlighter {
    /// Create a highlighter with the default configuration.
    pub fn new(selection: &Selection, options: MatchOptions) -> Result<Self> {
        Self::with_config(selection, options, HighlightConfig::default())
    }

    /// Create a highlighter.
    pub fn with_config(
        selection: &Selection,
        options: MatchOptions,
        config: HighlightConfig,
    ) -> Result<Self> {
        let terms = flatten(selection)?;
        let tokenizer = create_tokenizer(config.tokenizer, options.language.as_deref())?;
        let matcher = TermMatcher::new(&terms, &options, tokenizer.clone())?;
        let model = RelevanceModel::new(&terms, Arc::new(DefaultScoring::with_alpha(config.alpha)));
        debug!(
            "highlighter for {selection} with {} terms: {:?}",
            terms.len(),
            terms.texts()
        );

        Ok(Highlighter {
            terms,
            options,
            config,
            tokenizer,
            matcher,
            model,
            resolved: RwLock::new(None),
        })
    }

    /// Replace the scoring model.
    pub fn with_scoring(mut self, scoring: Arc<dyn Scoring>) -> Self {
        self.model = RelevanceModel::new(&self.terms, scoring);
        self
    }

    /// Replace the tokenizer, recompiling the query words with it.
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Result<Self> {
        self.matcher = TermMatcher::new(&self.terms, &self.options, tokenizer.clone())?;
        self.tokenizer = tokenizer;
        self.resolved = RwLock::new(None);
        Ok(self)
    }

    /// Number of flattened query terms.
    pub fn query_term_count(&self) -> usize {
        self.terms.len()
    }

    /// Texts of the flattened query terms, in rank order.
    pub fn query_terms(&self) -> Vec<String> {
        self.terms.texts()
    }

    pub fn terms(&self) -> &QueryTermSet {
        &self.terms
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    pub fn matcher(&self) -> &TermMatcher {
        &self.matcher
    }

    pub fn model(&self) -> &RelevanceModel {
        &self.model
    }

    /// The query resolved against `index`, reusing the last resolution while
    /// the index generation is unchanged.
    pub fn resolve(&self, index: &dyn PostingIndex) -> Result<ResolvedQuery> {
        let generation = index.generation();
        if let Some((cached, resolved)) = self.resolved.read().as_ref() {
            if *cached == generation {
                return Ok(resolved.clone());
            }
        }

        let mut slot = self.resolved.write();
        if let Some((cached, resolved)) = slot.as_ref() {
            if *cached == generation {
                return Ok(resolved.clone());
            }
        }
        let resolved = index.resolve(&self.matcher)?;
        debug!("resolved query against index generation {generation}");
        *slot = Some((generation, resolved.clone()));
        Ok(resolved)
    }

    /// Start a traversal of the subtree rooted at `node`.
    pub fn traverse<'a>(&'a self, tree: &'a dyn NodeTree, node: NodeId) -> Result<Traversal<'a>> {
        let mut traversal = Traversal::new(self, tree);
        traversal.start(Some(node))?;
        Ok(traversal)
    }

    /// Start a traversal of a whole document; an empty tree yields only `End`.
    pub fn traverse_document<'a>(&'a self, tree: &'a dyn NodeTree) -> Result<Traversal<'a>> {
        let mut traversal = Traversal::new(self, tree);
        traversal.start(tree.root())?;
        Ok(traversal)
    }

    /// Relevance of the subtree rooted at `node`, in `[0, 1)`.
    ///
    /// Term frequencies are the term events of a traversal. Inverse document
    /// frequencies come from the document's index when it was built with the
    /// highlighter's tokenizer, and are 1 otherwise.
    pub fn score(&self, tree: &dyn NodeTree, node: NodeId) -> Result<f64> {
        let mut frequencies = vec![0.0; self.terms.len()];
        let mut traversal = self.traverse(tree, node)?;
        loop {
            match traversal.advance()? {
                Event::Term => {
                    if let Some(rank) = traversal.matched_term_position() {
                        frequencies[rank] += 1.0;
                    }
                }
                Event::End => break,
                _ => {}
            }
        }

        let resolved = match tree.posting_index() {
            Some(index) if index.tokenizer_name() == self.tokenizer.name() => {
                Some(self.resolve(index)?)
            }
            _ => None,
        };
        let idf = resolved.as_ref().map(ResolvedQuery::inverse_document_frequencies);
        self.model.score(tree.doc_id(), &frequencies, idf)
    }
}
