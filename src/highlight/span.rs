//! Hits and the spans a text node is split into.

use serde::{Deserialize, Serialize};

/// Kinds of text spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanKind {
    /// Text that matches no query term.
    Plain,
    /// A matched query term.
    Term,
}

/// One occurrence of a query term inside a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermHit {
    /// Rank of the matched term in the query term set.
    pub rank: usize,
    /// Byte offset of the first matched token.
    pub start: usize,
    /// Byte length up to the end of the last matched token.
    pub len: usize,
    /// Word position of the first matched token, when known.
    pub position: Option<usize>,
    /// Number of tokens the hit covers.
    pub words: usize,
}

impl TermHit {
    /// A single-word hit with no known word position.
    pub fn new(rank: usize, start: usize, len: usize) -> Self {
        TermHit {
            rank,
            start,
            len,
            position: None,
            words: 1,
        }
    }

    /// Set the word position of the hit.
    pub fn at_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Byte offset just past the hit.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A contiguous piece of a text node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub kind: SpanKind,
    /// Byte offset within the node's text.
    pub start: usize,
    /// Byte length.
    pub len: usize,
    /// Rank of the matched term, for term spans.
    pub rank: Option<usize>,
    /// Number of words fully inside the span; `None` until counted.
    pub words: Option<usize>,
}

impl TextSpan {
    /// A plain span.
    pub fn plain(start: usize, len: usize, words: Option<usize>) -> Self {
        TextSpan {
            kind: SpanKind::Plain,
            start,
            len,
            rank: None,
            words,
        }
    }

    /// The term span of a hit. A term counts as one word.
    pub fn term(hit: &TermHit) -> Self {
        TextSpan {
            kind: SpanKind::Term,
            start: hit.start,
            len: hit.len,
            rank: Some(hit.rank),
            words: Some(1),
        }
    }

    /// Byte offset just past the span.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn is_term(&self) -> bool {
        self.kind == SpanKind::Term
    }

    /// The slice of `text` this span covers.
    pub fn text<'t>(&self, text: &'t str) -> &'t str {
        text.get(self.start..self.end()).unwrap_or_default()
    }
}
