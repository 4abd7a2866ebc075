//! Posting sources used by the index-accelerated traversal.
//!
//! An indexed document store records, for every term occurrence, the text
//! node it occurs in. A [`PostingCursor`] walks those occurrences for one
//! query in `(document, node)` order, which lets the traversal skip text nodes
//! that contain no hit without tokenizing them.
//!
//! Matching a query against an index dictionary is the expensive part, so it
//! happens once: [`PostingIndex::resolve`] produces a [`ResolvedQuery`] whose
//! hit list is shared by every cursor opened from it.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Result;
use crate::query::matcher::TermMatcher;
use crate::tree::{DocId, NodeId};

pub mod cursor;
pub mod posting;
pub mod resolved;
pub mod store;

pub use cursor::HitCursor;
pub use posting::{Posting, PostingList, TermPostingIndex};
pub use resolved::ResolvedQuery;
pub use store::{IndexedDocument, IndexedStore};

/// Ordered walk over the text nodes that contain a query hit.
///
/// A cursor is positioned on at most one hit-bearing node at a time. Hits of
/// other documents are invisible once [`skip_to_document`](Self::skip_to_document)
/// has selected a document.
pub trait PostingCursor {
    /// Select a document. Returns whether it contains any hit.
    fn skip_to_document(&mut self, doc: DocId) -> Result<bool>;

    /// Position on the first hit at or after `node` in the selected document.
    /// Returns whether such a hit exists.
    fn reset_to_node(&mut self, node: NodeId) -> Result<bool>;

    /// Move past the current hit-bearing node. Returns whether another one
    /// follows in the selected document.
    fn next_hit(&mut self) -> Result<bool>;

    /// The node the cursor is positioned on.
    fn current_node_id(&self) -> Option<NodeId>;

    /// The text node holding the next unconsumed hit relative to `node`.
    ///
    /// Going forward, hits before `node` are consumed and the first hit-bearing
    /// node at or after it is returned. Going backward, nothing is consumed and
    /// the last hit-bearing node at or before `node` is returned.
    fn closest_enclosing_text_node(
        &mut self,
        doc: DocId,
        node: NodeId,
        forward: bool,
    ) -> Result<Option<NodeId>>;
}

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// A generation number no other caller has been handed.
pub fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// A term index that resolves queries into hit lists.
pub trait PostingIndex: Send + Sync {
    /// Name of the tokenizer the index was built with.
    fn tokenizer_name(&self) -> &str;

    /// Identifies the index contents.
    ///
    /// Two indexes, or one index before and after a change, must never report
    /// the same generation; [`next_generation`] hands out such numbers.
    /// Resolved queries are reused for as long as the generation holds.
    fn generation(&self) -> u64;

    /// Match the matcher's terms against the dictionary.
    fn resolve(&self, matcher: &TermMatcher) -> Result<ResolvedQuery>;
}
