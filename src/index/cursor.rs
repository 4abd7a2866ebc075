//! Cursor over a sorted list of hit-bearing text nodes.

use std::sync::Arc;

use crate::error::{FtError, Result};
use crate::index::PostingCursor;
use crate::tree::{DocId, NodeId};

/// A [`PostingCursor`] over precomputed `(document, node)` hits.
///
/// Selecting a document or node is a binary search; the hit list itself is
/// never copied.
#[derive(Debug, Clone)]
pub struct HitCursor {
    hits: Arc<[(DocId, NodeId)]>,
    doc: Option<DocId>,
    pos: usize,
}

impl HitCursor {
    /// Create a cursor; hits are sorted and deduplicated here.
    pub fn new(mut hits: Vec<(DocId, NodeId)>) -> Self {
        hits.sort_unstable();
        hits.dedup();
        Self::shared(hits.into())
    }

    /// Create a cursor over an already sorted, duplicate-free hit list.
    pub(crate) fn shared(hits: Arc<[(DocId, NodeId)]>) -> Self {
        HitCursor {
            hits,
            doc: None,
            pos: 0,
        }
    }

    fn selected(&self) -> Result<DocId> {
        self.doc
            .ok_or_else(|| FtError::contract("posting cursor used before skip_to_document"))
    }

    fn current(&self) -> Option<(DocId, NodeId)> {
        let doc = self.doc?;
        self.hits.get(self.pos).copied().filter(|(d, _)| *d == doc)
    }
}

impl PostingCursor for HitCursor {
    fn skip_to_document(&mut self, doc: DocId) -> Result<bool> {
        self.doc = Some(doc);
        self.pos = self.hits.partition_point(|(d, _)| *d < doc);
        Ok(self.current().is_some())
    }

    fn reset_to_node(&mut self, node: NodeId) -> Result<bool> {
        let doc = self.selected()?;
        self.pos = self.hits.partition_point(|hit| *hit < (doc, node));
        Ok(self.current().is_some())
    }

    fn next_hit(&mut self) -> Result<bool> {
        self.selected()?;
        if self.current().is_some() {
            self.pos += 1;
        }
        Ok(self.current().is_some())
    }

    fn current_node_id(&self) -> Option<NodeId> {
        self.current().map(|(_, node)| node)
    }

    fn closest_enclosing_text_node(
        &mut self,
        doc: DocId,
        node: NodeId,
        forward: bool,
    ) -> Result<Option<NodeId>> {
        if self.doc != Some(doc) {
            return Err(FtError::contract(format!(
                "posting cursor is not positioned on document {doc}"
            )));
        }
        if forward {
            while self.current().is_some_and(|(_, hit)| hit < node) {
                self.pos += 1;
            }
            Ok(self.current_node_id())
        } else {
            let end = self.hits.partition_point(|hit| *hit <= (doc, node));
            Ok(self.hits[..end]
                .last()
                .filter(|(d, _)| *d == doc)
                .map(|(_, hit)| *hit))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor() -> HitCursor {
        let n = NodeId::new;
        let d = DocId::new;
        HitCursor::new(vec![(d(1), n(7)), (d(0), n(3)), (d(1), n(2)), (d(0), n(3)), (d(0), n(9))])
    }

    #[test]
    fn test_walk_document() {
        let mut cursor = cursor();
        assert!(cursor.skip_to_document(DocId::new(0)).unwrap());
        assert_eq!(cursor.current_node_id(), Some(NodeId::new(3)));
        assert!(cursor.next_hit().unwrap());
        assert_eq!(cursor.current_node_id(), Some(NodeId::new(9)));
        assert!(!cursor.next_hit().unwrap());
        assert_eq!(cursor.current_node_id(), None);
        assert!(!cursor.next_hit().unwrap());

        assert!(!cursor.skip_to_document(DocId::new(5)).unwrap());
        assert!(cursor.skip_to_document(DocId::new(1)).unwrap());
        assert_eq!(cursor.current_node_id(), Some(NodeId::new(2)));
    }

    #[test]
    fn test_reset_to_node() {
        let mut cursor = cursor();
        assert!(cursor.reset_to_node(NodeId::new(0)).is_err());

        cursor.skip_to_document(DocId::new(0)).unwrap();
        assert!(cursor.reset_to_node(NodeId::new(4)).unwrap());
        assert_eq!(cursor.current_node_id(), Some(NodeId::new(9)));
        assert!(!cursor.reset_to_node(NodeId::new(10)).unwrap());
        assert!(cursor.reset_to_node(NodeId::new(0)).unwrap());
        assert_eq!(cursor.current_node_id(), Some(NodeId::new(3)));
    }

    #[test]
    fn test_closest_enclosing_text_node() {
        let mut cursor = cursor();
        let doc = DocId::new(0);
        cursor.skip_to_document(doc).unwrap();

        let backward = cursor.closest_enclosing_text_node(doc, NodeId::new(8), false).unwrap();
        assert_eq!(backward, Some(NodeId::new(3)));
        assert_eq!(cursor.current_node_id(), Some(NodeId::new(3)));

        let forward = cursor.closest_enclosing_text_node(doc, NodeId::new(4), true).unwrap();
        assert_eq!(forward, Some(NodeId::new(9)));
        let forward = cursor.closest_enclosing_text_node(doc, NodeId::new(9), true).unwrap();
        assert_eq!(forward, Some(NodeId::new(9)));
        let forward = cursor.closest_enclosing_text_node(doc, NodeId::new(10), true).unwrap();
        assert_eq!(forward, None);

        assert!(
            cursor
                .closest_enclosing_text_node(DocId::new(1), NodeId::new(0), true)
                .is_err()
        );
    }
}
