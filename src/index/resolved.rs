//! Queries resolved against an index dictionary.

use std::sync::Arc;

use crate::index::HitCursor;
use crate::tree::{DocId, NodeId};

/// The hit-bearing text nodes and inverse document frequencies of one query
/// over one index.
///
/// Cloning is cheap; clones and the cursors opened from them share the hit
/// list.
#[derive(Debug, Clone)]
pub struct ResolvedQuery {
    hits: Arc<[(DocId, NodeId)]>,
    idf: Arc<[f64]>,
}

impl ResolvedQuery {
    /// Create a resolved query; hits are sorted and deduplicated here.
    pub fn new(mut hits: Vec<(DocId, NodeId)>, idf: Vec<f64>) -> Self {
        hits.sort_unstable();
        hits.dedup();
        ResolvedQuery {
            hits: hits.into(),
            idf: idf.into(),
        }
    }

    /// Combine per-term hit lists, deriving each term's inverse document
    /// frequency from the documents its list covers.
    ///
    /// A term without hits gets an inverse document frequency of 1.
    pub fn from_term_hits(term_hits: Vec<Vec<(DocId, NodeId)>>, doc_count: u64) -> Self {
        let idf = term_hits
            .iter()
            .map(|nodes| {
                let mut docs: Vec<DocId> = nodes.iter().map(|(doc, _)| *doc).collect();
                docs.sort_unstable();
                docs.dedup();
                if docs.is_empty() {
                    1.0
                } else {
                    doc_count as f64 / docs.len() as f64
                }
            })
            .collect();
        Self::new(term_hits.into_iter().flatten().collect(), idf)
    }

    /// Number of hit-bearing nodes over all documents.
    pub fn hit_count(&self) -> usize {
        self.hits.len()
    }

    /// The hit-bearing nodes of one document, in node order.
    pub fn document_hits(&self, doc: DocId) -> &[(DocId, NodeId)] {
        let start = self.hits.partition_point(|(d, _)| *d < doc);
        let end = start + self.hits[start..].partition_point(|(d, _)| *d == doc);
        &self.hits[start..end]
    }

    /// Inverse document frequency of every term, in rank order.
    pub fn inverse_document_frequencies(&self) -> &[f64] {
        &self.idf
    }

    /// Open a cursor over the shared hit list.
    pub fn cursor(&self) -> HitCursor {
        HitCursor::shared(self.hits.clone())
    }

    /// Whether both share one hit list.
    pub fn shares_hits_with(&self, other: &ResolvedQuery) -> bool {
        Arc::ptr_eq(&self.hits, &other.hits)
    }
}
