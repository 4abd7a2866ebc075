//! In-memory store of indexed documents.

use std::sync::Arc;

use rayon::prelude::*;

use crate::analysis::token::Token;
use crate::analysis::tokenizer::{Tokenizer, UnicodeWordTokenizer};
use crate::error::Result;
use crate::highlight::Highlighter;
use crate::index::{PostingIndex, TermPostingIndex};
use crate::tree::{DocId, MemoryTree, NodeId, NodeKind, NodeTree};

/// Holds documents together with a positional index of their text nodes.
///
/// Documents handed out by [`IndexedStore::document`] expose the index, so
/// highlighting over them runs in index-accelerated mode.
pub struct IndexedStore {
    tokenizer: Arc<dyn Tokenizer>,
    documents: Vec<MemoryTree>,
    index: TermPostingIndex,
}

impl std::fmt::Debug for IndexedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedStore")
            .field("tokenizer", &self.tokenizer.name())
            .field("documents", &self.documents.len())
            .field("terms", &self.index.term_count())
            .finish()
    }
}

impl Default for IndexedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexedStore {
    /// Create a store that indexes with Unicode word segmentation.
    pub fn new() -> Self {
        Self::with_tokenizer(Arc::new(UnicodeWordTokenizer::new()))
    }

    /// Create a store that indexes with the given tokenizer.
    pub fn with_tokenizer(tokenizer: Arc<dyn Tokenizer>) -> Self {
        IndexedStore {
            index: TermPostingIndex::new(tokenizer.name()),
            tokenizer,
            documents: Vec::new(),
        }
    }

    /// Add a document and index its text nodes. Returns the assigned id.
    pub fn insert(&mut self, mut tree: MemoryTree) -> Result<DocId> {
        let doc = DocId::new(self.documents.len() as u32);
        tree.set_doc_id(doc);

        let mut nodes = Vec::new();
        for node in tree.text_nodes() {
            let tokens: Vec<Token> = self
                .tokenizer
                .tokenize(tree.value(node)?)
                .map_err(|e| e.at_node(doc, node))?
                .collect();
            nodes.push((node, tokens));
        }

        self.index.add_document();
        for (node, tokens) in &nodes {
            self.index.add_node(doc, *node, tokens);
        }
        log::debug!("indexed document {doc} ({} text nodes)", nodes.len());

        self.documents.push(tree);
        Ok(doc)
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The term index.
    pub fn index(&self) -> &TermPostingIndex {
        &self.index
    }

    /// A stored document, exposing the index.
    pub fn document(&self, doc: DocId) -> Option<IndexedDocument<'_>> {
        let tree = self.documents.get(doc.get() as usize)?;
        Some(IndexedDocument {
            tree,
            index: &self.index,
        })
    }

    /// Score every document against a query, best first.
    ///
    /// The query is resolved against the index once, then documents are
    /// scored in parallel, each by its own traversal. Equal scores are ordered
    /// by document id.
    pub fn rank(&self, highlighter: &Highlighter) -> Result<Vec<(DocId, f64)>> {
        if highlighter.tokenizer().name() == self.index.tokenizer_name() {
            highlighter.resolve(&self.index)?;
        }
        let mut ranked = (0..self.documents.len())
            .into_par_iter()
            .map(|i| {
                let id = DocId::new(i as u32);
                let document = IndexedDocument {
                    tree: &self.documents[i],
                    index: &self.index,
                };
                match document.root() {
                    Some(root) => highlighter.score(&document, root).map(|score| (id, score)),
                    None => Ok((id, 0.0)),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        Ok(ranked)
    }
}

/// A document of an [`IndexedStore`].
#[derive(Debug, Clone, Copy)]
pub struct IndexedDocument<'a> {
    tree: &'a MemoryTree,
    index: &'a TermPostingIndex,
}

impl<'a> IndexedDocument<'a> {
    /// The underlying tree.
    pub fn tree(&self) -> &'a MemoryTree {
        self.tree
    }
}

impl NodeTree for IndexedDocument<'_> {
    fn doc_id(&self) -> DocId {
        self.tree.doc_id()
    }

    fn root(&self) -> Option<NodeId> {
        self.tree.root()
    }

    fn kind(&self, node: NodeId) -> Result<NodeKind> {
        self.tree.kind(node)
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.tree.first_child(node)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.tree.next_sibling(node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.parent(node)
    }

    fn name(&self, node: NodeId) -> Result<&str> {
        self.tree.name(node)
    }

    fn value(&self, node: NodeId) -> Result<&str> {
        self.tree.value(node)
    }

    fn attributes(&self, node: NodeId) -> Result<&[NodeId]> {
        self.tree.attributes(node)
    }

    fn posting_index(&self) -> Option<&dyn PostingIndex> {
        Some(self.index)
    }
}
