//! Positional postings keyed by raw token text.
//!
//! Tokens are stored exactly as the tokenizer produced them. Case folding,
//! diacritics and stemming depend on the query's match options, so they are
//! applied to the dictionary when a query is resolved rather than at index time.

use ahash::AHashMap;

use crate::analysis::token::Token;
use crate::error::Result;
use crate::index::{PostingIndex, ResolvedQuery, next_generation};
use crate::query::matcher::{NormalizedToken, TermMatcher};
use crate::tree::{DocId, NodeId};

/// Occurrences of one token in one text node.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    /// Document holding the node.
    pub doc: DocId,
    /// Text node the token occurs in.
    pub node: NodeId,
    /// Word positions of the token within the node.
    pub positions: Vec<u32>,
}

impl Posting {
    /// Create a posting with a single position.
    pub fn new(doc: DocId, node: NodeId, position: u32) -> Self {
        Posting {
            doc,
            node,
            positions: vec![position],
        }
    }

    /// Term frequency in the node.
    pub fn frequency(&self) -> u32 {
        self.positions.len() as u32
    }

    fn key(&self) -> (DocId, NodeId) {
        (self.doc, self.node)
    }
}

/// The postings of one token, ordered by `(doc, node)`.
#[derive(Debug, Clone)]
pub struct PostingList {
    /// The token this list represents.
    pub term: String,
    /// The postings in this list.
    pub postings: Vec<Posting>,
    /// Total number of occurrences.
    pub total_frequency: u64,
    /// Number of documents containing the token.
    pub doc_frequency: u64,
}

impl PostingList {
    /// Create a new empty posting list.
    pub fn new(term: String) -> Self {
        PostingList {
            term,
            postings: Vec::new(),
            total_frequency: 0,
            doc_frequency: 0,
        }
    }

    /// Record one occurrence, merging with the node's posting if present.
    pub fn add_occurrence(&mut self, doc: DocId, node: NodeId, position: u32) {
        self.total_frequency += 1;

        match self
            .postings
            .binary_search_by_key(&(doc, node), Posting::key)
        {
            Ok(pos) => self.postings[pos].positions.push(position),
            Err(pos) => {
                let new_doc = pos == 0 || self.postings[pos - 1].doc != doc;
                let next_same_doc = self.postings.get(pos).is_some_and(|p| p.doc == doc);
                if new_doc && !next_same_doc {
                    self.doc_frequency += 1;
                }
                self.postings.insert(pos, Posting::new(doc, node, position));
            }
        }
    }

    /// Get the length of the posting list.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// Check if the posting list is empty.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Get an iterator over the postings.
    pub fn iter(&self) -> std::slice::Iter<'_, Posting> {
        self.postings.iter()
    }
}

/// In-memory positional index over the text nodes of several documents.
#[derive(Debug, Clone)]
pub struct TermPostingIndex {
    tokenizer_name: String,
    terms: AHashMap<String, PostingList>,
    /// Token texts of every indexed node, for multi-token matches.
    node_tokens: AHashMap<(DocId, NodeId), Vec<String>>,
    doc_count: u64,
    generation: u64,
}

impl TermPostingIndex {
    /// Create an empty index for text tokenized by the named tokenizer.
    pub fn new<S: Into<String>>(tokenizer_name: S) -> Self {
        TermPostingIndex {
            tokenizer_name: tokenizer_name.into(),
            terms: AHashMap::new(),
            node_tokens: AHashMap::new(),
            doc_count: 0,
            generation: next_generation(),
        }
    }

    /// Count a new document.
    pub fn add_document(&mut self) {
        self.doc_count += 1;
        self.generation = next_generation();
    }

    /// Index the tokens of one text node.
    pub fn add_node(&mut self, doc: DocId, node: NodeId, tokens: &[Token]) {
        self.generation = next_generation();
        for (position, token) in tokens.iter().enumerate() {
            self.terms
                .entry(token.text.clone())
                .or_insert_with(|| PostingList::new(token.text.clone()))
                .add_occurrence(doc, node, position as u32);
        }
        if !tokens.is_empty() {
            self.node_tokens
                .insert((doc, node), tokens.iter().map(|t| t.text.clone()).collect());
        }
    }

    /// Get the posting list of a raw token.
    pub fn get_posting_list(&self, term: &str) -> Option<&PostingList> {
        self.terms.get(term)
    }

    /// Number of indexed documents.
    pub fn doc_count(&self) -> u64 {
        self.doc_count
    }

    /// Number of distinct tokens.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Nodes holding a hit of each term, in rank order; every list is sorted
    /// and free of duplicates.
    pub fn term_hits(&self, matcher: &TermMatcher) -> Vec<Vec<(DocId, NodeId)>> {
        let dictionary: Vec<(&PostingList, NormalizedToken)> = self
            .terms
            .values()
            .map(|list| (list, matcher.normalize(&list.term)))
            .collect();

        (0..matcher.len())
            .map(|rank| {
                let len = matcher.term_len(rank);
                let mut nodes = Vec::new();
                if len == 0 {
                    return nodes;
                }
                for (list, token) in &dictionary {
                    if !matcher.matches_token(rank, 0, token) {
                        continue;
                    }
                    for posting in list.iter() {
                        if len == 1 || self.has_sequence(matcher, rank, posting) {
                            nodes.push(posting.key());
                        }
                    }
                }
                nodes.sort_unstable();
                nodes.dedup();
                nodes
            })
            .collect()
    }

    /// Whether the whole multi-token term follows one of the posting's positions.
    fn has_sequence(&self, matcher: &TermMatcher, rank: usize, posting: &Posting) -> bool {
        let Some(tokens) = self.node_tokens.get(&posting.key()) else {
            return false;
        };
        let len = matcher.term_len(rank);
        posting.positions.iter().any(|&start| {
            let start = start as usize;
            start + len <= tokens.len()
                && (1..len).all(|j| {
                    matcher.matches_token(rank, j, &matcher.normalize(&tokens[start + j]))
                })
        })
    }
}

impl PostingIndex for TermPostingIndex {
    fn tokenizer_name(&self) -> &str {
        &self.tokenizer_name
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn resolve(&self, matcher: &TermMatcher) -> Result<ResolvedQuery> {
        let resolved = ResolvedQuery::from_term_hits(self.term_hits(matcher), self.doc_count);
        log::debug!(
            "resolved {} terms against {} tokens: {} hit-bearing nodes",
            matcher.len(),
            self.terms.len(),
            resolved.hit_count()
        );
        Ok(resolved)
    }
}
