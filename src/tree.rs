//! Tree-shaped XML content and the navigation capability the highlighter walks.
//!
//! Nodes are addressed by opaque [`NodeId`]s that are unique within one
//! document and increase in document order. A [`NodeTree`] gives access to one
//! document: its root, the kind of each node, and first-child / next-sibling /
//! parent navigation. Attributes are reachable through
//! [`NodeTree::attributes`] but are not part of the child chain.
//!
//! Sources backed by an index also expose a
//! [`PostingIndex`](crate::index::PostingIndex), which makes the highlighter
//! skip text nodes that contain no query term.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FtError, Result};
use crate::index::PostingIndex;

pub mod builder;
pub mod memory;

pub use builder::TreeBuilder;
pub use memory::MemoryTree;

/// Identity of a node within its document; ids grow in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(id: u32) -> Self {
        NodeId(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a document within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocId(u32);

impl DocId {
    pub const fn new(id: u32) -> Self {
        DocId(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Document,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

impl NodeKind {
    /// Whether nodes of this kind have a name.
    pub fn has_name(self) -> bool {
        matches!(
            self,
            NodeKind::Element | NodeKind::Attribute | NodeKind::ProcessingInstruction
        )
    }

    /// Whether nodes of this kind carry a string value of their own.
    pub fn has_value(self) -> bool {
        matches!(
            self,
            NodeKind::Attribute
                | NodeKind::Text
                | NodeKind::Comment
                | NodeKind::ProcessingInstruction
        )
    }
}

/// A materialized copy of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub name: Option<String>,
    pub value: Option<String>,
}

/// Navigation over the nodes of one document.
pub trait NodeTree: Send + Sync {
    /// The document this tree belongs to.
    fn doc_id(&self) -> DocId;

    /// The outermost node, or `None` for an empty tree.
    fn root(&self) -> Option<NodeId>;

    /// The kind of a node; unknown ids are a contract violation.
    fn kind(&self, node: NodeId) -> Result<NodeKind>;

    /// First child in document order (attributes excluded).
    fn first_child(&self, node: NodeId) -> Option<NodeId>;

    /// Next sibling in document order (attributes excluded).
    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;

    /// Parent node; attributes report their owner element.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Name of an element, attribute or processing instruction.
    fn name(&self, node: NodeId) -> Result<&str>;

    /// String value of a text, comment, attribute or processing instruction.
    fn value(&self, node: NodeId) -> Result<&str>;

    /// Attributes of an element, in document order.
    fn attributes(&self, node: NodeId) -> Result<&[NodeId]>;

    /// The posting index covering this document, if it is indexed.
    fn posting_index(&self) -> Option<&dyn PostingIndex> {
        None
    }

    /// Materialize a node.
    fn node(&self, node: NodeId) -> Result<Node> {
        let kind = self.kind(node)?;
        let name = if kind.has_name() {
            Some(self.name(node)?.to_string())
        } else {
            None
        };
        let value = if kind.has_value() {
            Some(self.value(node)?.to_string())
        } else {
            None
        };
        Ok(Node {
            id: node,
            kind,
            name,
            value,
        })
    }
}

pub(crate) fn unknown_node(node: NodeId) -> FtError {
    FtError::contract(format!("unknown node id {node}"))
}
