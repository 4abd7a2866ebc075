//! Arena-backed in-memory node tree.

use crate::error::{FtError, Result};
use crate::tree::{DocId, NodeId, NodeKind, NodeTree, unknown_node};

/// One node of a [`MemoryTree`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    pub(crate) name: Option<String>,
    pub(crate) value: Option<String>,
    pub(crate) attributes: Vec<NodeId>,
}

impl NodeData {
    pub(crate) fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        NodeData {
            kind,
            parent,
            first_child: None,
            next_sibling: None,
            name: None,
            value: None,
            attributes: Vec::new(),
        }
    }
}

/// A document held in memory. Node ids are arena indices in document order.
///
/// Build one with [`TreeBuilder`](crate::tree::TreeBuilder).
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTree {
    doc_id: DocId,
    nodes: Vec<NodeData>,
}

impl MemoryTree {
    pub(crate) fn from_nodes(doc_id: DocId, nodes: Vec<NodeData>) -> Self {
        MemoryTree { doc_id, nodes }
    }

    pub(crate) fn set_doc_id(&mut self, doc_id: DocId) {
        self.doc_id = doc_id;
    }

    /// Number of nodes, attributes included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of all text nodes, in document order.
    pub fn text_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, data)| data.kind == NodeKind::Text)
            .map(|(i, _)| NodeId::new(i as u32))
    }

    fn data(&self, node: NodeId) -> Result<&NodeData> {
        self.nodes.get(node.index()).ok_or_else(|| unknown_node(node))
    }
}

impl NodeTree for MemoryTree {
    fn doc_id(&self) -> DocId {
        self.doc_id
    }

    fn root(&self) -> Option<NodeId> {
        (!self.nodes.is_empty()).then_some(NodeId::new(0))
    }

    fn kind(&self, node: NodeId) -> Result<NodeKind> {
        Ok(self.data(node)?.kind)
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.index())?.first_child
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.index())?.next_sibling
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.index())?.parent
    }

    fn name(&self, node: NodeId) -> Result<&str> {
        self.data(node)?
            .name
            .as_deref()
            .ok_or(FtError::no_such_property(node, "name"))
    }

    fn value(&self, node: NodeId) -> Result<&str> {
        self.data(node)?
            .value
            .as_deref()
            .ok_or(FtError::no_such_property(node, "value"))
    }

    fn attributes(&self, node: NodeId) -> Result<&[NodeId]> {
        let data = self.data(node)?;
        if data.kind != NodeKind::Element {
            return Err(FtError::no_such_property(node, "attributes"));
        }
        Ok(&data.attributes)
    }
}
