//! Fluent construction of [`MemoryTree`]s.

use crate::error::{FtError, Result};
use crate::tree::memory::NodeData;
use crate::tree::{DocId, MemoryTree, NodeId, NodeKind};

#[derive(Debug)]
struct Frame {
    node: NodeId,
    last_child: Option<NodeId>,
}

/// Builds a [`MemoryTree`] in document order.
///
/// Every method consumes and returns the builder. The first misuse is
/// remembered and reported by [`TreeBuilder::build`]; later calls are ignored.
///
/// ```
/// use xmlft::tree::{DocId, NodeTree, TreeBuilder};
///
/// let tree = TreeBuilder::document(DocId::new(0))
///     .element("p")
///     .text("the quick brown fox")
///     .end()
///     .build()
///     .unwrap();
/// assert_eq!(tree.len(), 3);
/// assert!(tree.root().is_some());
/// ```
#[derive(Debug)]
pub struct TreeBuilder {
    doc_id: DocId,
    nodes: Vec<NodeData>,
    frames: Vec<Frame>,
    error: Option<FtError>,
}

impl TreeBuilder {
    /// Start a tree rooted at a document node.
    pub fn document(doc_id: DocId) -> Self {
        let mut builder = TreeBuilder {
            doc_id,
            nodes: Vec::new(),
            frames: Vec::new(),
            error: None,
        };
        builder.nodes.push(NodeData::new(NodeKind::Document, None));
        builder.frames.push(Frame {
            node: NodeId::new(0),
            last_child: None,
        });
        builder
    }

    /// Start a tree whose root is the first node added, with no document node.
    pub fn fragment(doc_id: DocId) -> Self {
        TreeBuilder {
            doc_id,
            nodes: Vec::new(),
            frames: Vec::new(),
            error: None,
        }
    }

    /// Open an element; close it with [`TreeBuilder::end`].
    pub fn element(mut self, name: &str) -> Self {
        if let Some(id) = self.push_child(NodeKind::Element, Some(name), None) {
            self.frames.push(Frame {
                node: id,
                last_child: None,
            });
        }
        self
    }

    /// Add an attribute to the element just opened.
    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        if self.frames.is_empty() && self.nodes.is_empty() {
            let mut data = NodeData::new(NodeKind::Attribute, None);
            data.name = Some(name.to_string());
            data.value = Some(value.to_string());
            self.nodes.push(data);
            return self;
        }
        let Some(frame) = self.frames.last() else {
            return self.fail(format!("attribute {name:?} outside of an element"));
        };
        let owner = frame.node;
        if self.nodes[owner.index()].kind != NodeKind::Element || frame.last_child.is_some() {
            return self.fail(format!("attribute {name:?} must follow its element start"));
        }
        let id = self.next_id();
        let mut data = NodeData::new(NodeKind::Attribute, Some(owner));
        data.name = Some(name.to_string());
        data.value = Some(value.to_string());
        self.nodes.push(data);
        self.nodes[owner.index()].attributes.push(id);
        self
    }

    /// Add character data. Adjacent text is merged and empty text is dropped.
    pub fn text(mut self, value: &str) -> Self {
        if self.error.is_some() || value.is_empty() {
            return self;
        }
        if let Some(last) = self.frames.last().and_then(|frame| frame.last_child) {
            let data = &mut self.nodes[last.index()];
            if data.kind == NodeKind::Text {
                if let Some(existing) = data.value.as_mut() {
                    existing.push_str(value);
                }
                return self;
            }
        }
        self.push_child(NodeKind::Text, None, Some(value));
        self
    }

    /// Add a comment.
    pub fn comment(mut self, value: &str) -> Self {
        self.push_child(NodeKind::Comment, None, Some(value));
        self
    }

    /// Add a processing instruction.
    pub fn pi(mut self, target: &str, data: &str) -> Self {
        self.push_child(NodeKind::ProcessingInstruction, Some(target), Some(data));
        self
    }

    /// Close the innermost open element.
    pub fn end(mut self) -> Self {
        if self.error.is_some() {
            return self;
        }
        let open = self
            .frames
            .last()
            .is_some_and(|frame| self.nodes[frame.node.index()].kind == NodeKind::Element);
        if !open {
            return self.fail("end() without an open element");
        }
        self.frames.pop();
        self
    }

    /// Finish the tree.
    pub fn build(self) -> Result<MemoryTree> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if let Some(frame) = self.frames.last() {
            let data = &self.nodes[frame.node.index()];
            if data.kind == NodeKind::Element {
                return Err(FtError::contract(format!(
                    "element {:?} was never closed",
                    data.name.as_deref().unwrap_or_default()
                )));
            }
        }
        log::trace!("built document {} with {} nodes", self.doc_id, self.nodes.len());
        Ok(MemoryTree::from_nodes(self.doc_id, self.nodes))
    }

    fn next_id(&self) -> NodeId {
        NodeId::new(self.nodes.len() as u32)
    }

    fn fail<S: Into<String>>(mut self, message: S) -> Self {
        self.error = Some(FtError::contract(message));
        self
    }

    fn push_child(
        &mut self,
        kind: NodeKind,
        name: Option<&str>,
        value: Option<&str>,
    ) -> Option<NodeId> {
        if self.error.is_some() {
            return None;
        }
        let id = self.next_id();
        let parent = match self.frames.last_mut() {
            Some(frame) => {
                let parent = frame.node;
                match frame.last_child.replace(id) {
                    Some(previous) => self.nodes[previous.index()].next_sibling = Some(id),
                    None => self.nodes[parent.index()].first_child = Some(id),
                }
                Some(parent)
            }
            None if self.nodes.is_empty() => None,
            None => {
                self.error = Some(FtError::contract("a fragment has a single root node"));
                return None;
            }
        };
        let mut data = NodeData::new(kind, parent);
        data.name = name.map(str::to_string);
        data.value = value.map(str::to_string);
        self.nodes.push(data);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeTree;

    #[test]
    fn test_ids_follow_document_order() {
        let tree = TreeBuilder::document(DocId::new(0))
            .element("a")
            .attribute("x", "1")
            .element("b")
            .text("one")
            .end()
            .text("two")
            .end()
            .build()
            .unwrap();

        let kinds: Vec<NodeKind> = (0..tree.len())
            .map(|i| tree.kind(NodeId::new(i as u32)).unwrap())
            .collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Document,
                NodeKind::Element,
                NodeKind::Attribute,
                NodeKind::Element,
                NodeKind::Text,
                NodeKind::Text,
            ]
        );
    }

    #[test]
    fn test_adjacent_text_is_merged() {
        let tree = TreeBuilder::document(DocId::new(0))
            .element("p")
            .text("quick ")
            .text("")
            .text("fox")
            .end()
            .build()
            .unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.value(NodeId::new(2)).unwrap(), "quick fox");
    }

    #[test]
    fn test_fragment_roots() {
        let tree = TreeBuilder::fragment(DocId::new(2)).text("loose").build().unwrap();
        assert_eq!(tree.root(), Some(NodeId::new(0)));
        assert_eq!(tree.kind(NodeId::new(0)).unwrap(), NodeKind::Text);

        let tree = TreeBuilder::fragment(DocId::new(2))
            .attribute("title", "a fox")
            .build()
            .unwrap();
        assert_eq!(tree.kind(NodeId::new(0)).unwrap(), NodeKind::Attribute);

        assert!(TreeBuilder::fragment(DocId::new(2)).build().unwrap().is_empty());
        assert!(
            TreeBuilder::fragment(DocId::new(2))
                .text("a")
                .comment("b")
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_misuse_is_reported_on_build() {
        assert!(TreeBuilder::document(DocId::new(0)).end().build().is_err());
        assert!(TreeBuilder::document(DocId::new(0)).element("p").build().is_err());
        assert!(
            TreeBuilder::document(DocId::new(0))
                .element("p")
                .text("x")
                .attribute("late", "1")
                .end()
                .build()
                .is_err()
        );
    }
}
