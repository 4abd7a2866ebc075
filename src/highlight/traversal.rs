//! The highlighting traversal automaton.
//!
//! A [`Traversal`] walks the subtree of a start node in document order and
//! reports one [`Event`] per [`advance`](Traversal::advance). Text nodes are
//! not reported whole: each is segmented into plain and term spans, and every
//! span becomes its own `Text` or `Term` event.
//!
//! Hits are found in one of two ways, chosen once by
//! [`start`](Traversal::start):
//!
//! * [`Mode::Generic`] tokenizes every text node and matches the query terms.
//! * [`Mode::Indexed`] follows a posting cursor of the document's index and
//!   only tokenizes the text nodes the cursor cites. Other nodes become a
//!   single plain span without being tokenized.
//!
//! Both modes produce the same events and spans.

use std::fmt;
use std::vec;

use log::{debug, error, trace, warn};

use crate::error::{FtError, Result};
use crate::highlight::event::Event;
use crate::highlight::segment::Segmenter;
use crate::highlight::span::{TermHit, TextSpan};
use crate::highlight::{HighlightMode, Highlighter};
use crate::index::PostingCursor;
use crate::tree::{Node, NodeId, NodeKind, NodeTree};

/// How a traversal locates term hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Tokenize every text node.
    Generic,
    /// Tokenize only the text nodes a posting cursor cites.
    Indexed,
}

enum HitSource<'a> {
    Tokenize,
    Cursor(Box<dyn PostingCursor + 'a>),
}

/// What the automaton does on the next advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Enter(NodeId),
    Spans(NodeId),
    Leave(NodeId),
    Done,
}

/// A pull-based, restartable walk over a subtree.
///
/// Created by [`Highlighter::traverse`]. Errors are terminal: once
/// [`advance`](Self::advance) has failed, it reports [`Event::End`] until the
/// traversal is started again.
pub struct Traversal<'a> {
    highlighter: &'a Highlighter,
    tree: &'a dyn NodeTree,
    source: HitSource<'a>,
    root: Option<NodeId>,
    step: Step,
    node: Option<NodeId>,
    event: Event,
    /// Value of the current text-bearing node.
    text: &'a str,
    segmenter: Option<Segmenter<vec::IntoIter<TermHit>>>,
    span: Option<TextSpan>,
    exhausted: bool,
}

impl fmt::Debug for Traversal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traversal")
            .field("doc", &self.tree.doc_id())
            .field("mode", &self.mode())
            .field("root", &self.root)
            .field("node", &self.node)
            .field("event", &self.event)
            .field("span", &self.span)
            .finish()
    }
}

impl<'a> Traversal<'a> {
    pub(crate) fn new(highlighter: &'a Highlighter, tree: &'a dyn NodeTree) -> Self {
        Traversal {
            highlighter,
            tree,
            source: HitSource::Tokenize,
            root: None,
            step: Step::Done,
            node: None,
            event: Event::Start,
            text: "",
            segmenter: None,
            span: None,
            exhausted: false,
        }
    }

    /// (Re)start the walk at `node`; `None` walks nothing.
    ///
    /// Discards all previous state, including the posting cursor, and selects
    /// the hit source for the whole walk.
    pub fn start(&mut self, node: Option<NodeId>) -> Result<()> {
        self.source = HitSource::Tokenize;
        self.root = node;
        self.step = Step::Done;
        self.node = None;
        self.event = Event::Start;
        self.text = "";
        self.segmenter = None;
        self.span = None;
        self.exhausted = false;

        let Some(root) = node else {
            debug!("nothing to traverse in document {}", self.tree.doc_id());
            return Ok(());
        };
        self.tree.kind(root)?;
        self.source = self.select_source(root)?;
        debug!(
            "starting {:?} traversal of document {} at node {root}",
            self.mode(),
            self.tree.doc_id()
        );
        self.step = Step::Enter(root);
        Ok(())
    }

    fn select_source(&self, root: NodeId) -> Result<HitSource<'a>> {
        let highlighter = self.highlighter;
        let tree = self.tree;
        if highlighter.config().mode == HighlightMode::Generic {
            return Ok(HitSource::Tokenize);
        }
        let Some(index) = tree.posting_index() else {
            return Ok(HitSource::Tokenize);
        };
        let doc = tree.doc_id();
        if index.tokenizer_name() != highlighter.tokenizer().name() {
            warn!(
                "index of document {doc} was built with tokenizer {:?} but the query uses {:?}; tokenizing every text node",
                index.tokenizer_name(),
                highlighter.tokenizer().name()
            );
            return Ok(HitSource::Tokenize);
        }

        let resolved = highlighter.resolve(index).map_err(|e| e.at_node(doc, root))?;
        let mut cursor: Box<dyn PostingCursor + 'a> = Box::new(resolved.cursor());
        let positioned = cursor
            .skip_to_document(doc)
            .and_then(|found| if found { cursor.reset_to_node(root) } else { Ok(false) })
            .map_err(|e| e.at_node(doc, root))?;
        trace!("posting cursor for document {doc} positioned: {positioned}");
        Ok(HitSource::Cursor(cursor))
    }

    /// The hit source selected by the last [`start`](Self::start).
    pub fn mode(&self) -> Mode {
        match self.source {
            HitSource::Tokenize => Mode::Generic,
            HitSource::Cursor(_) => Mode::Indexed,
        }
    }

    /// Move to the next event.
    pub fn advance(&mut self) -> Result<Event> {
        match self.next_event() {
            Ok(event) => Ok(event),
            Err(e) => {
                self.step = Step::Done;
                self.segmenter = None;
                self.span = None;
                self.node = None;
                self.text = "";
                self.event = Event::End;
                Err(e)
            }
        }
    }

    fn next_event(&mut self) -> Result<Event> {
        self.span = None;
        loop {
            match self.step {
                Step::Enter(node) => {
                    self.node = Some(node);
                    self.text = "";
                    match self.tree.kind(node)? {
                        NodeKind::Document => {
                            self.step = self.descend(node);
                            return Ok(self.emit(Event::DocumentStart));
                        }
                        NodeKind::Element => {
                            self.step = self.descend(node);
                            return Ok(self.emit(Event::ElementStart));
                        }
                        NodeKind::Text | NodeKind::Attribute => {
                            self.begin_text(node)?;
                            self.step = Step::Spans(node);
                        }
                        NodeKind::Comment => {
                            self.text = self.tree.value(node)?;
                            self.step = self.after(node);
                            return Ok(self.emit(Event::Comment));
                        }
                        NodeKind::ProcessingInstruction => {
                            self.text = self.tree.value(node)?;
                            self.step = self.after(node);
                            return Ok(self.emit(Event::ProcessingInstruction));
                        }
                    }
                }
                Step::Spans(node) => match self.segmenter.as_mut().and_then(Iterator::next) {
                    Some(span) => {
                        let span = span.map_err(|e| e.at_node(self.tree.doc_id(), node))?;
                        let event = if span.is_term() { Event::Term } else { Event::Text };
                        self.span = Some(span);
                        return Ok(self.emit(event));
                    }
                    None => {
                        self.segmenter = None;
                        self.step = self.after(node);
                    }
                },
                Step::Leave(node) => {
                    self.node = Some(node);
                    self.text = "";
                    let event = match self.tree.kind(node)? {
                        NodeKind::Document => Event::DocumentEnd,
                        _ => Event::ElementEnd,
                    };
                    self.step = self.after(node);
                    return Ok(self.emit(event));
                }
                Step::Done => {
                    self.node = None;
                    self.text = "";
                    return Ok(self.emit(Event::End));
                }
            }
        }
    }

    fn emit(&mut self, event: Event) -> Event {
        self.event = event;
        event
    }

    fn descend(&self, node: NodeId) -> Step {
        match self.tree.first_child(node) {
            Some(child) => Step::Enter(child),
            None => Step::Leave(node),
        }
    }

    fn after(&self, node: NodeId) -> Step {
        if self.root == Some(node) {
            return Step::Done;
        }
        if let Some(sibling) = self.tree.next_sibling(node) {
            return Step::Enter(sibling);
        }
        match self.tree.parent(node) {
            Some(parent) => Step::Leave(parent),
            None => Step::Done,
        }
    }

    /// Find the hits of a text-bearing node and set up its segmentation.
    fn begin_text(&mut self, node: NodeId) -> Result<()> {
        let tree = self.tree;
        let matcher = self.highlighter.matcher();
        let doc = tree.doc_id();
        let text = tree.value(node)?;
        let is_text = tree.kind(node)? == NodeKind::Text;

        let hits = match &mut self.source {
            HitSource::Cursor(cursor) if is_text => {
                let cited = cursor
                    .closest_enclosing_text_node(doc, node, true)
                    .map_err(|e| e.at_node(doc, node))?;
                if cited == Some(node) {
                    let hits = matcher.find_hits(text).map_err(|e| e.at_node(doc, node))?;
                    if hits.is_empty() {
                        error!("posting cursor cites node {node} of document {doc}, which holds no hit");
                        return Err(FtError::IndexDivergence { doc, node });
                    }
                    cursor.next_hit().map_err(|e| e.at_node(doc, node))?;
                    hits
                } else {
                    Vec::new()
                }
            }
            _ => matcher.find_hits(text).map_err(|e| e.at_node(doc, node))?,
        };

        trace!("segmenting node {node} of document {doc}: {} hits", hits.len());
        self.text = text;
        self.segmenter = Some(Segmenter::new(text.len(), hits.into_iter()));
        Ok(())
    }

    /// The event reported by the last advance.
    pub fn event(&self) -> Event {
        self.event
    }

    /// The node of the current event.
    pub fn current_node_id(&self) -> Option<NodeId> {
        match self.event {
            Event::Start | Event::End => None,
            _ => self.node,
        }
    }

    /// Materialize the node of the current event.
    pub fn current_node(&self) -> Result<Option<Node>> {
        self.current_node_id()
            .map(|node| self.tree.node(node))
            .transpose()
    }

    /// The current span for text and term events.
    pub fn current_span(&self) -> Option<&TextSpan> {
        self.span.as_ref()
    }

    /// Text of the current span, comment or processing instruction.
    pub fn current_text(&self) -> Option<&'a str> {
        match self.event {
            Event::Text | Event::Term => self.span.as_ref().map(|span| span.text(self.text)),
            Event::Comment | Event::ProcessingInstruction => Some(self.text),
            _ => None,
        }
    }

    /// Byte length of [`current_text`](Self::current_text), 0 when there is none.
    pub fn current_text_length(&self) -> usize {
        self.current_text().map_or(0, str::len)
    }

    /// Rank of the matched query term on term events.
    pub fn matched_term_position(&self) -> Option<usize> {
        match self.event {
            Event::Term => self.span.as_ref().and_then(|span| span.rank),
            _ => None,
        }
    }

    /// Number of words in the current span; 0 outside text and term events.
    ///
    /// Spans whose count is not known from hit positions are tokenized on the
    /// first call and the result is kept for the rest of the event.
    pub fn enclosed_word_count(&mut self) -> Result<usize> {
        let Some(span) = self.span.as_mut() else {
            return Ok(0);
        };
        if let Some(words) = span.words {
            return Ok(words);
        }
        let words = self
            .highlighter
            .tokenizer()
            .count_words(span.text(self.text))
            .map_err(|e| match self.node {
                Some(node) => e.at_node(self.tree.doc_id(), node),
                None => e,
            })?;
        span.words = Some(words);
        Ok(words)
    }

    /// Drain the traversal into its text, with term spans wrapped in the
    /// configured markup.
    pub fn marked_text(&mut self) -> Result<String> {
        let config = self.highlighter.config();
        let (open, close) = (config.opening_tag(), config.closing_tag());
        let mut marked = String::new();
        loop {
            match self.advance()? {
                Event::Text => marked.push_str(self.current_text().unwrap_or_default()),
                Event::Term => {
                    marked.push_str(&open);
                    marked.push_str(self.current_text().unwrap_or_default());
                    marked.push_str(&close);
                }
                Event::End => break,
                _ => {}
            }
        }
        Ok(marked)
    }
}

/// Yields every event up to and including the first [`Event::End`] or error.
impl Iterator for Traversal<'_> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let result = self.advance();
        if matches!(result, Ok(Event::End) | Err(_)) {
            self.exhausted = true;
        }
        Some(result)
    }
}
