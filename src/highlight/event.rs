//! Events reported by a highlighting traversal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of a traversal, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// Before the first advance.
    Start,
    DocumentStart,
    DocumentEnd,
    ElementStart,
    ElementEnd,
    /// Plain text of a text node or attribute value.
    Text,
    /// Text matching a query term.
    Term,
    Comment,
    ProcessingInstruction,
    /// Terminal; repeated by every further advance.
    End,
}

impl Event {
    /// Whether the event carries a span of a text node.
    pub fn is_text(self) -> bool {
        matches!(self, Event::Text | Event::Term)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Event::Start => "START",
            Event::DocumentStart => "DOCUMENT_START",
            Event::DocumentEnd => "DOCUMENT_END",
            Event::ElementStart => "ELEMENT_START",
            Event::ElementEnd => "ELEMENT_END",
            Event::Text => "TEXT",
            Event::Term => "TERM",
            Event::Comment => "COMMENT",
            Event::ProcessingInstruction => "PROCESSING_INSTRUCTION",
            Event::End => "END",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
