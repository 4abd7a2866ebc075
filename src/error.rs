//! Error types for the xmlft library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`FtError`] enum. The variants follow three broad classes:
//!
//! - input contract violations ([`FtError::Contract`], [`FtError::IndexDivergence`]),
//!   which are fatal for the current operation;
//! - data-model faults ([`FtError::NoSuchProperty`]), which callers may treat as
//!   "no such property" and recover from;
//! - resource faults raised by tokenizers or posting cursors, which are wrapped
//!   with node and document context ([`FtError::Resource`]).
//!
//! # Examples
//!
//! ```
//! use xmlft::error::{FtError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(FtError::contract("hits out of order"))
//! }
//!
//! assert!(example_operation().is_err());
//! ```

use std::io;

use thiserror::Error;

use crate::tree::{DocId, NodeId};

/// The main error type for xmlft operations.
#[derive(Error, Debug)]
pub enum FtError {
    /// I/O errors (configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (tokenization, unsupported languages)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Query-related errors (invalid wildcard patterns and the like)
    #[error("Query error: {0}")]
    Query(String),

    /// Input contract violations: malformed selections, unordered hits, unknown nodes
    #[error("Contract violation: {0}")]
    Contract(String),

    /// A property was requested on a node kind that does not carry it
    #[error("Node {node} has no {property}")]
    NoSuchProperty {
        /// The offending node.
        node: NodeId,
        /// The requested property.
        property: &'static str,
    },

    /// The posting cursor reported a hit the text node does not contain
    #[error("Index and content diverge in document {doc} at node {node}")]
    IndexDivergence {
        /// Document being traversed.
        doc: DocId,
        /// Text node the cursor pointed at.
        node: NodeId,
    },

    /// Failure raised while processing a specific node
    #[error("Failed at node {node} of document {doc}: {source}")]
    Resource {
        /// Document being traversed.
        doc: DocId,
        /// Node being processed.
        node: NodeId,
        /// Underlying failure.
        #[source]
        source: Box<FtError>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors raised by user-supplied collaborators
    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with FtError.
pub type Result<T> = std::result::Result<T, FtError>;

impl FtError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        FtError::Analysis(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        FtError::Query(msg.into())
    }

    /// Create a new contract violation.
    pub fn contract<S: Into<String>>(msg: S) -> Self {
        FtError::Contract(msg.into())
    }

    /// Create a new data-model fault.
    pub fn no_such_property(node: NodeId, property: &'static str) -> Self {
        FtError::NoSuchProperty { node, property }
    }

    /// Wrap this error with the node and document it was raised for.
    ///
    /// Contract violations and divergence faults already identify their
    /// cause and are returned unchanged.
    pub fn at_node(self, doc: DocId, node: NodeId) -> Self {
        match self {
            FtError::Contract(_)
            | FtError::IndexDivergence { .. }
            | FtError::NoSuchProperty { .. }
            | FtError::Resource { .. } => self,
            other => FtError::Resource {
                doc,
                node,
                source: Box::new(other),
            },
        }
    }

    /// Whether the caller may recover from this error and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FtError::NoSuchProperty { .. })
    }
}
