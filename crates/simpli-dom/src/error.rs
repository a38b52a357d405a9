//! DOM operation errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("node {0:?} not found")]
    NotFound(NodeId),

    /// The node exists but is not an element
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),

    /// Hierarchy error (e.g., inserting an ancestor into its descendant)
    #[error("hierarchy request error")]
    HierarchyRequest,

    /// Malformed selector string
    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    /// The host lacks the requested capability
    #[error("{0} is not supported by this document")]
    NotSupported(&'static str),
}
