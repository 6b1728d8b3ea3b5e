//! DOM errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("node {0:?} not found")]
    NotFound(NodeId),

    /// Hierarchy error (e.g., inserting an ancestor into its descendant)
    #[error("hierarchy request error")]
    HierarchyRequest,

    /// Node cannot hold children or is not an element where one is required
    #[error("invalid node type for {0:?}")]
    InvalidNodeType(NodeId),

    /// Node is not a child of the given parent
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// Document URL could not be parsed
    #[error("invalid document url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
