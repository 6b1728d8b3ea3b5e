//! Error types for the collection wrapper

use nano_css::SelectorError;
use nano_dom::DomError;
use nano_html::FragmentError;

/// Collection wrapper error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NanoError {
    /// An operation that reads element 0 was called on an empty collection
    #[error("{operation} called on an empty collection")]
    EmptyCollection { operation: &'static str },

    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorError),

    #[error("invalid markup literal: {0}")]
    Fragment(#[from] FragmentError),

    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Result type for collection operations
pub type Result<T> = std::result::Result<T, NanoError>;
