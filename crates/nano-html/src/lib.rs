//! nano HTML Parser
//!
//! HTML5 parsing built on html5ever: whole documents for the host window,
//! and detached fragments for markup literals.

mod parser;

pub use parser::HtmlParser;

use nano_dom::{DomTree, NodeId};

/// Parse an HTML string into a document at `about:blank`
pub fn parse(html: &str) -> nano_dom::Document {
    HtmlParser::new().parse(html)
}

/// Parse `html` as the inner markup of a throwaway `div` and import its
/// first child into `tree`, detached
pub fn parse_fragment(tree: &mut DomTree, html: &str) -> Result<NodeId, FragmentError> {
    HtmlParser::new().parse_fragment(tree, html)
}

/// Fragment parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FragmentError {
    #[error("markup produced no nodes: {markup:?}")]
    Empty { markup: String },

    #[error("markup does not start with an element: {markup:?}")]
    NotAnElement { markup: String },
}
