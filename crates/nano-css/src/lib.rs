//! nano CSS Selectors
//!
//! Selector parsing and matching against the nano DOM: the engine behind
//! `querySelectorAll`.

mod matcher;
mod parser;
mod selectors;

pub use matcher::{matches_complex, matches_compound};
pub use parser::SelectorParser;
pub use selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, SelectorComponent, SelectorList,
};

use nano_dom::{Document, NodeId, NodeList};

/// Parse a selector list such as `ul > li.item, a[href^="https"]`
pub fn parse_selector_list(selector: &str) -> Result<SelectorList, SelectorError> {
    SelectorParser::new(selector).parse_list()
}

/// All connected elements matching `selector`, in document order
pub fn query_selector_all(document: &Document, selector: &str) -> Result<NodeList, SelectorError> {
    let list = parse_selector_list(selector)?;
    let tree = document.tree();
    let found: Vec<NodeId> = tree.elements().filter(|&id| list.matches(tree, id)).collect();
    tracing::trace!("querySelectorAll({selector}) matched {}", found.len());
    Ok(found.into())
}

/// Selector parsing error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("unexpected end of selector")]
    UnexpectedEnd,

    #[error("expected identifier at offset {0}")]
    ExpectedIdentifier(usize),

    #[error("combinator at offset {0} has no selector after it")]
    DanglingCombinator(usize),

    #[error("unsupported pseudo-class :{0}")]
    UnsupportedPseudoClass(String),

    #[error("unsupported pseudo-element ::{0}")]
    UnsupportedPseudoElement(String),

    #[error("invalid An+B expression {0:?}")]
    InvalidNth(String),
}
