//! nano
//!
//! A minimal DOM query helper: wrap a selector string, an element or a
//! list of elements into a [`Collection`] and operate on it with chainable
//! class, event and visibility methods.
//!
//! ```ignore
//! let window = nano::open("<ul><li class='item'>a</li></ul>", &WindowConfig::default())?;
//! nano::q(&window, ".item")?.add_class("active")?.show();
//! ```

mod collection;
mod error;
mod frame;
mod ready;
mod selector;

pub use collection::Collection;
pub use error::{NanoError, Result};
pub use frame::{FrameTicker, ScrollSync, raf};
pub use ready::ready;
pub use selector::{Selector, SelectorKind, classify};

use nano_dom::NodeId;

pub use nano_dom::{DOMRect, Element, EventListener, EventTarget, ReadyState, Window, WindowConfig};

/// Build a collection from a selector string, an element, a list of
/// elements, or nothing
pub fn nano(window: &Window, selector: impl Into<Selector>) -> Result<Collection> {
    let elements = match selector.into() {
        Selector::Empty => Vec::new(),
        Selector::Element(element) => vec![element],
        Selector::List(elements) => elements,
        Selector::Query(query) => resolve(window, &query)?,
    };
    Ok(Collection::new(window, elements))
}

pub use crate::nano as select;
pub use crate::nano as q;

fn resolve(window: &Window, query: &str) -> Result<Vec<Element>> {
    let ids: Vec<NodeId> = match classify(query) {
        SelectorKind::Fragment(markup) => return create_node(window, markup).map(|e| vec![e]),
        SelectorKind::IdRef(id) => window.document().get_element_by_id(id).into_iter().collect(),
        SelectorKind::ClassRef(class) => window.document().get_elements_by_class_name(class).iter().collect(),
        SelectorKind::TagRef(tag) => window.document().get_elements_by_tag_name(tag).iter().collect(),
        SelectorKind::GenericCss(css) => nano_css::query_selector_all(&window.document(), css)?.iter().collect(),
    };
    Ok(ids.into_iter().filter_map(|id| window.element(id)).collect())
}

/// Parse a markup literal into a new detached element
fn create_node(window: &Window, markup: &str) -> Result<Element> {
    let id = nano_html::parse_fragment(window.document_mut().tree_mut(), markup)?;
    window.element(id).ok_or_else(|| {
        nano_html::FragmentError::NotAnElement {
            markup: markup.to_string(),
        }
        .into()
    })
}

/// Parse `html` into a document and wrap it in a window
pub fn open(html: &str, config: &WindowConfig) -> Result<Window> {
    let url = config.parsed_url()?;
    let document = nano_html::HtmlParser::new().parse_with_url(html, url);
    Ok(Window::new(document, config))
}
