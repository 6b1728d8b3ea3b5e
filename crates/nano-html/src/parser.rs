//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into the nano arena tree.

use html5ever::tendril::TendrilSink;
use html5ever::{QualName, local_name, ns, parse_document};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use nano_dom::{Document, DomTree, NodeId};
use url::Url;

use crate::FragmentError;

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_document(html, Document::default())
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: Url) -> Document {
        self.parse_document(html, Document::empty(url))
    }

    fn parse_document(&self, html: &str, mut document: Document) -> Document {
        tracing::debug!("Parsing HTML document: {}", document.url());

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let root = document.tree().root();
        for child in dom.document.children.borrow().iter() {
            self.convert_into(child, document.tree_mut(), root, true);
        }

        // Find html, head, body elements
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }

    /// Parse `html` as a div's inner markup and import its first child,
    /// detached, into `tree`
    pub fn parse_fragment(&self, tree: &mut DomTree, html: &str) -> Result<NodeId, FragmentError> {
        tracing::debug!("Parsing HTML fragment ({} bytes)", html.len());

        let context = QualName::new(None, ns!(html), local_name!("div"));
        let dom = html5ever::parse_fragment(RcDom::default(), Default::default(), context, vec![], false)
            .one(html);

        // The fragment parser roots the parsed children under an `html` element
        let empty = || FragmentError::Empty { markup: html.to_string() };
        let host = dom.document.children.borrow().first().cloned().ok_or_else(empty)?;
        let first = host.children.borrow().first().cloned().ok_or_else(empty)?;

        self.convert_node(&first, tree, false).ok_or_else(empty)
    }

    /// Convert `handle` and append it under `parent`
    fn convert_into(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId, skip_blank_text: bool) {
        let Some(id) = self.convert_node(handle, tree, skip_blank_text) else {
            return;
        };
        if tree.append_child(parent, id).is_err() {
            tracing::warn!("dropping node that cannot be attached to {:?}", parent);
        }
    }

    /// Convert an RcDom node and its subtree; the result is detached
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, skip_blank_text: bool) -> Option<NodeId> {
        let id = match &handle.data {
            RcNodeData::Document | RcNodeData::ProcessingInstruction { .. } => return None,
            RcNodeData::Doctype { name, public_id, system_id } => {
                tree.create_doctype(name, public_id, system_id)
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if skip_blank_text && text.trim().is_empty() {
                    return None;
                }
                tree.create_text(&text)
            }
            RcNodeData::Comment { contents } => tree.create_comment(contents),
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                if let Some(elem) = tree.element_mut(id) {
                    for attr in attrs.borrow().iter() {
                        elem.set_attr(&attr.name.local, attr.value.to_string());
                    }
                }
                id
            }
        };

        for child in handle.children.borrow().iter() {
            self.convert_into(child, tree, id, skip_blank_text);
        }
        Some(id)
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}
