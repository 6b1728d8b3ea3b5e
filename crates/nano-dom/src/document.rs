//! Document - High-level document API

use std::collections::HashMap;

use url::Url;

use crate::{DOMRect, DomResult, DomTree, NodeId, NodeList};

/// Document load state (`document.readyState`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadyState {
    /// Still parsing
    #[default]
    Loading,
    /// Parsed; `DOMContentLoaded` has fired
    Interactive,
    /// Parsed and every subresource loaded
    Complete,
}

impl ReadyState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Interactive => "interactive",
            Self::Complete => "complete",
        }
    }
}

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: Url,
    /// Current load state
    ready_state: ReadyState,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Page-coordinate layout boxes supplied by the embedder
    layout: HashMap<NodeId, DOMRect>,
}

impl Document {
    /// Create a document with the basic html/head/body structure
    pub fn new(url: Url) -> DomResult<Self> {
        let mut doc = Self::empty(url);
        let html = doc.tree.create_element("html");
        let head = doc.tree.create_element("head");
        let body = doc.tree.create_element("body");

        doc.tree.append_child(doc.tree.root(), html)?;
        doc.tree.append_child(html, head)?;
        doc.tree.append_child(html, body)?;
        doc.finalize();
        Ok(doc)
    }

    /// Create an empty document (no structure)
    pub fn empty(url: Url) -> Self {
        Self {
            tree: DomTree::new(),
            url,
            ready_state: ReadyState::Loading,
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            layout: HashMap::new(),
        }
    }

    /// Locate and cache the html, head and body elements
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        let find = |parent: NodeId, name: &str| {
            tree.element_children(parent)
                .find(|&id| tree.element(id).is_some_and(|e| e.local_name == name))
                .unwrap_or(NodeId::NONE)
        };

        let html = find(tree.root(), "html");
        let (head, body) = if html.is_valid() {
            (find(html, "head"), find(html, "body"))
        } else {
            (NodeId::NONE, NodeId::NONE)
        };

        self.html_element = html;
        self.head_element = head;
        self.body_element = body;
    }

    /// Get document URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Current load state
    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub(crate) fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    /// Get document title
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }
        self.tree
            .element_children(self.head_element)
            .find(|&id| self.tree.element(id).is_some_and(|e| e.local_name == "title"))
            .map(|id| self.tree.text_content(id).trim().to_string())
            .unwrap_or_default()
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.some()
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        self.head_element.some()
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.body_element.some()
    }

    /// First element in document order with the given id
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.tree
            .elements()
            .find(|&node| self.tree.element(node).and_then(|e| e.id()) == Some(id))
    }

    /// Elements carrying every class in a whitespace-separated list
    pub fn get_elements_by_class_name(&self, names: &str) -> NodeList {
        let wanted: Vec<&str> = names.split_whitespace().collect();
        if wanted.is_empty() {
            return NodeList::new();
        }
        self.tree
            .elements()
            .filter(|&node| {
                self.tree
                    .element(node)
                    .is_some_and(|e| wanted.iter().all(|class| e.has_class(class)))
            })
            .collect::<Vec<_>>()
            .into()
    }

    /// Elements with the given tag (ASCII case-insensitive, `*` for all)
    pub fn get_elements_by_tag_name(&self, tag: &str) -> NodeList {
        self.tree
            .elements()
            .filter(|&node| {
                tag == "*"
                    || self
                        .tree
                        .element(node)
                        .is_some_and(|e| e.local_name.eq_ignore_ascii_case(tag))
            })
            .collect::<Vec<_>>()
            .into()
    }

    /// Create a detached element
    pub fn create_element(&mut self, local_name: &str) -> NodeId {
        self.tree.create_element(local_name)
    }

    /// Record an element's layout box in page coordinates
    pub fn set_layout_rect(&mut self, id: NodeId, rect: DOMRect) {
        self.layout.insert(id, rect);
    }

    /// Layout box in page coordinates, if one was recorded
    pub fn layout_rect(&self, id: NodeId) -> Option<DOMRect> {
        self.layout.get(&id).copied()
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty(Url::parse("about:blank").expect("about:blank is a valid URL"))
    }
}
