//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed; removing a node only unlinks it, so a `NodeId`
//! stays valid for the lifetime of the tree.

use crate::{DomError, DomResult, ElementData, Node, NodeId};

/// Arena-based DOM tree
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Element data for `id`, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id)?.as_element()
    }

    /// Mutable element data for `id`, if it is an element
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id)?.as_element_mut()
    }

    /// Number of nodes in the arena (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree holds nothing but the document node
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, local_name: &str) -> NodeId {
        self.push(Node::element(local_name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    /// Create a detached doctype
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(Node::doctype(name, public_id, system_id))
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent.some()
    }

    /// Parent, if it is an element
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.element(p).is_some())
    }

    /// Check whether `ancestor` is `id` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Check whether a node is attached to the document
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.get(id).is_some() && self.is_inclusive_ancestor(NodeId::ROOT, id)
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if !self.node(parent)?.can_have_children() {
            return Err(DomError::InvalidNodeType(parent));
        }
        self.node(child)?;
        if child == NodeId::ROOT || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }

        self.detach(child);

        let prev = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = NodeId::NONE;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        Ok(child)
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.node(child)?.parent != parent {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(child)
    }

    /// Unlink a node from its parent and siblings
    fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[id.index()];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let first = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        std::iter::successors(first.some(), move |&c| self.nodes[c.index()].next_sibling.some())
    }

    /// Iterate over direct children that are elements
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).filter(move |&c| self.nodes[c.index()].is_element())
    }

    /// First child of a node
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.first_child.some()
    }

    /// Closest preceding sibling that is an element
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = self.get(id)?.prev_sibling.some();
        while let Some(sibling) = cursor {
            if self.nodes[sibling.index()].is_element() {
                return Some(sibling);
            }
            cursor = self.nodes[sibling.index()].prev_sibling.some();
        }
        None
    }

    /// Closest following sibling that is an element
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = self.get(id)?.next_sibling.some();
        while let Some(sibling) = cursor {
            if self.nodes[sibling.index()].is_element() {
                return Some(sibling);
            }
            cursor = self.nodes[sibling.index()].next_sibling.some();
        }
        None
    }

    /// Pre-order traversal of the descendants of `id` (document order)
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.first_child(id),
        }
    }

    /// Element descendants of the document, in document order
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(NodeId::ROOT)
            .filter(move |&id| self.nodes[id.index()].is_element())
    }

    /// Concatenated text of a node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        match self.get(id) {
            Some(node) if node.is_text() => node.as_text().unwrap_or_default().to_string(),
            Some(_) => self
                .descendants(id)
                .filter_map(|d| self.nodes[d.index()].as_text())
                .collect(),
            None => String::new(),
        }
    }

    /// Replace all children of `id` with a single text node
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            self.detach(child);
        }
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(id, text_node)?;
        }
        Ok(())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order iterator over a subtree, excluding its root
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        let node = &self.tree.nodes[current.index()];

        self.next = if node.first_child.is_valid() {
            Some(node.first_child)
        } else {
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    break None;
                }
                let n = &self.tree.nodes[cursor.index()];
                if n.next_sibling.is_valid() {
                    break Some(n.next_sibling);
                }
                match n.parent.some() {
                    Some(parent) => cursor = parent,
                    None => break None,
                }
            }
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let p = tree.create_element("p");
        let span = tree.create_element("span");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, p).unwrap();
        tree.append_child(div, span).unwrap();
        (tree, div, p, span)
    }

    #[test]
    fn test_append_links_siblings() {
        let (tree, div, p, span) = sample();
        assert_eq!(tree.children(div).collect::<Vec<_>>(), vec![p, span]);
        assert_eq!(tree.parent(p), Some(div));
        assert_eq!(tree.next_element_sibling(p), Some(span));
        assert_eq!(tree.previous_element_sibling(span), Some(p));
    }

    #[test]
    fn test_descendants_document_order() {
        let (mut tree, div, p, span) = sample();
        let text = tree.create_text("hi");
        tree.append_child(p, text).unwrap();

        let order: Vec<_> = tree.descendants(tree.root()).collect();
        assert_eq!(order, vec![div, p, text, span]);
        assert_eq!(tree.descendants(p).collect::<Vec<_>>(), vec![text]);
        assert_eq!(tree.elements().collect::<Vec<_>>(), vec![div, p, span]);
    }

    #[test]
    fn test_remove_child_detaches() {
        let (mut tree, div, p, span) = sample();
        tree.remove_child(div, p).unwrap();

        assert_eq!(tree.children(div).collect::<Vec<_>>(), vec![span]);
        assert!(!tree.is_connected(p));
        assert!(tree.is_connected(span));
        assert_eq!(
            tree.remove_child(div, p),
            Err(DomError::NotAChild { parent: div, child: p })
        );
    }

    #[test]
    fn test_hierarchy_errors() {
        let (mut tree, div, p, _) = sample();
        assert_eq!(tree.append_child(p, div), Err(DomError::HierarchyRequest));

        let text = tree.create_text("x");
        let other = tree.create_element("b");
        assert_eq!(tree.append_child(text, other), Err(DomError::InvalidNodeType(text)));
    }

    #[test]
    fn test_text_content() {
        let (mut tree, div, p, span) = sample();
        let a = tree.create_text("Hello ");
        let b = tree.create_text("World");
        tree.append_child(p, a).unwrap();
        tree.append_child(span, b).unwrap();

        assert_eq!(tree.text_content(div), "Hello World");
        tree.set_text_content(div, "replaced").unwrap();
        assert_eq!(tree.text_content(div), "replaced");
        assert!(!tree.is_connected(p));
    }
}
