//! Static node lists returned by document queries

use crate::NodeId;

/// Ordered, static list of nodes (document order for query results)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeList {
    nodes: Vec<NodeId>,
}

impl NodeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(nodes: Vec<NodeId>) -> Self {
        Self { nodes }
    }

    pub fn length(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }
}

impl From<Vec<NodeId>> for NodeList {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self::from_vec(nodes)
    }
}

impl IntoIterator for NodeList {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_list() {
        let list = NodeList::from_vec(vec![NodeId(1), NodeId(2), NodeId(3)]);

        assert_eq!(list.length(), 3);
        assert_eq!(list.item(0), Some(NodeId(1)));
        assert_eq!(list.item(3), None);
        assert_eq!(list.into_iter().collect::<Vec<_>>(), vec![NodeId(1), NodeId(2), NodeId(3)]);
    }
}
