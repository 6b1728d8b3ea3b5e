//! Selector Matching
//!
//! Right-to-left matching of complex selectors against the DOM tree,
//! backtracking through descendant and sibling combinators.

use nano_dom::{DomTree, NodeData, NodeId};

use crate::selectors::{
    Combinator, ComplexSelector, CompoundSelector, PseudoClass, SelectorComponent, SelectorList,
};

impl SelectorList {
    /// Check whether any selector in the list matches the element
    pub fn matches(&self, tree: &DomTree, element: NodeId) -> bool {
        self.iter().any(|complex| matches_complex(tree, element, complex))
    }
}

/// Match a complex selector with `element` as the subject
pub fn matches_complex(tree: &DomTree, element: NodeId, selector: &ComplexSelector) -> bool {
    match selector.compounds.len() {
        0 => false,
        n => matches_at(tree, element, selector, n - 1),
    }
}

fn matches_at(tree: &DomTree, element: NodeId, selector: &ComplexSelector, index: usize) -> bool {
    if !matches_compound(tree, element, &selector.compounds[index]) {
        return false;
    }
    if index == 0 {
        return true;
    }

    let previous = index - 1;
    match selector.combinators[previous] {
        Combinator::Child => tree
            .parent_element(element)
            .is_some_and(|parent| matches_at(tree, parent, selector, previous)),
        Combinator::Descendant => {
            let mut cursor = tree.parent_element(element);
            while let Some(ancestor) = cursor {
                if matches_at(tree, ancestor, selector, previous) {
                    return true;
                }
                cursor = tree.parent_element(ancestor);
            }
            false
        }
        Combinator::NextSibling => tree
            .previous_element_sibling(element)
            .is_some_and(|sibling| matches_at(tree, sibling, selector, previous)),
        Combinator::SubsequentSibling => {
            let mut cursor = tree.previous_element_sibling(element);
            while let Some(sibling) = cursor {
                if matches_at(tree, sibling, selector, previous) {
                    return true;
                }
                cursor = tree.previous_element_sibling(sibling);
            }
            false
        }
    }
}

/// Match every simple selector of a compound against one element
pub fn matches_compound(tree: &DomTree, element: NodeId, compound: &CompoundSelector) -> bool {
    let Some(data) = tree.element(element) else {
        return false;
    };

    compound.components.iter().all(|component| match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => data.local_name.eq_ignore_ascii_case(tag),
        SelectorComponent::Id(id) => data.id() == Some(id.as_str()),
        SelectorComponent::Class(class) => data.has_class(class),
        SelectorComponent::Attribute(attr) => attr.matches(data.get_attr(&attr.name)),
        SelectorComponent::PseudoClass(pseudo) => matches_pseudo_class(tree, element, pseudo),
    })
}

fn matches_pseudo_class(tree: &DomTree, element: NodeId, pseudo: &PseudoClass) -> bool {
    match pseudo {
        PseudoClass::Root => tree.parent(element) == Some(tree.root()),
        PseudoClass::Empty => tree.children(element).all(|child| {
            matches!(tree.get(child).map(|n| &n.data), Some(NodeData::Comment(_)))
        }),
        PseudoClass::FirstChild => tree.previous_element_sibling(element).is_none(),
        PseudoClass::LastChild => tree.next_element_sibling(element).is_none(),
        PseudoClass::OnlyChild => {
            tree.previous_element_sibling(element).is_none()
                && tree.next_element_sibling(element).is_none()
        }
        PseudoClass::NthChild(expr) => expr.matches(sibling_position(tree, element, false)),
        PseudoClass::NthLastChild(expr) => expr.matches(sibling_position(tree, element, true)),
        PseudoClass::Not(inner) => !matches_compound(tree, element, inner),
    }
}

/// 1-based position among element siblings, counted from the end if `from_end`
fn sibling_position(tree: &DomTree, element: NodeId, from_end: bool) -> i32 {
    let step = |id| {
        if from_end {
            tree.next_element_sibling(id)
        } else {
            tree.previous_element_sibling(id)
        }
    };
    let mut position = 1;
    let mut cursor = step(element);
    while let Some(sibling) = cursor {
        position += 1;
        cursor = step(sibling);
    }
    position
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_selector_list;

    /// <ul><li/><li class="b"/><li/></ul>
    fn list_tree() -> (DomTree, NodeId, Vec<NodeId>) {
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        tree.append_child(tree.root(), ul).unwrap();
        let items: Vec<NodeId> = (0..3)
            .map(|_| {
                let li = tree.create_element("li");
                tree.append_child(ul, li).unwrap();
                li
            })
            .collect();
        tree.element_mut(items[1]).unwrap().set_attr("class", "b");
        (tree, ul, items)
    }

    fn check(tree: &DomTree, id: NodeId, selector: &str) -> bool {
        parse_selector_list(selector).unwrap().matches(tree, id)
    }

    #[test]
    fn test_structural_pseudo_classes() {
        let (tree, ul, items) = list_tree();
        assert!(check(&tree, ul, ":root"));
        assert!(check(&tree, items[0], "li:first-child"));
        assert!(check(&tree, items[2], "li:last-child"));
        assert!(check(&tree, items[1], "li:nth-child(2)"));
        assert!(check(&tree, items[0], "li:nth-last-child(3)"));
        assert!(check(&tree, items[0], "li:empty"));
        assert!(!check(&tree, ul, "ul:empty"));
        assert!(!check(&tree, items[0], "li:only-child"));
        assert!(check(&tree, items[0], "li:not(.b)"));
        assert!(!check(&tree, items[1], "li:not(.b)"));
    }

    #[test]
    fn test_sibling_combinators() {
        let (tree, _, items) = list_tree();
        assert!(check(&tree, items[2], ".b + li"));
        assert!(!check(&tree, items[1], ".b + li"));
        assert!(check(&tree, items[2], "li ~ li"));
        assert!(!check(&tree, items[0], "li ~ li"));
    }

    #[test]
    fn test_descendant_backtracking() {
        // div.x > div > p: the nearest div ancestor alone must not decide
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        let p = tree.create_element("p");
        tree.append_child(tree.root(), outer).unwrap();
        tree.append_child(outer, inner).unwrap();
        tree.append_child(inner, p).unwrap();
        tree.element_mut(outer).unwrap().set_attr("class", "x");

        assert!(check(&tree, p, ".x p"));
        assert!(check(&tree, p, ".x > div > p"));
        assert!(!check(&tree, p, ".x > p"));
        assert!(check(&tree, p, "div.x div p"));
    }
}
