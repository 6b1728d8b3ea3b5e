//! Collection
//!
//! An ordered, indexable set of live element handles with chainable
//! class, event, visibility and viewport operations.

use std::ops::Index;

use nano_dom::{Element, EventListener, Window};

use crate::error::{NanoError, Result};

/// Ordered set of element handles
#[derive(Clone)]
pub struct Collection {
    window: Window,
    elements: Vec<Element>,
}

impl Collection {
    /// Wrap `elements` as-is, in order
    pub fn new(window: &Window, elements: Vec<Element>) -> Self {
        tracing::debug!("collection of {} elements", elements.len());
        Self {
            window: window.clone(),
            elements,
        }
    }

    /// Empty but valid collection
    pub fn empty(window: &Window) -> Self {
        Self::new(window, Vec::new())
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[Element] {
        &self.elements
    }

    fn head(&self, operation: &'static str) -> Result<&Element> {
        self.elements
            .first()
            .ok_or(NanoError::EmptyCollection { operation })
    }

    /// Call `callback(element, collection, index)` for every element in
    /// index order
    pub fn each(&self, mut callback: impl FnMut(&Element, &Collection, usize)) -> &Self {
        for (index, element) in self.elements.iter().enumerate() {
            callback(element, self, index);
        }
        self
    }

    /// One-element collection of element 0; empty if this one is
    pub fn first(&self) -> Collection {
        Collection::new(&self.window, self.elements.first().cloned().into_iter().collect())
    }

    /// One-element collection of the last element; empty if this one is
    pub fn last(&self) -> Collection {
        Collection::new(&self.window, self.elements.last().cloned().into_iter().collect())
    }

    /// Whether element 0 has `class`
    pub fn has_class(&self, class: &str) -> Result<bool> {
        Ok(self.head("has_class")?.has_class(class))
    }

    /// Add `class` to every element, unless element 0 already has it
    pub fn add_class(&self, class: &str) -> Result<&Self> {
        if !self.head("add_class")?.has_class(class) {
            for element in &self.elements {
                element.add_class(class);
            }
        }
        Ok(self)
    }

    /// Remove `class` from every element, if element 0 has it
    pub fn remove_class(&self, class: &str) -> Result<&Self> {
        if self.head("remove_class")?.has_class(class) {
            for element in &self.elements {
                element.remove_class(class);
            }
        }
        Ok(self)
    }

    /// Toggle `class` on each element independently
    pub fn toggle_class(&self, class: &str) -> &Self {
        for element in &self.elements {
            element.toggle_class(class);
        }
        self
    }

    /// Register `listener` for `event_type` on every element
    pub fn on(&self, event_type: &str, listener: &EventListener) -> &Self {
        for element in &self.elements {
            element.add_event_listener(event_type, listener);
        }
        self
    }

    /// Remove `listener` for `event_type` from every element
    pub fn off(&self, event_type: &str, listener: &EventListener) -> &Self {
        for element in &self.elements {
            element.remove_event_listener(event_type, listener);
        }
        self
    }

    /// Set inline `display: block`
    pub fn show(&self) -> &Self {
        self.set_display("block")
    }

    /// Set inline `display: none`
    pub fn hide(&self) -> &Self {
        self.set_display("none")
    }

    fn set_display(&self, value: &str) -> &Self {
        for element in self.elements.iter().rev() {
            element.set_style_property("display", value);
        }
        self
    }

    /// Whether element 0 overlaps the viewport vertically
    pub fn inview(&self) -> Result<bool> {
        let rect = self.head("inview")?.bounding_client_rect();
        Ok(rect.top() <= self.window.inner_height() && rect.bottom() >= 0.0)
    }
}

impl Index<usize> for Collection {
    type Output = Element;

    fn index(&self, index: usize) -> &Element {
        &self.elements[index]
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl From<&Collection> for crate::Selector {
    fn from(collection: &Collection) -> Self {
        crate::Selector::List(collection.elements.clone())
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.elements).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nano_dom::{DOMRect, Document, WindowConfig};

    fn window() -> Window {
        let config = WindowConfig {
            viewport_height: 500.0,
            ..Default::default()
        };
        Window::new(Document::new(config.parsed_url().unwrap()).unwrap(), &config)
    }

    fn three(win: &Window) -> Collection {
        let elements = (0..3).map(|_| win.create_element("div")).collect();
        Collection::new(win, elements)
    }

    #[test]
    fn test_first_last() {
        let win = window();
        let all = three(&win);
        assert_eq!(all.first().len(), 1);
        assert_eq!(all.first()[0], all[0]);
        assert_eq!(all.last()[0], all[2]);
        assert!(Collection::empty(&win).first().is_empty());
    }

    #[test]
    fn test_each_passes_index_and_collection() {
        let win = window();
        let all = three(&win);
        let mut seen = Vec::new();
        all.each(|element, collection, index| {
            assert_eq!(*element, collection[index]);
            seen.push(index);
        });
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_show_hide() {
        let win = window();
        let all = three(&win);
        all.hide();
        assert!(all.iter().all(|e| e.style_property("display").as_deref() == Some("none")));
        all.show();
        assert!(all.iter().all(|e| e.style_property("display").as_deref() == Some("block")));
    }

    #[test]
    fn test_inview_bounds() {
        let win = window();
        let body = win.element(win.document().body().unwrap()).unwrap();
        let all = three(&win);
        for element in &all {
            body.append_child(element).unwrap();
        }

        all[0].set_layout_rect(DOMRect::from_xywh(0.0, 500.0, 10.0, 10.0));
        assert!(all.inview().unwrap());

        all[0].set_layout_rect(DOMRect::from_xywh(0.0, 501.0, 10.0, 10.0));
        assert!(!all.inview().unwrap());

        // Touching the top edge still counts
        all[0].set_layout_rect(DOMRect::from_xywh(0.0, -10.0, 10.0, 10.0));
        assert!(all.inview().unwrap());

        win.scroll_to(0.0, 1.0);
        assert!(!all.inview().unwrap());
    }

    #[test]
    fn test_element_zero_operations_on_empty() {
        let empty = Collection::empty(&window());
        assert_eq!(
            empty.has_class("x").unwrap_err(),
            NanoError::EmptyCollection { operation: "has_class" }
        );
        assert!(empty.add_class("x").is_err());
        assert!(empty.remove_class("x").is_err());
        assert!(empty.inview().is_err());
        assert!(empty.toggle_class("x").hide().show().is_empty());
    }
}
