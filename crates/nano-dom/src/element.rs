//! Element handles
//!
//! A live, non-owning reference to an element node. Every accessor reads
//! through to the window's document, so changes made through one handle
//! are visible through every other handle to the same node.

use crate::{
    DOMRect, DOMTokenList, DomResult, Event, EventListener, EventTarget, NodeId, Window,
};

/// Live handle to an element in a window's document
#[derive(Clone)]
pub struct Element {
    window: Window,
    id: NodeId,
}

impl Element {
    pub(crate) fn new(window: Window, id: NodeId) -> Self {
        Self { window, id }
    }

    /// Arena id of the element
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    /// Owning window
    pub fn window(&self) -> &Window {
        &self.window
    }

    fn read<T: Default>(&self, f: impl FnOnce(&crate::ElementData) -> T) -> T {
        self.window
            .document()
            .tree()
            .element(self.id)
            .map(f)
            .unwrap_or_default()
    }

    fn write<T: Default>(&self, f: impl FnOnce(&mut crate::ElementData) -> T) -> T {
        self.window
            .document_mut()
            .tree_mut()
            .element_mut(self.id)
            .map(f)
            .unwrap_or_default()
    }

    /// Lower-case local name (`div`)
    pub fn local_name(&self) -> String {
        self.read(|e| e.local_name.clone())
    }

    /// Upper-case tag name (`DIV`)
    pub fn tag_name(&self) -> String {
        self.local_name().to_ascii_uppercase()
    }

    /// The `id` attribute
    pub fn id(&self) -> Option<String> {
        self.read(|e| e.id().map(str::to_string))
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.read(|e| e.get_attr(name).map(str::to_string))
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.write(|e| e.set_attr(name, value));
    }

    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        self.write(|e| e.attrs.remove(name).map(|a| a.value))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.read(|e| e.attrs.contains(name))
    }

    /// The raw `class` attribute
    pub fn class_name(&self) -> String {
        self.get_attribute("class").unwrap_or_default()
    }

    /// Snapshot of the class list
    pub fn class_list(&self) -> DOMTokenList {
        self.read(|e| e.class_list())
    }

    /// `classList.contains`
    pub fn has_class(&self, class: &str) -> bool {
        self.read(|e| e.has_class(class))
    }

    /// `classList.add`; returns whether the class was added
    pub fn add_class(&self, class: &str) -> bool {
        self.write(|e| {
            let mut list = e.class_list();
            let added = list.add(class);
            if added {
                e.set_class_list(&list);
            }
            added
        })
    }

    /// `classList.remove`; returns whether the class was present
    pub fn remove_class(&self, class: &str) -> bool {
        self.write(|e| {
            let mut list = e.class_list();
            let removed = list.remove(class);
            if removed {
                e.set_class_list(&list);
            }
            removed
        })
    }

    /// `classList.toggle`; returns the new membership
    pub fn toggle_class(&self, class: &str) -> bool {
        self.write(|e| {
            let mut list = e.class_list();
            let present = list.toggle(class);
            e.set_class_list(&list);
            present
        })
    }

    /// Inline style property
    pub fn style_property(&self, property: &str) -> Option<String> {
        self.read(|e| e.style().get_property(property).map(str::to_string))
    }

    /// Set an inline style property
    pub fn set_style_property(&self, property: &str, value: &str) {
        self.write(|e| {
            let mut style = e.style();
            style.set_property(property, value);
            e.set_style(&style);
        });
    }

    pub fn text_content(&self) -> String {
        self.window.document().tree().text_content(self.id)
    }

    pub fn set_text_content(&self, text: &str) -> DomResult<()> {
        self.window.document_mut().tree_mut().set_text_content(self.id, text)
    }

    pub fn parent_element(&self) -> Option<Element> {
        let parent = self.window.document().tree().parent_element(self.id)?;
        Some(Element::new(self.window.clone(), parent))
    }

    /// Append `child` as the last child of this element
    pub fn append_child(&self, child: &Element) -> DomResult<()> {
        self.window
            .document_mut()
            .tree_mut()
            .append_child(self.id, child.id)
            .map(|_| ())
    }

    /// Detach this element from its parent
    pub fn remove(&self) -> DomResult<()> {
        let mut doc = self.window.document_mut();
        let parent = doc.tree().parent(self.id);
        match parent {
            Some(parent) => doc.tree_mut().remove_child(parent, self.id).map(|_| ()),
            None => Ok(()),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.window.document().tree().is_connected(self.id)
    }

    /// Border box in client coordinates.
    ///
    /// Elements that are detached, `display: none`, or have no recorded
    /// layout report an all-zero rect.
    pub fn bounding_client_rect(&self) -> DOMRect {
        let doc = self.window.document();
        if !doc.tree().is_connected(self.id) || self.is_display_none(&doc) {
            return DOMRect::new();
        }
        match doc.layout_rect(self.id) {
            Some(rect) => self.window.viewport().to_client(rect),
            None => DOMRect::new(),
        }
    }

    fn is_display_none(&self, doc: &crate::Document) -> bool {
        let tree = doc.tree();
        let mut cursor = Some(self.id);
        while let Some(id) = cursor {
            let hidden = tree
                .element(id)
                .is_some_and(|e| e.style().get_property("display") == Some("none"));
            if hidden {
                return true;
            }
            cursor = tree.parent_element(id);
        }
        false
    }

    /// Record this element's layout box in page coordinates
    pub fn set_layout_rect(&self, rect: DOMRect) {
        self.window.document_mut().set_layout_rect(self.id, rect);
    }

    pub fn add_event_listener(&self, event_type: &str, listener: &EventListener) -> bool {
        self.window
            .add_event_listener(EventTarget::Node(self.id), event_type, listener)
    }

    pub fn remove_event_listener(&self, event_type: &str, listener: &EventListener) -> bool {
        self.window
            .remove_event_listener(EventTarget::Node(self.id), event_type, listener)
    }

    /// Fire an event of `event_type` at this element
    pub fn dispatch_event(&self, event_type: &str) -> bool {
        self.window
            .dispatch_event(Event::new(event_type, EventTarget::Node(self.id)))
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.window.ptr_eq(&other.window)
    }
}

impl Eq for Element {}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Element").field(&self.id).finish()
    }
}
