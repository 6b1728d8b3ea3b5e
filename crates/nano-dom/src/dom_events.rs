//! DOM Events
//!
//! Event objects, listener handles and the per-target listener registry.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::NodeId;

/// Where an event is dispatched or a listener is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Document,
    Node(NodeId),
}

/// DOM event
#[derive(Debug)]
pub struct Event {
    event_type: String,
    target: EventTarget,
    current_target: Cell<EventTarget>,
    pub bubbles: bool,
    pub cancelable: bool,
    pub timestamp: f64,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl Event {
    /// Create an event; bubbling follows the platform default for the type
    pub fn new(event_type: &str, target: EventTarget) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: Cell::new(target),
            bubbles: Self::type_bubbles(event_type),
            cancelable: !matches!(event_type, "scroll" | "load" | "DOMContentLoaded" | "readystatechange"),
            timestamp: 0.0,
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    fn type_bubbles(event_type: &str) -> bool {
        !matches!(
            event_type,
            "focus" | "blur" | "load" | "unload" | "resize" | "mouseenter" | "mouseleave"
                | "readystatechange"
        )
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Object the event was dispatched at
    pub fn target(&self) -> EventTarget {
        self.target
    }

    /// Object whose listeners are currently running
    pub fn current_target(&self) -> EventTarget {
        self.current_target.get()
    }

    pub(crate) fn set_current_target(&self, target: EventTarget) {
        self.current_target.set(target);
    }

    /// Prevent default action
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    /// Stop propagation to further targets on the path
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

/// Shared event callback
///
/// Identity is the callback allocation: clones of one listener compare
/// equal, two listeners built from identical closures do not.
#[derive(Clone)]
pub struct EventListener {
    callback: Rc<dyn Fn(&Event)>,
}

impl EventListener {
    pub fn new(callback: impl Fn(&Event) + 'static) -> Self {
        Self { callback: Rc::new(callback) }
    }

    pub fn handle_event(&self, event: &Event) {
        (self.callback)(event)
    }
}

impl PartialEq for EventListener {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl Eq for EventListener {}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListener")
            .field("callback", &Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// Listener registration options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Remove the listener after its first invocation
    pub once: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct RegisteredListener {
    pub listener: EventListener,
    pub options: ListenerOptions,
}

/// Listeners keyed by target and event type, in registration order
#[derive(Debug, Default)]
pub(crate) struct ListenerRegistry {
    entries: HashMap<(EventTarget, String), Vec<RegisteredListener>>,
}

impl ListenerRegistry {
    /// Register a listener; duplicates are ignored
    pub fn add(
        &mut self,
        target: EventTarget,
        event_type: &str,
        listener: &EventListener,
        options: ListenerOptions,
    ) -> bool {
        let list = self.entries.entry((target, event_type.to_string())).or_default();
        if list.iter().any(|r| r.listener == *listener) {
            return false;
        }
        list.push(RegisteredListener { listener: listener.clone(), options });
        true
    }

    pub fn remove(&mut self, target: EventTarget, event_type: &str, listener: &EventListener) -> bool {
        let key = (target, event_type.to_string());
        let Some(list) = self.entries.get_mut(&key) else {
            return false;
        };
        let before = list.len();
        list.retain(|r| r.listener != *listener);
        let removed = list.len() != before;
        if list.is_empty() {
            self.entries.remove(&key);
        }
        removed
    }

    pub fn contains(&self, target: EventTarget, event_type: &str, listener: &EventListener) -> bool {
        self.entries
            .get(&(target, event_type.to_string()))
            .is_some_and(|list| list.iter().any(|r| r.listener == *listener))
    }

    /// Copy of the current listeners, so callbacks can mutate the registry
    pub fn snapshot(&self, target: EventTarget, event_type: &str) -> Vec<RegisteredListener> {
        self.entries
            .get(&(target, event_type.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    pub fn count(&self, target: EventTarget, event_type: &str) -> usize {
        self.entries
            .get(&(target, event_type.to_string()))
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_defaults() {
        let click = Event::new("click", EventTarget::Node(NodeId(3)));
        assert!(click.bubbles);
        assert_eq!(click.current_target(), EventTarget::Node(NodeId(3)));

        let load = Event::new("load", EventTarget::Window);
        assert!(!load.bubbles);
        load.prevent_default();
        assert!(!load.is_default_prevented());
    }

    #[test]
    fn test_listener_identity() {
        let a = EventListener::new(|_| {});
        let b = EventListener::new(|_| {});
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_registry_dedup_and_remove() {
        let mut registry = ListenerRegistry::default();
        let listener = EventListener::new(|_| {});
        let target = EventTarget::Node(NodeId(1));

        assert!(registry.add(target, "click", &listener, ListenerOptions::default()));
        assert!(!registry.add(target, "click", &listener, ListenerOptions::default()));
        assert!(registry.add(target, "keyup", &listener, ListenerOptions::default()));
        assert_eq!(registry.count(target, "click"), 1);

        assert!(registry.remove(target, "click", &listener));
        assert!(!registry.remove(target, "click", &listener));
        assert!(registry.contains(target, "keyup", &listener));
    }
}
