//! Window - the host event loop surface
//!
//! Owns the document, the listener registry, the animation-frame queue
//! and the viewport. Single-threaded: state sits behind `RefCell`s and no
//! borrow is held while a listener or frame callback runs, so callbacks
//! are free to query and mutate the tree, the registry and the queue.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use crate::dom_events::ListenerRegistry;
use crate::{
    Document, Element, Event, EventListener, EventTarget, ListenerOptions, NodeId, ReadyState,
    Viewport, WindowConfig,
};

/// Handle returned by `request_animation_frame`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

type FrameCallback = Box<dyn FnOnce(f64)>;

#[derive(Default)]
struct FrameQueue {
    next_handle: u64,
    pending: Vec<(FrameHandle, FrameCallback)>,
}

struct WindowInner {
    document: RefCell<Document>,
    listeners: RefCell<ListenerRegistry>,
    frames: RefCell<FrameQueue>,
    viewport: Cell<Viewport>,
    /// Timestamp of the most recent animation frame
    now: Cell<f64>,
}

/// Shared window handle; clones refer to the same window
#[derive(Clone)]
pub struct Window {
    inner: Rc<WindowInner>,
}

impl Window {
    /// Wrap a document in a window sized by `config`
    pub fn new(document: Document, config: &WindowConfig) -> Self {
        Self {
            inner: Rc::new(WindowInner {
                document: RefCell::new(document),
                listeners: RefCell::new(ListenerRegistry::default()),
                frames: RefCell::new(FrameQueue::default()),
                viewport: Cell::new(Viewport::new(config.viewport_width, config.viewport_height)),
                now: Cell::new(0.0),
            }),
        }
    }

    /// Borrow the document
    pub fn document(&self) -> Ref<'_, Document> {
        self.inner.document.borrow()
    }

    /// Borrow the document mutably
    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.inner.document.borrow_mut()
    }

    /// Element handle for `id`, if it names an element
    pub fn element(&self, id: NodeId) -> Option<Element> {
        self.document().tree().element(id)?;
        Some(Element::new(self.clone(), id))
    }

    /// Create a detached element and return its handle
    pub fn create_element(&self, local_name: &str) -> Element {
        let id = self.document_mut().create_element(local_name);
        Element::new(self.clone(), id)
    }

    /// Check whether two handles refer to the same window
    pub fn ptr_eq(&self, other: &Window) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Non-owning handle, for callbacks the window itself stores
    pub fn downgrade(&self) -> WeakWindow {
        WeakWindow { inner: Rc::downgrade(&self.inner) }
    }

    pub fn ready_state(&self) -> ReadyState {
        self.document().ready_state()
    }

    pub fn viewport(&self) -> Viewport {
        self.inner.viewport.get()
    }

    pub fn inner_width(&self) -> f64 {
        self.viewport().width
    }

    pub fn inner_height(&self) -> f64 {
        self.viewport().height
    }

    /// Timestamp of the last animation frame
    pub fn now(&self) -> f64 {
        self.inner.now.get()
    }

    /// Resize the viewport and fire `resize`
    pub fn resize(&self, width: f64, height: f64) {
        let mut viewport = self.viewport();
        viewport.width = width.max(0.0);
        viewport.height = height.max(0.0);
        self.inner.viewport.set(viewport);
        self.dispatch_event(Event::new("resize", EventTarget::Window));
    }

    /// Scroll the document and fire `scroll` at the window
    pub fn scroll_to(&self, x: f64, y: f64) {
        let mut viewport = self.viewport();
        viewport.scroll_x = x.max(0.0);
        viewport.scroll_y = y.max(0.0);
        self.inner.viewport.set(viewport);
        self.dispatch_event(Event::new("scroll", EventTarget::Window));
    }

    /// Register a listener; returns false if it was already registered
    pub fn add_event_listener(&self, target: EventTarget, event_type: &str, listener: &EventListener) -> bool {
        self.add_event_listener_with_options(target, event_type, listener, ListenerOptions::default())
    }

    pub fn add_event_listener_with_options(
        &self,
        target: EventTarget,
        event_type: &str,
        listener: &EventListener,
        options: ListenerOptions,
    ) -> bool {
        self.inner
            .listeners
            .borrow_mut()
            .add(target, event_type, listener, options)
    }

    /// Unregister a listener; returns whether it was registered
    pub fn remove_event_listener(&self, target: EventTarget, event_type: &str, listener: &EventListener) -> bool {
        self.inner
            .listeners
            .borrow_mut()
            .remove(target, event_type, listener)
    }

    /// Number of listeners registered for a target and type
    pub fn listener_count(&self, target: EventTarget, event_type: &str) -> usize {
        self.inner.listeners.borrow().count(target, event_type)
    }

    /// Propagation path: the target, then (when bubbling) its ancestors,
    /// the document and the window
    fn event_path(&self, event: &Event) -> Vec<EventTarget> {
        let target = event.target();
        if !event.bubbles {
            return vec![target];
        }
        match target {
            EventTarget::Window => vec![EventTarget::Window],
            EventTarget::Document => vec![EventTarget::Document, EventTarget::Window],
            EventTarget::Node(id) => {
                let doc = self.document();
                let tree = doc.tree();
                let mut path = vec![target];
                let mut cursor = tree.parent(id);
                while let Some(parent) = cursor {
                    if parent == tree.root() {
                        path.push(EventTarget::Document);
                        path.push(EventTarget::Window);
                        break;
                    }
                    path.push(EventTarget::Node(parent));
                    cursor = tree.parent(parent);
                }
                path
            }
        }
    }

    /// Dispatch an event along its path; returns false if a listener
    /// cancelled it
    pub fn dispatch_event(&self, mut event: Event) -> bool {
        event.timestamp = self.now();
        let path = self.event_path(&event);
        tracing::trace!("dispatch {} to {:?} ({} targets)", event.event_type(), event.target(), path.len());

        for target in path {
            event.set_current_target(target);
            let listeners = self.inner.listeners.borrow().snapshot(target, event.event_type());
            for registered in listeners {
                // Skip listeners removed by an earlier listener in this dispatch
                if !self.inner.listeners.borrow().contains(target, event.event_type(), &registered.listener) {
                    continue;
                }
                if registered.options.once {
                    self.remove_event_listener(target, event.event_type(), &registered.listener);
                }
                registered.listener.handle_event(&event);
            }
            if event.is_propagation_stopped() {
                break;
            }
        }
        !event.is_default_prevented()
    }

    /// Queue a callback for the next animation frame
    pub fn request_animation_frame(&self, callback: impl FnOnce(f64) + 'static) -> FrameHandle {
        let mut frames = self.inner.frames.borrow_mut();
        frames.next_handle += 1;
        let handle = FrameHandle(frames.next_handle);
        frames.pending.push((handle, Box::new(callback)));
        handle
    }

    /// Drop a queued frame callback; returns whether it was still pending
    pub fn cancel_animation_frame(&self, handle: FrameHandle) -> bool {
        let mut frames = self.inner.frames.borrow_mut();
        let before = frames.pending.len();
        frames.pending.retain(|(h, _)| *h != handle);
        before != frames.pending.len()
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending_animation_frames(&self) -> usize {
        self.inner.frames.borrow().pending.len()
    }

    /// Render one frame: run every callback queued before this call.
    /// Callbacks requested while the frame runs wait for the next one.
    pub fn run_animation_frame(&self, timestamp: f64) -> usize {
        self.inner.now.set(timestamp);
        let callbacks = std::mem::take(&mut self.inner.frames.borrow_mut().pending);
        let count = callbacks.len();
        tracing::trace!("animation frame at {timestamp}: {count} callbacks");
        for (_, callback) in callbacks {
            callback(timestamp);
        }
        count
    }

    /// Mark the document parsed: `Interactive`, then `DOMContentLoaded`
    pub fn finish_parsing(&self) {
        if self.ready_state() != ReadyState::Loading {
            return;
        }
        self.set_ready_state(ReadyState::Interactive);
        self.dispatch_event(Event::new("DOMContentLoaded", EventTarget::Document));
    }

    /// Mark the document fully loaded: `Complete`, then `load`
    pub fn finish_loading(&self) {
        self.finish_parsing();
        if self.ready_state() == ReadyState::Complete {
            return;
        }
        self.set_ready_state(ReadyState::Complete);
        self.dispatch_event(Event::new("load", EventTarget::Window));
    }

    fn set_ready_state(&self, state: ReadyState) {
        self.document_mut().set_ready_state(state);
        tracing::debug!("document ready state: {}", state.as_str());
        self.dispatch_event(Event::new("readystatechange", EventTarget::Document));
    }
}

/// Weak window handle; does not keep the window alive
#[derive(Clone)]
pub struct WeakWindow {
    inner: Weak<WindowInner>,
}

impl WeakWindow {
    pub fn upgrade(&self) -> Option<Window> {
        self.inner.upgrade().map(|inner| Window { inner })
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("viewport", &self.viewport())
            .field("now", &self.now())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn window() -> Window {
        let doc = Document::new(WindowConfig::default().parsed_url().unwrap()).unwrap();
        Window::new(doc, &WindowConfig::default())
    }

    fn recorder(log: &Rc<RefCell<Vec<String>>>, label: &str) -> EventListener {
        let log = Rc::clone(log);
        let label = label.to_string();
        EventListener::new(move |event| log.borrow_mut().push(format!("{label}:{}", event.event_type())))
    }

    #[test]
    fn test_bubbling_path() {
        let win = window();
        let body = win.document().body().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));

        win.add_event_listener(EventTarget::Node(body), "click", &recorder(&log, "body"));
        win.add_event_listener(EventTarget::Document, "click", &recorder(&log, "doc"));
        win.add_event_listener(EventTarget::Window, "click", &recorder(&log, "win"));

        win.dispatch_event(Event::new("click", EventTarget::Node(body)));
        assert_eq!(*log.borrow(), vec!["body:click", "doc:click", "win:click"]);
    }

    #[test]
    fn test_stop_propagation() {
        let win = window();
        let body = win.document().body().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));

        let stopper = EventListener::new(|event| event.stop_propagation());
        win.add_event_listener(EventTarget::Node(body), "click", &stopper);
        win.add_event_listener(EventTarget::Node(body), "click", &recorder(&log, "body"));
        win.add_event_listener(EventTarget::Document, "click", &recorder(&log, "doc"));

        win.dispatch_event(Event::new("click", EventTarget::Node(body)));
        assert_eq!(*log.borrow(), vec!["body:click"]);
    }

    #[test]
    fn test_once_listener() {
        let win = window();
        let log = Rc::new(RefCell::new(Vec::new()));
        let listener = recorder(&log, "w");
        win.add_event_listener_with_options(EventTarget::Window, "ping", &listener, ListenerOptions { once: true });

        win.dispatch_event(Event::new("ping", EventTarget::Window));
        win.dispatch_event(Event::new("ping", EventTarget::Window));
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(win.listener_count(EventTarget::Window, "ping"), 0);
    }

    #[test]
    fn test_listener_removed_mid_dispatch_is_skipped() {
        let win = window();
        let log = Rc::new(RefCell::new(Vec::new()));
        let second = recorder(&log, "second");

        let remover = {
            let win = win.clone();
            let second = second.clone();
            EventListener::new(move |_| {
                win.remove_event_listener(EventTarget::Window, "ping", &second);
            })
        };
        win.add_event_listener(EventTarget::Window, "ping", &remover);
        win.add_event_listener(EventTarget::Window, "ping", &second);

        win.dispatch_event(Event::new("ping", EventTarget::Window));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_animation_frames() {
        let win = window();
        let hits = Rc::new(Cell::new(0));

        let h = Rc::clone(&hits);
        let inner_win = win.clone();
        win.request_animation_frame(move |_| {
            h.set(h.get() + 1);
            let h2 = Rc::clone(&h);
            inner_win.request_animation_frame(move |_| h2.set(h2.get() + 10));
        });
        let cancelled = win.request_animation_frame(|_| panic!("cancelled frame ran"));
        assert!(win.cancel_animation_frame(cancelled));

        assert_eq!(win.run_animation_frame(16.0), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(win.pending_animation_frames(), 1);
        assert_eq!(win.run_animation_frame(32.0), 1);
        assert_eq!(hits.get(), 11);
        assert_eq!(win.now(), 32.0);
    }

    #[test]
    fn test_ready_state_transitions() {
        let win = window();
        let log = Rc::new(RefCell::new(Vec::new()));
        win.add_event_listener(EventTarget::Document, "DOMContentLoaded", &recorder(&log, "doc"));
        win.add_event_listener(EventTarget::Window, "load", &recorder(&log, "win"));

        win.finish_loading();
        win.finish_loading();
        assert_eq!(win.ready_state(), ReadyState::Complete);
        assert_eq!(*log.borrow(), vec!["doc:DOMContentLoaded", "win:load"]);
    }

    #[test]
    fn test_scroll_updates_viewport() {
        let win = window();
        let log = Rc::new(RefCell::new(Vec::new()));
        win.add_event_listener(EventTarget::Window, "scroll", &recorder(&log, "win"));

        win.scroll_to(0.0, 120.0);
        win.scroll_to(0.0, -500.0);
        assert_eq!(win.viewport().scroll_y, 0.0);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_weak_window_does_not_keep_alive() {
        let win = window();
        let weak = win.downgrade();
        assert!(weak.upgrade().is_some_and(|w| w.ptr_eq(&win)));

        drop(win);
        assert!(weak.upgrade().is_none());
    }
}
