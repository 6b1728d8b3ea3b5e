//! Document ready gate

use std::cell::RefCell;

use nano_dom::{EventListener, EventTarget, ListenerOptions, ReadyState, Window};

/// Run `callback` once the document has been parsed.
///
/// Runs synchronously if parsing already finished, otherwise on the
/// first `DOMContentLoaded`.
pub fn ready(window: &Window, callback: impl FnOnce() + 'static) {
    if window.ready_state() != ReadyState::Loading {
        tracing::trace!("document already {}, running ready callback", window.ready_state().as_str());
        callback();
        return;
    }

    let slot = RefCell::new(Some(callback));
    let listener = EventListener::new(move |_| {
        if let Some(callback) = slot.borrow_mut().take() {
            callback();
        }
    });
    window.add_event_listener_with_options(
        EventTarget::Document,
        "DOMContentLoaded",
        &listener,
        ListenerOptions { once: true },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use nano_dom::{Document, WindowConfig};
    use std::cell::Cell;
    use std::rc::Rc;

    fn window() -> Window {
        let config = WindowConfig::default();
        Window::new(Document::new(config.parsed_url().unwrap()).unwrap(), &config)
    }

    #[test]
    fn test_ready_after_interactive_runs_now() {
        let win = window();
        win.finish_parsing();

        let ran = Rc::new(Cell::new(false));
        let r = Rc::clone(&ran);
        ready(&win, move || r.set(true));
        assert!(ran.get());
    }

    #[test]
    fn test_ready_listener_is_removed_after_firing() {
        let win = window();
        ready(&win, || {});
        assert_eq!(win.listener_count(EventTarget::Document, "DOMContentLoaded"), 1);

        win.finish_parsing();
        assert_eq!(win.listener_count(EventTarget::Document, "DOMContentLoaded"), 0);
    }
}
