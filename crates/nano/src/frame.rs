//! Frame-synced scroll callbacks
//!
//! Collapses any number of scroll events into at most one callback per
//! animation frame.

use std::cell::Cell;
use std::rc::Rc;

use nano_dom::{EventListener, EventTarget, Window};

/// Per-registration pending-frame flag
#[derive(Debug, Default)]
pub struct FrameTicker {
    ticking: Cell<bool>,
}

impl FrameTicker {
    /// Claim the next frame; false if one is already requested
    fn request(&self) -> bool {
        !self.ticking.replace(true)
    }

    fn release(&self) {
        self.ticking.set(false);
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking.get()
    }
}

/// A `raf` registration
#[derive(Debug, Clone)]
pub struct ScrollSync {
    listener: EventListener,
    ticker: Rc<FrameTicker>,
}

impl ScrollSync {
    /// The window scroll listener, for `remove_event_listener`
    pub fn listener(&self) -> &EventListener {
        &self.listener
    }

    /// Whether a frame has been requested and not yet run
    pub fn is_pending(&self) -> bool {
        self.ticker.is_ticking()
    }
}

/// Call `callback` on the animation frame following a window scroll,
/// at most once per frame
pub fn raf(window: &Window, callback: impl Fn() + 'static) -> ScrollSync {
    let ticker = Rc::new(FrameTicker::default());
    let callback: Rc<dyn Fn()> = Rc::new(callback);

    // Weak so the window's own registry does not keep it alive
    let weak = window.downgrade();
    let scroll_ticker = Rc::clone(&ticker);
    let listener = EventListener::new(move |_| {
        let Some(window) = weak.upgrade() else {
            return;
        };
        if !scroll_ticker.request() {
            return;
        }
        let ticker = Rc::clone(&scroll_ticker);
        let callback = Rc::clone(&callback);
        window.request_animation_frame(move |_| {
            callback();
            ticker.release();
        });
    });

    window.add_event_listener(EventTarget::Window, "scroll", &listener);
    ScrollSync { listener, ticker }
}
