//! nano DOM - Host Document Object Model
//!
//! Arena-backed DOM tree plus the window that drives it: ready state,
//! viewport, scrolling, event dispatch and animation frames.

mod attributes;
mod classlist;
mod config;
mod document;
mod dom_events;
mod element;
mod error;
mod geometry;
mod node;
mod node_list;
mod style;
mod tree;
mod window;

pub use attributes::{Attr, NamedNodeMap};
pub use classlist::DOMTokenList;
pub use config::WindowConfig;
pub use document::{Document, ReadyState};
pub use dom_events::{Event, EventListener, EventTarget, ListenerOptions};
pub use element::Element;
pub use error::{DomError, DomResult};
pub use geometry::{DOMRect, Viewport};
pub use node::{ElementData, Node, NodeData};
pub use node_list::NodeList;
pub use style::InlineStyle;
pub use tree::{Descendants, DomTree};
pub use window::{FrameHandle, WeakWindow, Window};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this is not the sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Convert a sentinel-encoded link into an `Option`
    #[inline]
    pub(crate) fn some(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}
