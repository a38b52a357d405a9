//! Simpli DOM - Document Object Model
//!
//! Arena-based DOM tree plus the host services the simpli library consumes:
//! selector queries, inline style text, event listeners and interval timers.

mod attributes;
mod classlist;
mod document;
mod error;
mod events;
mod node;
mod query;
mod serialize;
mod style;
mod timers;
mod tree;

pub use attributes::{Attr, NamedNodeMap};
pub use classlist::ClassList;
pub use document::{Document, ReadyState, SharedDocument, finish_loading};
pub use error::{DomError, DomResult};
pub use events::{
    DomEvent, EventListenerRegistry, EventPhase, EventSupport, Listener, ListenerId,
    ListenerOptions, dispatch_event,
};
pub use node::{ElementData, Node, NodeData};
pub use query::{Selector, SelectorList};
pub use style::StyleDeclaration;
pub use timers::{TimerCallback, TimerId, TimerManager};
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The document node
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}
