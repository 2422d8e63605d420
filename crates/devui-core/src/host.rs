//! The document seam between overlay components and whatever renders them.
//!
//! Overlays never reach for a global document. They receive a [`Host`]
//! handle and use it to register document-level listeners, toggle the
//! background scroll lock and move focus. The browser bridge implements it
//! over `web-sys`; tests use an in-memory document.

use crate::event::Event;
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

const DOM_ID_PREFIX: &str = "devui-";

/// Identity of a rendered node (surface, trigger, item).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Allocate a fresh, process-unique id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The `id` attribute used for this node in rendered markup.
    #[must_use]
    pub fn dom_id(&self) -> String {
        format!("{DOM_ID_PREFIX}{}", self.0)
    }

    /// Parse a value produced by [`NodeId::dom_id`].
    #[must_use]
    pub fn from_dom_id(id: &str) -> Option<Self> {
        id.strip_prefix(DOM_ID_PREFIX)?.parse().ok().map(Self)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DOM_ID_PREFIX}{}", self.0)
    }
}

/// Kinds of document-level listeners overlays install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListenerKind {
    /// Pointer (or mouse) pressed anywhere in the document
    PointerDown,
    /// Key pressed anywhere in the document
    KeyDown,
}

impl ListenerKind {
    /// DOM event type name.
    #[must_use]
    pub const fn dom_event_type(&self) -> &'static str {
        match self {
            Self::PointerDown => "pointerdown",
            Self::KeyDown => "keydown",
        }
    }

    /// Whether an event is delivered to listeners of this kind.
    #[must_use]
    pub const fn accepts(&self, event: &Event) -> bool {
        match self {
            Self::PointerDown => event.is_press(),
            Self::KeyDown => matches!(event, Event::KeyDown { .. }),
        }
    }
}

/// Dispatch phase a listener is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Runs before any target handler
    Capture,
    /// Runs after target handlers
    #[default]
    Bubble,
}

/// Host-assigned handle for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// A document-level event handler.
pub type Listener = Rc<dyn Fn(&Event)>;

/// Document services an overlay needs.
///
/// All methods take `&self`: hosts are shared by handle and may be re-entered
/// from inside a listener (a dismissal listener closes its overlay, which
/// removes that same listener).
pub trait Host {
    /// Register a document-level listener.
    fn add_listener(&self, kind: ListenerKind, phase: Phase, listener: Listener) -> ListenerId;

    /// Unregister a listener. Returns false if it was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;

    /// Suppress or restore background scrolling.
    fn set_scroll_locked(&self, locked: bool);

    /// Node that currently has focus, if the host tracks one.
    fn active_element(&self) -> Option<NodeId>;

    /// Move focus to a node.
    fn focus(&self, node: NodeId);

    /// Bounds of a rendered node as measured by the host.
    ///
    /// Hosts without layout return `None` and callers fall back to the
    /// bounds they were laid out with.
    fn node_bounds(&self, _node: NodeId) -> Option<Rect> {
        None
    }
}

/// Errors constructing a host.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostError {
    /// No global window object.
    #[error("no window available")]
    NoWindow,
    /// Window has no document.
    #[error("window has no document")]
    NoDocument,
    /// Document has no body element.
    #[error("document has no body")]
    NoBody,
    /// A host call was rejected.
    #[error("host call failed: {0}")]
    Rejected(String),
}
