//! Document-level dismissal listeners.
//!
//! While a surface is mounted it holds a [`DismissGuard`]: the set of
//! document listeners that close the overlay on an outside press or on
//! Escape. Dropping the guard unregisters every one of them, whichever way
//! the surface goes away.

use crate::controller::{Cause, OverlayController};
use devui_core::{Event, Host, Key, ListenerId, ListenerKind, NodeId, Phase, Point, Rect};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::{Rc, Weak};

/// Which dismissal sources a surface listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DismissPolicy {
    /// Close on a pointer press outside the surface
    pub outside: bool,
    /// Close on Escape
    pub escape: bool,
}

impl DismissPolicy {
    /// No dismissal listeners.
    pub const NONE: Self = Self {
        outside: false,
        escape: false,
    };

    /// Outside press and Escape.
    pub const ALL: Self = Self {
        outside: true,
        escape: true,
    };
}

/// The area that counts as "inside" an overlay.
///
/// That is the surface itself plus, optionally, its anchor (the trigger). A
/// press on the trigger toggles the overlay; treating it as outside would
/// close and then immediately reopen it.
#[derive(Debug)]
pub struct HitRegion {
    surface: NodeId,
    bounds: Cell<Rect>,
    anchor: Cell<Option<(NodeId, Rect)>>,
}

impl HitRegion {
    /// Create a region for a surface node with no known bounds.
    #[must_use]
    pub fn new(surface: NodeId) -> Rc<Self> {
        Rc::new(Self {
            surface,
            bounds: Cell::new(Rect::default()),
            anchor: Cell::new(None),
        })
    }

    /// Surface node.
    #[must_use]
    pub const fn surface(&self) -> NodeId {
        self.surface
    }

    /// Laid-out surface bounds.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    /// Record laid-out surface bounds.
    pub fn set_bounds(&self, bounds: Rect) {
        self.bounds.set(bounds);
    }

    /// Record the anchor node and its laid-out bounds.
    pub fn set_anchor(&self, node: NodeId, bounds: Rect) {
        self.anchor.set(Some((node, bounds)));
    }

    /// Anchor node, if any.
    #[must_use]
    pub fn anchor(&self) -> Option<NodeId> {
        self.anchor.get().map(|(node, _)| node)
    }

    /// Whether `point` falls inside the surface or its anchor.
    ///
    /// Host-measured bounds win over laid-out bounds. Empty bounds contain
    /// nothing.
    #[must_use]
    pub fn contains(&self, host: &dyn Host, point: Point) -> bool {
        let hit = |node: NodeId, fallback: Rect| {
            let rect = host.node_bounds(node).unwrap_or(fallback);
            !rect.is_empty() && rect.contains_point(&point)
        };
        hit(self.surface, self.bounds.get())
            || self
                .anchor
                .get()
                .is_some_and(|(node, rect)| hit(node, rect))
    }
}

/// Registered dismissal listeners, unregistered on drop.
pub struct DismissGuard {
    host: Rc<dyn Host>,
    ids: Vec<ListenerId>,
}

impl DismissGuard {
    /// Register the listeners `policy` asks for.
    ///
    /// The outside-press listener runs in the capture phase so it sees the
    /// press before any element handler can stop it.
    #[must_use = "dropping the guard unregisters the listeners immediately"]
    pub fn acquire(
        host: &Rc<dyn Host>,
        policy: DismissPolicy,
        controller: &OverlayController,
        region: &Rc<HitRegion>,
    ) -> Self {
        let mut ids = Vec::with_capacity(2);

        if policy.outside {
            let controller = controller.clone();
            let region = Rc::clone(region);
            let weak_host: Weak<dyn Host> = Rc::downgrade(host);
            let id = host.add_listener(
                ListenerKind::PointerDown,
                Phase::Capture,
                Rc::new(move |event: &Event| {
                    let (Some(position), Some(host)) = (event.position(), weak_host.upgrade())
                    else {
                        return;
                    };
                    if region.contains(&*host, position) {
                        tracing::trace!(surface = %region.surface(), "press inside overlay");
                    } else {
                        controller.request(false, Cause::OutsidePress);
                    }
                }),
            );
            ids.push(id);
        }

        if policy.escape {
            let controller = controller.clone();
            let id = host.add_listener(
                ListenerKind::KeyDown,
                Phase::Bubble,
                Rc::new(move |event: &Event| {
                    if matches!(event, Event::KeyDown { key: Key::Escape }) {
                        controller.request(false, Cause::Escape);
                    }
                }),
            );
            ids.push(id);
        }

        tracing::debug!(listeners = ids.len(), ?policy, "dismissal listeners registered");
        Self {
            host: Rc::clone(host),
            ids,
        }
    }

    /// Handles of the registered listeners.
    #[must_use]
    pub fn listener_ids(&self) -> &[ListenerId] {
        &self.ids
    }
}

impl Drop for DismissGuard {
    fn drop(&mut self) {
        let count = self.ids.len();
        for id in self.ids.drain(..) {
            self.host.remove_listener(id);
        }
        tracing::debug!(listeners = count, "dismissal listeners released");
    }
}
