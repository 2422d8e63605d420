//! Focus hand-off while a surface is mounted.

use devui_core::{Host, NodeId};
use std::cell::Cell;
use std::rc::Rc;

/// Moves focus into a surface and returns it on drop.
///
/// The surface element may not exist yet when the guard is acquired, since
/// mounting happens before the page renders. The hand-off then stays
/// pending until [`FocusGuard::settle`] runs after the render.
pub struct FocusGuard {
    host: Rc<dyn Host>,
    target: NodeId,
    previous: Option<NodeId>,
    settled: Cell<bool>,
}

impl FocusGuard {
    /// Remember the active element, then try to focus `target`.
    #[must_use = "dropping the guard restores focus immediately"]
    pub fn acquire(host: &Rc<dyn Host>, target: NodeId) -> Self {
        let previous = host.active_element();
        let guard = Self {
            host: Rc::clone(host),
            target,
            previous,
            settled: Cell::new(false),
        };
        if guard.settle() {
            tracing::debug!(%target, ?previous, "focus moved into surface");
        } else {
            tracing::debug!(%target, "focus pending until render");
        }
        guard
    }

    /// Complete a pending hand-off. Returns whether focus is in the target.
    pub fn settle(&self) -> bool {
        if !self.settled.get() {
            self.host.focus(self.target);
            self.settled
                .set(self.host.active_element() == Some(self.target));
        }
        self.settled.get()
    }

    /// Whether focus has reached the target.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settled.get()
    }

    /// Node focus returns to.
    #[must_use]
    pub const fn previous(&self) -> Option<NodeId> {
        self.previous
    }
}

impl Drop for FocusGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous {
            self.host.focus(previous);
        }
    }
}
