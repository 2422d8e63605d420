//! Open/closed state shared by a trigger, a surface and its items.
//!
//! The controller is the only place overlay visibility changes. Triggers,
//! dismissal listeners and items all call [`OverlayController::set_open`]
//! (or its cause-tagged sibling) instead of touching state themselves.
//!
//! Two ownership modes mirror how pages embed overlays:
//! - **Uncontrolled**: the controller owns the flag. A transition applies
//!   immediately, re-renders mounted surfaces, then reports the new value
//!   through `on_open_change`.
//! - **Controlled**: the page owns the flag. A transition only reports the
//!   requested value; the page applies it with [`OverlayController::sync_open`].

use devui_core::OverlayOptions;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Callback receiving the next open value.
pub type OpenChangeFn = Rc<dyn Fn(bool)>;

/// What caused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cause {
    /// Trigger activated
    Trigger,
    /// Pointer pressed outside the surface
    OutsidePress,
    /// Escape pressed
    Escape,
    /// An item was selected
    ItemSelected,
    /// Close button activated
    CloseButton,
    /// Set from code
    Programmatic,
}

/// Something re-rendered when the open flag changes.
pub(crate) trait OpenObserver {
    /// Bring rendered state in line with the controller.
    fn sync(&self);
}

struct ControllerInner {
    open: Cell<bool>,
    controlled: bool,
    last_cause: Cell<Option<Cause>>,
    on_open_change: RefCell<Option<OpenChangeFn>>,
    observers: RefCell<Vec<Weak<dyn OpenObserver>>>,
}

/// Shared handle to an overlay's open state.
#[derive(Clone)]
pub struct OverlayController {
    inner: Rc<ControllerInner>,
}

impl Default for OverlayController {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OverlayController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayController")
            .field("open", &self.inner.open.get())
            .field("controlled", &self.inner.controlled)
            .field("last_cause", &self.inner.last_cause.get())
            .finish_non_exhaustive()
    }
}

impl OverlayController {
    fn with_mode(open: bool, controlled: bool) -> Self {
        Self {
            inner: Rc::new(ControllerInner {
                open: Cell::new(open),
                controlled,
                last_cause: Cell::new(None),
                on_open_change: RefCell::new(None),
                observers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Create an uncontrolled controller, initially closed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_mode(false, false)
    }

    /// Create a controlled controller with the page-supplied value.
    #[must_use]
    pub fn controlled(open: bool) -> Self {
        Self::with_mode(open, true)
    }

    /// Controlled when `options.open` is set, uncontrolled otherwise.
    #[must_use]
    pub fn from_options(options: &OverlayOptions) -> Self {
        options.open.map_or_else(Self::new, Self::controlled)
    }

    /// Current visibility.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.open.get()
    }

    /// Whether the page owns the open flag.
    #[must_use]
    pub fn is_controlled(&self) -> bool {
        self.inner.controlled
    }

    /// Cause of the most recently applied transition.
    #[must_use]
    pub fn last_cause(&self) -> Option<Cause> {
        self.inner.last_cause.get()
    }

    /// Install the open-change callback, replacing any previous one.
    pub fn set_on_open_change(&self, callback: impl Fn(bool) + 'static) {
        *self.inner.on_open_change.borrow_mut() = Some(Rc::new(callback));
    }

    /// Request a new open value. Equal values are a no-op.
    pub fn set_open(&self, next: bool) {
        self.request(next, Cause::Programmatic);
    }

    /// Request the opposite of the current value.
    pub fn toggle(&self) {
        self.request(!self.is_open(), Cause::Trigger);
    }

    /// Request a transition on behalf of `cause`.
    ///
    /// Returns false when `next` already equals the current value.
    pub fn request(&self, next: bool, cause: Cause) -> bool {
        if next == self.is_open() {
            tracing::trace!(open = next, ?cause, "overlay transition ignored: unchanged");
            return false;
        }
        if !self.inner.controlled {
            self.apply(next, cause);
        }
        self.emit(next);
        true
    }

    /// Apply a value supplied by the page (a controlled prop update).
    ///
    /// Re-renders observers but does not call `on_open_change`.
    pub fn sync_open(&self, open: bool) {
        if open != self.is_open() {
            self.apply(open, Cause::Programmatic);
        }
    }

    fn apply(&self, open: bool, cause: Cause) {
        self.inner.open.set(open);
        self.inner.last_cause.set(Some(cause));
        tracing::debug!(open, ?cause, controlled = self.inner.controlled, "overlay transition");
        self.notify();
    }

    fn emit(&self, next: bool) {
        let callback = self.inner.on_open_change.borrow().clone();
        if let Some(callback) = callback {
            callback(next);
        }
    }

    fn notify(&self) {
        let live: Vec<Rc<dyn OpenObserver>> = {
            let mut observers = self.inner.observers.borrow_mut();
            observers.retain(|o| o.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        for observer in live {
            observer.sync();
        }
    }

    pub(crate) fn subscribe(&self, observer: Weak<dyn OpenObserver>) {
        self.inner.observers.borrow_mut().push(observer);
    }

    /// Number of live observers (mounted or unmounted surfaces).
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner
            .observers
            .borrow()
            .iter()
            .filter(|o| o.strong_count() > 0)
            .count()
    }
}
