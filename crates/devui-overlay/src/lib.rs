//! Overlay primitives for DevUI.
//!
//! One interaction model shared by three components:
//! - [`OverlayController`]: open/closed state and the single transition entry point
//! - [`Trigger`]: toggles the controller, chaining its child's own handler
//! - [`Surface`]: mounted only while open; holds dismissal listeners, the
//!   scroll lock and focus for exactly that long
//! - [`Item`]: reports its value, then closes
//!
//! Components receive their document through an explicit [`OverlayContext`].
//!
//! ```
//! use devui_core::{Key, OverlayOptions};
//! use devui_overlay::{OverlayContext, Select};
//! use devui_test::FakeDocument;
//!
//! let doc = FakeDocument::new();
//! let ctx = OverlayContext::new(doc.clone());
//! let select = Select::new(&ctx, &OverlayOptions::new()).item("json", "JSON");
//!
//! select.controller().toggle();
//! assert_eq!(doc.listener_count(), 2);
//! doc.key_down(Key::Escape);
//! assert!(!select.is_open());
//! assert_eq!(doc.listener_count(), 0);
//! ```

mod context;
mod controller;
mod dismiss;
mod focus;
mod item;
mod scroll_lock;
mod surface;
mod trigger;

#[cfg(feature = "dialog")]
mod dialog;
#[cfg(feature = "dropdown")]
mod dropdown;
#[cfg(feature = "select")]
mod select;

pub use context::OverlayContext;
pub use controller::{Cause, OpenChangeFn, OverlayController};
pub use dismiss::{DismissGuard, DismissPolicy, HitRegion};
pub use focus::FocusGuard;
pub use item::{Item, ValueChangeFn, ValueSink};
pub use scroll_lock::{ScrollLock, ScrollLockGuard};
pub use surface::{Surface, SurfaceBehavior};
pub use trigger::{ActivateFn, Activatable, Button, Trigger};

#[cfg(feature = "dialog")]
pub use dialog::{Dialog, KeyHandler};
#[cfg(feature = "dropdown")]
pub use dropdown::{DropdownMenu, MenuEntry};
#[cfg(feature = "select")]
pub use select::{Select, SelectButton};
