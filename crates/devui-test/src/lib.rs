//! Testing harness for DevUI overlays.
//!
//! Zero external dependencies beyond `devui-core`. The [`FakeDocument`]
//! stands in for a browser document so overlay behavior can be driven and
//! inspected from plain `cargo test`.
//!
//! ```
//! use devui_core::{Event, Host, Key, ListenerKind, Phase};
//! use devui_test::FakeDocument;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let doc = FakeDocument::new();
//! let hits = Rc::new(Cell::new(0));
//! let seen = hits.clone();
//! let id = doc.add_listener(ListenerKind::KeyDown, Phase::Capture, Rc::new(move |_: &Event| {
//!     seen.set(seen.get() + 1);
//! }));
//! doc.key_down(Key::Escape);
//! assert_eq!(hits.get(), 1);
//! assert!(doc.remove_listener(id));
//! assert_eq!(doc.listener_count(), 0);
//! ```

mod document;

pub use document::{FakeDocument, Journal};
