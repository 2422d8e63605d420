//! DevUI: overlay primitives (dialog, dropdown menu, select) for the
//! developer-tools pages, plus a browser host.
//!
//! # Browser Usage (WASM)
//!
//! ```ignore
//! use devui::browser::DomHost;
//! use devui::overlay::{OverlayContext, Select};
//! use devui::OverlayOptions;
//! use std::rc::Rc;
//!
//! let host = Rc::new(DomHost::new()?);
//! let ctx = OverlayContext::new(host);
//! let select = Select::new(&ctx, &OverlayOptions::new()).item("json", "JSON");
//! ```

pub use devui_core::*;
pub use devui_overlay as overlay;

pub mod browser;
