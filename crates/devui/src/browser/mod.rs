//! Browser runtime for DevUI overlays.
//!
//! Bridges the overlay [`Host`](devui_core::Host) seam to the page's
//! document through `web-sys`.

// WASM-only modules
#[cfg(target_arch = "wasm32")]
mod dom_host;
#[cfg(target_arch = "wasm32")]
pub mod events;
#[cfg(target_arch = "wasm32")]
mod runtime;

#[cfg(target_arch = "wasm32")]
pub use dom_host::DomHost;
#[cfg(target_arch = "wasm32")]
pub use runtime::{init, log};
