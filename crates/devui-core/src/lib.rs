//! Core types for DevUI overlays.
//!
//! This crate provides the pieces every overlay component builds on:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Input events: [`Event`], [`Key`], [`MouseButton`]
//! - Rendered output: [`Markup`]
//! - The document seam: [`Host`], [`NodeId`], [`ListenerKind`]
//! - Construction options: [`OverlayOptions`], [`Align`]

mod config;
mod event;
mod geometry;
mod host;
mod markup;

pub use config::{Align, ConfigError, OverlayOptions};
pub use event::{Event, Key, MouseButton, PointerId, PointerType};
pub use geometry::{Point, Rect, Size};
pub use host::{Host, HostError, Listener, ListenerId, ListenerKind, NodeId, Phase};
pub use markup::Markup;
