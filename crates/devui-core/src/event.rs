//! Input events delivered to overlays and to document-level listeners.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Input event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Mouse moved to position
    MouseMove {
        /// New position
        position: Point,
    },
    /// Mouse button pressed
    MouseDown {
        /// Position of press
        position: Point,
        /// Button pressed
        button: MouseButton,
    },
    /// Mouse button released; a release over the pressed element is a click
    MouseUp {
        /// Position of release
        position: Point,
        /// Button released
        button: MouseButton,
    },
    /// Pointer pressed (mouse, touch or pen)
    PointerDown {
        /// Pointer ID
        pointer_id: PointerId,
        /// Pointer type
        pointer_type: PointerType,
        /// Position
        position: Point,
    },
    /// Key pressed
    KeyDown {
        /// Key pressed
        key: Key,
    },
    /// Key released
    KeyUp {
        /// Key released
        key: Key,
    },
    /// Element gained focus
    FocusIn,
    /// Element lost focus
    FocusOut,
}

impl Event {
    /// Position carried by pointer-like events.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        match self {
            Self::MouseMove { position }
            | Self::MouseDown { position, .. }
            | Self::MouseUp { position, .. }
            | Self::PointerDown { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Whether this is a press that should count for outside dismissal.
    #[must_use]
    pub const fn is_press(&self) -> bool {
        matches!(
            self,
            Self::MouseDown { .. } | Self::PointerDown { .. }
        )
    }

    /// Whether this event activates a focused control: a primary click,
    /// Enter or Space.
    #[must_use]
    pub const fn is_activation(&self) -> bool {
        matches!(
            self,
            Self::MouseUp {
                button: MouseButton::Left,
                ..
            } | Self::KeyDown {
                key: Key::Enter | Key::Space,
            }
        )
    }
}

/// Pointer identifier for pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PointerId(pub u32);

/// Type of pointer device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PointerType {
    /// Mouse pointer
    #[default]
    Mouse,
    /// Touch pointer
    Touch,
    /// Pen/stylus pointer
    Pen,
}

impl From<&str> for PointerType {
    fn from(s: &str) -> Self {
        match s {
            "touch" => Self::Touch,
            "pen" => Self::Pen,
            _ => Self::Mouse,
        }
    }
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (wheel click)
    Middle,
}

/// Keyboard key identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Enter/Return
    Enter,
    /// Escape
    Escape,
    /// Space bar
    Space,
    /// Tab
    Tab,
    /// Backspace
    Backspace,
    /// Delete
    Delete,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Home
    Home,
    /// End
    End,
    /// Any printable character
    Char(char),
    /// A key with no dedicated variant
    Unidentified,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value to a key.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            " " | "Spacebar" => Self::Space,
            "Tab" => Self::Tab,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "ArrowUp" => Self::Up,
            "ArrowDown" => Self::Down,
            "ArrowLeft" => Self::Left,
            "ArrowRight" => Self::Right,
            "Home" => Self::Home,
            "End" => Self::End,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => {
                        tracing::trace!(key = other, "unidentified DOM key");
                        Self::Unidentified
                    }
                }
            }
        }
    }
}
