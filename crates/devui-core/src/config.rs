//! Overlay construction options.
//!
//! Options are plain data so pages can declare overlays in JSON or YAML.
//! Every behavior switch is optional; `None` keeps the variant's default
//! (a dialog locks scrolling, a dropdown ignores Escape, and so on).
//!
//! ```
//! use devui_core::{Align, OverlayOptions};
//!
//! let opts = OverlayOptions::from_yaml("align: end\nclose_on_escape: true\n").unwrap();
//! assert_eq!(opts.align, Align::End);
//! assert_eq!(opts.close_on_escape, Some(true));
//! assert_eq!(opts.open, None);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Horizontal alignment of a surface relative to its trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Left edges aligned
    Start,
    /// Centered under the trigger
    #[default]
    Center,
    /// Right edges aligned
    End,
}

impl Align {
    /// Positioning classes for this alignment.
    #[must_use]
    pub const fn class(&self) -> &'static str {
        match self {
            Self::Start => "left-0",
            Self::Center => "left-1/2 -translate-x-1/2",
            Self::End => "right-0",
        }
    }
}

/// Options accepted by every overlay variant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayOptions {
    /// Controlled open value. `None` makes the overlay own its state.
    pub open: Option<bool>,
    /// Surface alignment
    pub align: Align,
    /// Close when Escape is pressed
    pub close_on_escape: Option<bool>,
    /// Close on a press outside the surface
    pub close_on_outside: Option<bool>,
    /// Lock background scrolling while open
    pub lock_scroll: Option<bool>,
    /// Return focus to the previously focused node on close
    pub restore_focus: Option<bool>,
}

impl OverlayOptions {
    /// Create default (uncontrolled) options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the overlay controlled with the given initial value.
    #[must_use]
    pub const fn open(mut self, open: bool) -> Self {
        self.open = Some(open);
        self
    }

    /// Set alignment.
    #[must_use]
    pub const fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Override Escape dismissal.
    #[must_use]
    pub const fn close_on_escape(mut self, enabled: bool) -> Self {
        self.close_on_escape = Some(enabled);
        self
    }

    /// Override outside-press dismissal.
    #[must_use]
    pub const fn close_on_outside(mut self, enabled: bool) -> Self {
        self.close_on_outside = Some(enabled);
        self
    }

    /// Override the scroll lock.
    #[must_use]
    pub const fn lock_scroll(mut self, enabled: bool) -> Self {
        self.lock_scroll = Some(enabled);
        self
    }

    /// Override focus restoration.
    #[must_use]
    pub const fn restore_focus(mut self, enabled: bool) -> Self {
        self.restore_focus = Some(enabled);
        self
    }

    /// Parse options from JSON.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(input).map_err(ConfigError::Json)
    }

    /// Parse options from YAML.
    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        serde_yaml_ng::from_str(input).map_err(ConfigError::Yaml)
    }
}

/// Errors loading overlay options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid JSON document.
    #[error("invalid overlay options JSON: {0}")]
    Json(#[source] serde_json::Error),
    /// Invalid YAML document.
    #[error("invalid overlay options YAML: {0}")]
    Yaml(#[source] serde_yaml_ng::Error),
}
