//! The always-present element that toggles an overlay.
//!
//! A trigger wraps any child that can expose an activation handler
//! ([`Activatable`]). Activation toggles the controller first, then runs the
//! child's own handler, so a caller-supplied click handler is never lost.

use crate::controller::OverlayController;
use devui_core::{Event, Markup, NodeId, Rect};
use std::fmt;
use std::rc::Rc;

/// Activation handler of a wrapped child.
pub type ActivateFn = Rc<dyn Fn()>;

/// A child element a [`Trigger`] can wrap.
pub trait Activatable {
    /// The child's own activation handler, chained after the toggle.
    fn activation_handler(&self) -> Option<ActivateFn>;

    /// Render the child element.
    fn render(&self) -> Markup;

    /// Disabled children do not activate.
    fn is_disabled(&self) -> bool {
        false
    }
}

/// Plain button child.
#[derive(Clone, Default)]
pub struct Button {
    label: String,
    class: String,
    on_click: Option<ActivateFn>,
    disabled: bool,
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("label", &self.label)
            .field("disabled", &self.disabled)
            .field("has_on_click", &self.on_click.is_some())
            .finish_non_exhaustive()
    }
}

impl Button {
    /// Create a button with a label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            class: "inline-flex items-center gap-1".to_string(),
            ..Self::default()
        }
    }

    /// Set the click handler.
    #[must_use]
    pub fn on_click(mut self, handler: impl Fn() + 'static) -> Self {
        self.on_click = Some(Rc::new(handler));
        self
    }

    /// Replace the button classes.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Set disabled state.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Button label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Activatable for Button {
    fn activation_handler(&self) -> Option<ActivateFn> {
        self.on_click.clone()
    }

    fn render(&self) -> Markup {
        Markup::new("button")
            .attr("type", "button")
            .class(&self.class)
            .text(self.label.clone())
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// Toggle wrapper around an activatable child.
pub struct Trigger<C: Activatable> {
    node: NodeId,
    controller: OverlayController,
    child: C,
    bounds: Rect,
    focused: bool,
    haspopup: &'static str,
    controls: Option<NodeId>,
}

impl<C: Activatable> Trigger<C> {
    /// Wrap `child` so activating it toggles `controller`.
    #[must_use]
    pub fn new(controller: &OverlayController, child: C) -> Self {
        Self {
            node: NodeId::next(),
            controller: controller.clone(),
            child,
            bounds: Rect::default(),
            focused: false,
            haspopup: "true",
            controls: None,
        }
    }

    /// Set the `aria-haspopup` value (`menu`, `listbox`, `dialog`).
    #[must_use]
    pub const fn haspopup(mut self, kind: &'static str) -> Self {
        self.haspopup = kind;
        self
    }

    /// Name the surface this trigger controls.
    #[must_use]
    pub const fn controls(mut self, surface: NodeId) -> Self {
        self.controls = Some(surface);
        self
    }

    /// Node id of the trigger element.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Laid-out bounds.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Record laid-out bounds.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// The wrapped child.
    #[must_use]
    pub const fn child(&self) -> &C {
        &self.child
    }

    /// Mutable access to the wrapped child.
    pub fn child_mut(&mut self) -> &mut C {
        &mut self.child
    }

    /// Whether the trigger has keyboard focus.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Toggle the overlay, then run the child's handler.
    ///
    /// Returns false when the child is disabled.
    pub fn activate(&self) -> bool {
        if self.child.is_disabled() {
            tracing::trace!(trigger = %self.node, "disabled trigger ignored activation");
            return false;
        }
        self.controller.toggle();
        if let Some(handler) = self.child.activation_handler() {
            handler();
        }
        true
    }

    /// Handle an event targeted at the trigger. Returns true if it
    /// activated.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::FocusIn => {
                self.focused = true;
                false
            }
            Event::FocusOut => {
                self.focused = false;
                false
            }
            Event::MouseUp { position, .. } if event.is_activation() => {
                self.bounds.contains_point(position) && self.activate()
            }
            Event::KeyDown { .. } if event.is_activation() => self.focused && self.activate(),
            _ => false,
        }
    }

    /// Render the child with trigger state attributes.
    #[must_use]
    pub fn render(&self) -> Markup {
        let open = self.controller.is_open();
        let mut markup = self
            .child
            .render()
            .attr("id", self.node.dom_id())
            .attr("aria-haspopup", self.haspopup)
            .attr("aria-expanded", open.to_string())
            .attr("data-state", if open { "open" } else { "closed" });
        if let Some(surface) = self.controls {
            markup = markup.attr("aria-controls", surface.dom_id());
        }
        if self.child.is_disabled() {
            markup = markup.attr("disabled", "").attr("data-disabled", "");
        }
        markup
    }
}
