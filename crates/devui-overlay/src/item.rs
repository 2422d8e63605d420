//! Selectable leaves of a dropdown menu or select listbox.

use crate::controller::{Cause, OverlayController};
use devui_core::{Event, Markup, MouseButton, NodeId, Rect};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Callback receiving a selected value.
pub type ValueChangeFn = Rc<dyn Fn(&str)>;

/// Shared, replaceable value-change callback.
///
/// Every item of one overlay delivers into the same sink, so the owner can
/// install or replace its callback after the items exist.
#[derive(Clone, Default)]
pub struct ValueSink {
    callback: Rc<RefCell<Option<ValueChangeFn>>>,
}

impl fmt::Debug for ValueSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueSink")
            .field("installed", &self.callback.borrow().is_some())
            .finish()
    }
}

impl ValueSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the callback, replacing any previous one.
    pub fn set(&self, callback: impl Fn(&str) + 'static) {
        *self.callback.borrow_mut() = Some(Rc::new(callback));
    }

    /// Deliver a value. The callback runs outside the borrow, so it may
    /// replace itself.
    pub fn deliver(&self, value: &str) {
        let callback = self.callback.borrow().clone();
        if let Some(callback) = callback {
            callback(value);
        }
    }
}

/// One selectable entry.
pub struct Item {
    node: NodeId,
    value: String,
    label: String,
    disabled: bool,
    bounds: Cell<Rect>,
    controller: OverlayController,
    sink: ValueSink,
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("node", &self.node)
            .field("value", &self.value)
            .field("label", &self.label)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

impl Item {
    /// Create an item delivering into `sink` and closing `controller`.
    #[must_use]
    pub fn new(
        controller: &OverlayController,
        sink: &ValueSink,
        value: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            node: NodeId::next(),
            value: value.into(),
            label: label.into(),
            disabled: false,
            bounds: Cell::new(Rect::default()),
            controller: controller.clone(),
            sink: sink.clone(),
        }
    }

    /// Set disabled state.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Node id.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Item value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the item ignores activation.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Record laid-out bounds.
    pub fn set_bounds(&self, bounds: Rect) {
        self.bounds.set(bounds);
    }

    /// Deliver the value, then request the close transition.
    ///
    /// The value callback runs strictly before the close takes effect, so
    /// the owner sees the new value before the surface tears down.
    pub fn activate(&self) -> bool {
        if self.disabled {
            tracing::trace!(value = %self.value, "disabled item ignored activation");
            return false;
        }
        tracing::debug!(value = %self.value, "item selected");
        self.sink.deliver(&self.value);
        self.controller.request(false, Cause::ItemSelected);
        true
    }

    /// Activate on a primary click inside the item's bounds.
    pub fn handle_event(&self, event: &Event) -> bool {
        match event {
            Event::MouseUp {
                position,
                button: MouseButton::Left,
            } if self.bounds.get().contains_point(position) => self.activate(),
            _ => false,
        }
    }

    /// Render with an ARIA role (`menuitem`, `option`).
    #[must_use]
    pub fn render(&self, role: &str, selected: bool) -> Markup {
        let mut markup = Markup::new("div")
            .attr("id", self.node.dom_id())
            .attr("role", role)
            .attr("data-value", self.value.clone())
            .attr("tabindex", "-1")
            .class("relative flex cursor-default select-none items-center rounded-sm px-2 py-1.5 text-sm outline-none hover:bg-accent hover:text-accent-foreground data-[disabled]:pointer-events-none data-[disabled]:opacity-50")
            .text(self.label.clone());
        if role == "option" {
            markup = markup.attr("aria-selected", selected.to_string());
        }
        if selected {
            markup = markup.attr("data-state", "checked");
        }
        if self.disabled {
            markup = markup
                .attr("aria-disabled", "true")
                .attr("data-disabled", "");
        }
        markup
    }
}
