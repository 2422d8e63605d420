//! Dropdown menu: a trigger plus a floating list of actions.
//!
//! Closes on an outside press and when an item is chosen. Escape is off
//! unless `OverlayOptions::close_on_escape` turns it on.

use crate::context::OverlayContext;
use crate::controller::OverlayController;
use crate::item::{Item, ValueSink};
use crate::surface::{Surface, SurfaceBehavior};
use crate::trigger::{Activatable, Button, Trigger};
use devui_core::{Event, Markup, OverlayOptions, Rect};

/// One row of a menu.
#[derive(Debug)]
pub enum MenuEntry {
    /// Selectable action
    Item(Item),
    /// Horizontal rule
    Separator,
    /// Non-interactive group heading
    Label(String),
}

impl MenuEntry {
    fn render(&self) -> Markup {
        match self {
            Self::Item(item) => item.render("menuitem", false),
            Self::Separator => Markup::new("div")
                .attr("role", "separator")
                .class("-mx-1 my-1 h-px bg-muted"),
            Self::Label(text) => Markup::new("div")
                .class("px-2 py-1.5 text-sm font-semibold")
                .text(text.clone()),
        }
    }
}

/// A dropdown menu whose trigger wraps `C`.
pub struct DropdownMenu<C: Activatable = Button> {
    controller: OverlayController,
    sink: ValueSink,
    trigger: Trigger<C>,
    surface: Surface,
    entries: Vec<MenuEntry>,
}

impl<C: Activatable> DropdownMenu<C> {
    /// Create a menu toggled by `child`.
    #[must_use]
    pub fn new(context: &OverlayContext, options: &OverlayOptions, child: C) -> Self {
        let controller = OverlayController::from_options(options);
        let surface = Surface::new(
            &controller,
            context,
            SurfaceBehavior::dropdown().with_options(options),
        );
        let trigger = Trigger::new(&controller, child)
            .haspopup("menu")
            .controls(surface.node());
        Self {
            controller,
            sink: ValueSink::new(),
            trigger,
            surface,
            entries: Vec::new(),
        }
    }

    /// Append an item.
    #[must_use]
    pub fn item(self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.item_with(value, label, false)
    }

    /// Append an item with explicit disabled state.
    #[must_use]
    pub fn item_with(
        mut self,
        value: impl Into<String>,
        label: impl Into<String>,
        disabled: bool,
    ) -> Self {
        let item = Item::new(&self.controller, &self.sink, value, label).disabled(disabled);
        self.entries.push(MenuEntry::Item(item));
        self
    }

    /// Append a separator.
    #[must_use]
    pub fn separator(mut self) -> Self {
        self.entries.push(MenuEntry::Separator);
        self
    }

    /// Append a group label.
    #[must_use]
    pub fn label(mut self, text: impl Into<String>) -> Self {
        self.entries.push(MenuEntry::Label(text.into()));
        self
    }

    /// Set the callback receiving chosen item values.
    #[must_use]
    pub fn on_value_change(self, callback: impl Fn(&str) + 'static) -> Self {
        self.sink.set(callback);
        self
    }

    /// Set the open-change callback.
    #[must_use]
    pub fn on_open_change(self, callback: impl Fn(bool) + 'static) -> Self {
        self.controller.set_on_open_change(callback);
        self
    }

    /// The menu's controller.
    #[must_use]
    pub const fn controller(&self) -> &OverlayController {
        &self.controller
    }

    /// The floating list.
    #[must_use]
    pub const fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The trigger.
    #[must_use]
    pub const fn trigger(&self) -> &Trigger<C> {
        &self.trigger
    }

    /// Menu rows.
    #[must_use]
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Selectable items, in order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.entries.iter().filter_map(|entry| match entry {
            MenuEntry::Item(item) => Some(item),
            _ => None,
        })
    }

    /// Whether the menu is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.controller.is_open()
    }

    /// Activate the item with `value`. Returns false if there is none, it
    /// is disabled, or the menu is closed.
    pub fn activate_item(&self, value: &str) -> bool {
        if !self.is_open() {
            return false;
        }
        self.items()
            .find(|item| item.value() == value)
            .is_some_and(Item::activate)
    }

    /// Record laid-out bounds of the trigger, the list and its items.
    ///
    /// The trigger becomes the surface's anchor so pressing it toggles
    /// rather than counting as an outside press.
    pub fn layout(&mut self, trigger: Rect, list: Rect, items: &[Rect]) {
        self.trigger.set_bounds(trigger);
        self.surface.set_anchor(self.trigger.node(), trigger);
        self.surface.set_bounds(list);
        for (item, bounds) in self.items().zip(items) {
            item.set_bounds(*bounds);
        }
    }

    /// Route an event targeted at the menu. Returns true if handled.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if self.surface.is_mounted() && self.items().any(|item| item.handle_event(event)) {
            return true;
        }
        self.trigger.handle_event(event)
    }

    /// Render the trigger and, when open, the list.
    #[must_use]
    pub fn render(&self) -> Markup {
        let root = Markup::new("div")
            .class("relative inline-block text-left")
            .child(self.trigger.render());
        match self.surface.render(self.entries.iter().map(MenuEntry::render)) {
            Some(list) => root.child(list),
            None => root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devui_core::{Align, Key, MouseButton, Point};
    use devui_test::{FakeDocument, Journal};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn context() -> (Rc<FakeDocument>, OverlayContext) {
        let doc = FakeDocument::new();
        let ctx = OverlayContext::new(doc.clone());
        (doc, ctx)
    }

    fn menu(ctx: &OverlayContext) -> DropdownMenu {
        let mut m = DropdownMenu::new(ctx, &OverlayOptions::new(), Button::new("Actions"))
            .item("copy", "Copy")
            .item_with("paste", "Paste", true)
            .separator()
            .label("Export")
            .item("json", "As JSON");
        m.layout(
            Rect::new(0.0, 0.0, 100.0, 32.0),
            Rect::new(0.0, 36.0, 160.0, 100.0),
            &[
                Rect::new(0.0, 40.0, 160.0, 24.0),
                Rect::new(0.0, 64.0, 160.0, 24.0),
                Rect::new(0.0, 108.0, 160.0, 24.0),
            ],
        );
        m
    }

    fn click(x: f32, y: f32) -> Event {
        Event::MouseUp {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_menu_toggle_via_trigger() {
        let (doc, ctx) = context();
        let mut m = menu(&ctx);
        assert!(m.handle_event(&click(10.0, 10.0)));
        assert!(m.is_open());
        assert_eq!(doc.listener_count(), 1);
        assert!(m.handle_event(&click(10.0, 10.0)));
        assert!(!m.is_open());
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_press_on_trigger_is_not_outside() {
        let (doc, ctx) = context();
        let mut m = menu(&ctx);
        m.handle_event(&click(10.0, 10.0));
        doc.pointer_down(Point::new(10.0, 10.0));
        assert!(m.is_open());
        m.handle_event(&click(10.0, 10.0));
        assert!(!m.is_open());
    }

    #[test]
    fn test_outside_press_closes_escape_does_not() {
        let (doc, ctx) = context();
        let m = menu(&ctx);
        m.controller().set_open(true);
        doc.key_down(Key::Escape);
        assert!(m.is_open());
        doc.pointer_down(Point::new(500.0, 500.0));
        assert!(!m.is_open());
    }

    #[test]
    fn test_escape_opt_in() {
        let (doc, ctx) = context();
        let m = DropdownMenu::new(
            &ctx,
            &OverlayOptions::new().close_on_escape(true),
            Button::new("More"),
        );
        m.controller().set_open(true);
        doc.key_down(Key::Escape);
        assert!(!m.is_open());
    }

    #[test]
    fn test_item_click_delivers_then_closes() {
        let (doc, ctx) = context();
        let doc_in = Rc::clone(&doc);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut m = menu(&ctx).on_value_change(move |v| {
            doc_in.mark(format!("value:{v}"));
            sink.borrow_mut().push(v.to_string());
        });
        m.controller().set_open(true);
        doc.clear_journal();

        assert!(m.handle_event(&click(20.0, 115.0)));
        assert_eq!(*seen.borrow(), vec!["json".to_string()]);
        assert!(!m.is_open());
        let mark = doc
            .position_of(|j| *j == Journal::Mark("value:json".into()))
            .expect("value delivered");
        let teardown = doc
            .position_of(|j| matches!(j, Journal::ListenerRemoved { .. }))
            .expect("listener removed");
        assert!(mark < teardown);
    }

    #[test]
    fn test_disabled_item_keeps_menu_open() {
        let (_doc, ctx) = context();
        let m = menu(&ctx);
        m.controller().set_open(true);
        assert!(!m.activate_item("paste"));
        assert!(!m.activate_item("missing"));
        assert!(m.is_open());
        assert!(m.activate_item("copy"));
        assert!(!m.is_open());
        assert!(!m.activate_item("copy"));
    }

    #[test]
    fn test_render_entries_and_align() {
        let (_doc, ctx) = context();
        let m = DropdownMenu::new(
            &ctx,
            &OverlayOptions::new().align(Align::End),
            Button::new("Actions"),
        )
        .item("a", "A")
        .separator()
        .label("Group");
        assert_eq!(m.render().children.len(), 1);

        m.controller().set_open(true);
        let root = m.render();
        let list = &root.children[1];
        assert_eq!(list.get_attr("role"), Some("menu"));
        assert!(list.has_class("right-0"));
        assert_eq!(list.children.len(), 3);
        assert_eq!(list.children[0].get_attr("role"), Some("menuitem"));
        assert_eq!(list.children[1].get_attr("role"), Some("separator"));
        assert_eq!(list.children[2].text_content(), "Group");
        assert_eq!(m.items().count(), 1);
        assert_eq!(m.entries().len(), 3);
    }
}
