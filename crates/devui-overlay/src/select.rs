//! Single-choice select with a floating listbox.

use crate::context::OverlayContext;
use crate::controller::OverlayController;
use crate::item::{Item, ValueSink};
use crate::surface::{Surface, SurfaceBehavior};
use crate::trigger::{ActivateFn, Activatable, Trigger};
use devui_core::{Event, Markup, OverlayOptions, Rect};
use std::cell::RefCell;
use std::rc::Rc;

type Selection = Rc<RefCell<Option<String>>>;

/// Trigger child of a [`Select`]: shows the value or the placeholder.
pub struct SelectButton {
    selected: Selection,
    placeholder: String,
    disabled: bool,
}

impl Activatable for SelectButton {
    fn activation_handler(&self) -> Option<ActivateFn> {
        None
    }

    fn render(&self) -> Markup {
        let selected = self.selected.borrow();
        let (text, class) = match selected.as_deref() {
            Some(value) => (value.to_string(), "block truncate"),
            None => (self.placeholder.clone(), "block truncate text-muted-foreground"),
        };
        Markup::new("button")
            .attr("type", "button")
            .attr("role", "combobox")
            .class("flex h-9 w-full items-center justify-between whitespace-nowrap rounded-md border border-input bg-transparent px-3 py-2 text-sm shadow-sm disabled:cursor-not-allowed disabled:opacity-50")
            .child(Markup::new("span").class(class).text(text))
            .child(
                Markup::new("span")
                    .class("h-4 w-4 opacity-50")
                    .attr("aria-hidden", "true"),
            )
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// A select: trigger, listbox of items, and the chosen value.
pub struct Select {
    controller: OverlayController,
    selected: Selection,
    sink: ValueSink,
    on_value_change: ValueSink,
    trigger: Trigger<SelectButton>,
    surface: Surface,
    items: Vec<Item>,
}

impl Select {
    /// Create an empty select.
    #[must_use]
    pub fn new(context: &OverlayContext, options: &OverlayOptions) -> Self {
        let controller = OverlayController::from_options(options);
        let surface = Surface::new(
            &controller,
            context,
            SurfaceBehavior::select().with_options(options),
        );
        let selected: Selection = Rc::new(RefCell::new(None));
        let trigger = Trigger::new(
            &controller,
            SelectButton {
                selected: Rc::clone(&selected),
                placeholder: String::new(),
                disabled: false,
            },
        )
        .haspopup("listbox")
        .controls(surface.node());

        // Items deliver here; the selection is stored before the page sees it.
        let sink = ValueSink::new();
        let on_value_change = ValueSink::new();
        {
            let selected = Rc::clone(&selected);
            let forward = on_value_change.clone();
            sink.set(move |value| {
                *selected.borrow_mut() = Some(value.to_string());
                forward.deliver(value);
            });
        }

        Self {
            controller,
            selected,
            sink,
            on_value_change,
            trigger,
            surface,
            items: Vec::new(),
        }
    }

    /// Set the initial value.
    #[must_use]
    pub fn value(self, value: impl Into<String>) -> Self {
        self.set_value(Some(value.into()));
        self
    }

    /// Text shown while no value is chosen.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.trigger.child_mut().placeholder = placeholder.into();
        self
    }

    /// Disable the select. A disabled select never opens.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.trigger.child_mut().disabled = disabled;
        self
    }

    /// Append an option.
    #[must_use]
    pub fn item(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.items
            .push(Item::new(&self.controller, &self.sink, value, label));
        self
    }

    /// Append a disabled option.
    #[must_use]
    pub fn disabled_item(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.items
            .push(Item::new(&self.controller, &self.sink, value, label).disabled(true));
        self
    }

    /// Set the callback receiving chosen values.
    #[must_use]
    pub fn on_value_change(self, callback: impl Fn(&str) + 'static) -> Self {
        self.on_value_change.set(callback);
        self
    }

    /// Set the open-change callback.
    #[must_use]
    pub fn on_open_change(self, callback: impl Fn(bool) + 'static) -> Self {
        self.controller.set_on_open_change(callback);
        self
    }

    /// Currently chosen value.
    #[must_use]
    pub fn selected(&self) -> Option<String> {
        self.selected.borrow().clone()
    }

    /// Replace the chosen value without notifying.
    pub fn set_value(&self, value: Option<String>) {
        *self.selected.borrow_mut() = value;
    }

    /// The select's controller.
    #[must_use]
    pub const fn controller(&self) -> &OverlayController {
        &self.controller
    }

    /// The listbox.
    #[must_use]
    pub const fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The trigger.
    #[must_use]
    pub const fn trigger(&self) -> &Trigger<SelectButton> {
        &self.trigger
    }

    /// Options, in order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Whether the listbox is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.controller.is_open()
    }

    /// Activate the option with `value` while open.
    pub fn activate_item(&self, value: &str) -> bool {
        if !self.is_open() {
            return false;
        }
        self.items
            .iter()
            .find(|item| item.value() == value)
            .is_some_and(Item::activate)
    }

    /// Record laid-out bounds of the trigger, listbox and options.
    pub fn layout(&mut self, trigger: Rect, list: Rect, items: &[Rect]) {
        self.trigger.set_bounds(trigger);
        self.surface.set_anchor(self.trigger.node(), trigger);
        self.surface.set_bounds(list);
        for (item, bounds) in self.items.iter().zip(items) {
            item.set_bounds(*bounds);
        }
    }

    /// Route an event targeted at the select. Returns true if handled.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if self.surface.is_mounted() && self.items.iter().any(|item| item.handle_event(event)) {
            return true;
        }
        self.trigger.handle_event(event)
    }

    /// Render the trigger and, when open, the listbox.
    #[must_use]
    pub fn render(&self) -> Markup {
        let selected = self.selected();
        let root = Markup::new("div")
            .class("relative")
            .child(self.trigger.render());
        let options = self
            .items
            .iter()
            .map(|item| item.render("option", selected.as_deref() == Some(item.value())));
        match self.surface.render(options) {
            Some(list) => root.child(list),
            None => root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devui_core::{Key, MouseButton, Point};
    use devui_test::FakeDocument;

    fn context() -> (Rc<FakeDocument>, OverlayContext) {
        let doc = FakeDocument::new();
        let ctx = OverlayContext::new(doc.clone());
        (doc, ctx)
    }

    fn formats(ctx: &OverlayContext) -> Select {
        Select::new(ctx, &OverlayOptions::new())
            .placeholder("Format")
            .item("json", "JSON")
            .item("yaml", "YAML")
            .disabled_item("xml", "XML")
    }

    #[test]
    fn test_select_placeholder_then_value() {
        let (_doc, ctx) = context();
        let s = formats(&ctx);
        assert_eq!(s.selected(), None);
        assert_eq!(s.render().text_content(), "Format");
        s.controller().set_open(true);
        assert!(s.activate_item("yaml"));
        assert_eq!(s.selected().as_deref(), Some("yaml"));
        assert!(s.render().text_content().starts_with("yaml"));
    }

    #[test]
    fn test_selection_stored_before_callback() {
        let (_doc, ctx) = context();
        let observed = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&observed);
        let s = formats(&ctx);
        let selection = Rc::clone(&s.selected);
        let s = s.on_value_change(move |v| {
            *sink.borrow_mut() = Some((v.to_string(), selection.borrow().clone()));
        });
        s.controller().set_open(true);
        s.activate_item("json");
        assert_eq!(
            *observed.borrow(),
            Some(("json".to_string(), Some("json".to_string())))
        );
        assert!(!s.is_open());
    }

    #[test]
    fn test_escape_and_outside_close() {
        let (doc, ctx) = context();
        let s = formats(&ctx);
        s.controller().set_open(true);
        doc.key_down(Key::Down);
        assert!(s.is_open());
        doc.key_down(Key::Escape);
        assert!(!s.is_open());

        s.controller().set_open(true);
        doc.pointer_down(Point::new(900.0, 900.0));
        assert!(!s.is_open());
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_disabled_select_never_opens() {
        let (doc, ctx) = context();
        let mut s = formats(&ctx).disabled(true);
        s.layout(Rect::new(0.0, 0.0, 200.0, 36.0), Rect::default(), &[]);
        let click = Event::MouseUp {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Left,
        };
        assert!(!s.handle_event(&click));
        assert!(!s.is_open());
        assert_eq!(doc.listener_count(), 0);
        assert!(s.trigger().render().get_attr("disabled").is_some());
    }

    #[test]
    fn test_disabled_option_ignored() {
        let (_doc, ctx) = context();
        let s = formats(&ctx).value("json");
        s.controller().set_open(true);
        assert!(!s.activate_item("xml"));
        assert_eq!(s.selected().as_deref(), Some("json"));
        assert!(s.is_open());
    }

    #[test]
    fn test_click_option() {
        let (_doc, ctx) = context();
        let mut s = formats(&ctx);
        s.layout(
            Rect::new(0.0, 0.0, 200.0, 36.0),
            Rect::new(0.0, 36.0, 200.0, 80.0),
            &[
                Rect::new(0.0, 40.0, 200.0, 24.0),
                Rect::new(0.0, 64.0, 200.0, 24.0),
            ],
        );
        let click = |y: f32| Event::MouseUp {
            position: Point::new(20.0, y),
            button: MouseButton::Left,
        };
        assert!(s.handle_event(&click(10.0)));
        assert!(s.is_open());
        assert!(s.handle_event(&click(70.0)));
        assert_eq!(s.selected().as_deref(), Some("yaml"));
        assert!(!s.is_open());
    }

    #[test]
    fn test_render_marks_selected_option() {
        let (_doc, ctx) = context();
        let s = formats(&ctx).value("yaml");
        s.controller().set_open(true);
        let root = s.render();
        let list = &root.children[1];
        assert_eq!(list.get_attr("role"), Some("listbox"));
        assert!(list.has_class("top-full"));
        let yaml = list.find_by_attr("data-value", "yaml").expect("option");
        assert_eq!(yaml.get_attr("aria-selected"), Some("true"));
        let json = list.find_by_attr("data-value", "json").expect("option");
        assert_eq!(json.get_attr("aria-selected"), Some("false"));
        assert_eq!(
            root.children[0].get_attr("aria-haspopup"),
            Some("listbox")
        );
    }
}
