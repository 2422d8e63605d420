//! Modal dialog.
//!
//! Closes on Escape, on a press on the backdrop (anywhere outside the
//! content panel) and from its close button. While open it holds the shared
//! scroll lock and keeps focus inside the panel.
//!
//! A dialog built with `OverlayOptions::open` set is controlled: dismissal
//! only reports the requested value and the page applies it with
//! [`Dialog::sync_open`].

use crate::context::OverlayContext;
use crate::controller::{Cause, OverlayController};
use crate::surface::{Surface, SurfaceBehavior};
use crate::trigger::{Button, Trigger};
use devui_core::{Event, Markup, MouseButton, NodeId, OverlayOptions, Rect};
use std::rc::Rc;

/// Keydown handler on the content panel.
pub type KeyHandler = Rc<dyn Fn(&Event)>;

/// A modal dialog with optional trigger button.
pub struct Dialog {
    controller: OverlayController,
    surface: Surface,
    trigger: Option<Trigger<Button>>,
    title: Option<(NodeId, String)>,
    description: Option<(NodeId, String)>,
    body: Vec<Markup>,
    close_button: NodeId,
    close_bounds: Rect,
    on_key_down: Option<KeyHandler>,
}

impl Dialog {
    /// Create a dialog. Controlled when `options.open` is set.
    #[must_use]
    pub fn new(context: &OverlayContext, options: &OverlayOptions) -> Self {
        let controller = OverlayController::from_options(options);
        let surface = Surface::new(
            &controller,
            context,
            SurfaceBehavior::dialog().with_options(options),
        );
        Self {
            controller,
            surface,
            trigger: None,
            title: None,
            description: None,
            body: Vec::new(),
            close_button: NodeId::next(),
            close_bounds: Rect::default(),
            on_key_down: None,
        }
    }

    /// Set the open-change callback.
    #[must_use]
    pub fn on_open_change(self, callback: impl Fn(bool) + 'static) -> Self {
        self.controller.set_on_open_change(callback);
        self
    }

    /// Add a trigger button that opens the dialog.
    #[must_use]
    pub fn trigger(mut self, button: Button) -> Self {
        self.trigger = Some(
            Trigger::new(&self.controller, button)
                .haspopup("dialog")
                .controls(self.surface.node()),
        );
        self
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some((NodeId::next(), title.into()));
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some((NodeId::next(), description.into()));
        self
    }

    /// Append body content.
    #[must_use]
    pub fn body(mut self, content: Markup) -> Self {
        self.body.push(content);
        self
    }

    /// Set a keydown handler on the content panel.
    #[must_use]
    pub fn on_key_down(mut self, handler: impl Fn(&Event) + 'static) -> Self {
        self.on_key_down = Some(Rc::new(handler));
        self
    }

    /// The dialog's controller.
    #[must_use]
    pub const fn controller(&self) -> &OverlayController {
        &self.controller
    }

    /// The content panel.
    #[must_use]
    pub const fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The trigger, if one was added.
    pub fn trigger_mut(&mut self) -> Option<&mut Trigger<Button>> {
        self.trigger.as_mut()
    }

    /// Whether the dialog is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.controller.is_open()
    }

    /// Request a new open value.
    pub fn set_open(&self, open: bool) {
        self.controller.set_open(open);
    }

    /// Apply a page-supplied value (controlled mode).
    pub fn sync_open(&self, open: bool) {
        self.controller.sync_open(open);
    }

    /// Close from the close button.
    pub fn close(&self) -> bool {
        self.controller.request(false, Cause::CloseButton)
    }

    /// Call once the rendered dialog is in the document, so focus can move
    /// into the panel. Returns false while focus is still pending.
    pub fn after_render(&self) -> bool {
        self.surface.after_render()
    }

    /// Record laid-out bounds of the content panel and its close button.
    pub fn layout(&mut self, panel: Rect, close_button: Rect) {
        self.surface.set_bounds(panel);
        self.close_bounds = close_button;
    }

    /// Route an event targeted at the dialog. Returns true if handled.
    ///
    /// While closed, events go to the trigger. While open, keydown reaches
    /// the content handler and a click on the close button closes.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if !self.is_open() {
            return self
                .trigger
                .as_mut()
                .is_some_and(|trigger| trigger.handle_event(event));
        }
        match event {
            Event::KeyDown { .. } => match &self.on_key_down {
                Some(handler) => {
                    handler(event);
                    true
                }
                None => false,
            },
            Event::MouseUp {
                position,
                button: MouseButton::Left,
            } if self.close_bounds.contains_point(position) => self.close(),
            _ => false,
        }
    }

    /// Render the trigger (if any) followed by the dialog when open.
    #[must_use]
    pub fn render(&self) -> Vec<Markup> {
        let mut out = Vec::with_capacity(2);
        if let Some(trigger) = &self.trigger {
            out.push(trigger.render());
        }
        if let Some(panel) = self.render_panel() {
            out.push(
                Markup::new("div")
                    .class("fixed inset-0 z-50 flex items-center justify-center")
                    .attr("data-state", "open")
                    .child(
                        Markup::new("div")
                            .class("fixed inset-0 bg-black/50")
                            .attr("data-backdrop", "")
                            .attr("aria-hidden", "true"),
                    )
                    .child(panel),
            );
        }
        out
    }

    fn render_panel(&self) -> Option<Markup> {
        let mut content = Vec::with_capacity(self.body.len() + 2);
        if self.title.is_some() || self.description.is_some() {
            let mut header =
                Markup::new("div").class("flex flex-col space-y-1.5 text-center sm:text-left p-6 pb-4");
            if let Some((id, title)) = &self.title {
                header = header.child(
                    Markup::new("h3")
                        .attr("id", id.dom_id())
                        .class("text-lg font-semibold leading-none tracking-tight")
                        .text(title.clone()),
                );
            }
            if let Some((id, description)) = &self.description {
                header = header.child(
                    Markup::new("p")
                        .attr("id", id.dom_id())
                        .class("text-sm text-muted-foreground")
                        .text(description.clone()),
                );
            }
            content.push(header);
        }
        content.extend(self.body.iter().cloned());
        content.push(
            Markup::new("button")
                .attr("type", "button")
                .attr("id", self.close_button.dom_id())
                .attr("aria-label", "Close")
                .class("absolute right-4 top-4")
                .text("\u{d7}"),
        );

        let mut panel = self.surface.render(content)?.attr("aria-modal", "true");
        if let Some((id, _)) = &self.title {
            panel = panel.attr("aria-labelledby", id.dom_id());
        }
        if let Some((id, _)) = &self.description {
            panel = panel.attr("aria-describedby", id.dom_id());
        }
        Some(panel)
    }
}
