//! The conditionally mounted content region of an overlay.
//!
//! A surface follows its controller: it is mounted exactly while the
//! controller is open. Mounting acquires the dismissal listeners and,
//! depending on the variant, a scroll-lock hold and a focus hand-off.
//! Unmounting releases them, and so does dropping the surface while it is
//! still mounted.
//!
//! Mounting runs before the page has rendered the surface element, so a
//! focus hand-off that could not land yet is completed by
//! [`Surface::after_render`].

use crate::context::OverlayContext;
use crate::controller::{OpenObserver, OverlayController};
use crate::dismiss::{DismissGuard, DismissPolicy, HitRegion};
use crate::focus::FocusGuard;
use crate::scroll_lock::ScrollLockGuard;
use devui_core::{Align, Markup, NodeId, OverlayOptions, Rect};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Side effects and presentation of a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceBehavior {
    /// Dismissal sources
    pub dismiss: DismissPolicy,
    /// Hold the scroll lock while mounted
    pub lock_scroll: bool,
    /// Focus the surface on mount and restore focus on unmount
    pub restore_focus: bool,
    /// ARIA role of the surface element
    pub role: &'static str,
    /// Base classes of the surface element
    pub class: &'static str,
    /// Whether `align` contributes positioning classes
    pub aligned: bool,
    /// Requested alignment
    pub align: Align,
}

impl SurfaceBehavior {
    /// Modal dialog: every dismissal source, scroll lock, focus hand-off.
    #[must_use]
    pub const fn dialog() -> Self {
        Self {
            dismiss: DismissPolicy::ALL,
            lock_scroll: true,
            restore_focus: true,
            role: "dialog",
            class: "relative bg-background border rounded-lg shadow-lg max-w-lg w-full mx-4 max-h-[85vh] overflow-y-auto",
            aligned: false,
            align: Align::Center,
        }
    }

    /// Dropdown menu: outside press only.
    #[must_use]
    pub const fn dropdown() -> Self {
        Self {
            dismiss: DismissPolicy {
                outside: true,
                escape: false,
            },
            lock_scroll: false,
            restore_focus: false,
            role: "menu",
            class: "absolute z-50 mt-1 min-w-[8rem] overflow-hidden rounded-md border bg-popover p-1 text-popover-foreground shadow-md",
            aligned: true,
            align: Align::Center,
        }
    }

    /// Select listbox: outside press and Escape.
    #[must_use]
    pub const fn select() -> Self {
        Self {
            dismiss: DismissPolicy::ALL,
            lock_scroll: false,
            restore_focus: false,
            role: "listbox",
            class: "absolute top-full z-50 min-w-[8rem] overflow-hidden rounded-md border bg-popover p-1 text-popover-foreground shadow-md",
            aligned: false,
            align: Align::Start,
        }
    }

    /// Apply option overrides on top of the variant defaults.
    #[must_use]
    pub fn with_options(mut self, options: &OverlayOptions) -> Self {
        if let Some(escape) = options.close_on_escape {
            self.dismiss.escape = escape;
        }
        if let Some(outside) = options.close_on_outside {
            self.dismiss.outside = outside;
        }
        if let Some(lock) = options.lock_scroll {
            self.lock_scroll = lock;
        }
        if let Some(restore) = options.restore_focus {
            self.restore_focus = restore;
        }
        if self.aligned {
            self.align = options.align;
        }
        self
    }

    /// Full class list of the surface element.
    #[must_use]
    pub fn classes(&self) -> String {
        if self.aligned {
            format!("{} {}", self.class, self.align.class())
        } else {
            self.class.to_string()
        }
    }
}

/// Resources held while mounted. Fields drop in declaration order:
/// listeners first, then the scroll lock, then focus.
struct Mounted {
    _dismiss: DismissGuard,
    _scroll: Option<ScrollLockGuard>,
    focus: Option<Rc<FocusGuard>>,
}

struct SurfaceInner {
    controller: OverlayController,
    context: OverlayContext,
    behavior: SurfaceBehavior,
    region: Rc<HitRegion>,
    mounted: RefCell<Option<Mounted>>,
    mounts: Cell<u64>,
}

impl SurfaceInner {
    fn mount(&self) {
        if self.mounted.borrow().is_some() {
            return;
        }
        let host = self.context.host();
        let dismiss =
            DismissGuard::acquire(host, self.behavior.dismiss, &self.controller, &self.region);
        let scroll = self
            .behavior
            .lock_scroll
            .then(|| self.context.scroll_lock().acquire());
        let focus = self
            .behavior
            .restore_focus
            .then(|| Rc::new(FocusGuard::acquire(host, self.region.surface())));
        *self.mounted.borrow_mut() = Some(Mounted {
            _dismiss: dismiss,
            _scroll: scroll,
            focus,
        });
        self.mounts.set(self.mounts.get() + 1);
        tracing::debug!(surface = %self.region.surface(), role = self.behavior.role, "surface mounted");
    }

    fn unmount(&self) {
        let taken = self.mounted.borrow_mut().take();
        if let Some(mounted) = taken {
            drop(mounted);
            tracing::debug!(surface = %self.region.surface(), "surface unmounted");
        }
    }
}

impl OpenObserver for SurfaceInner {
    fn sync(&self) {
        if self.controller.is_open() {
            self.mount();
        } else {
            self.unmount();
        }
    }
}

impl Drop for SurfaceInner {
    fn drop(&mut self) {
        if self.mounted.get_mut().is_some() {
            tracing::debug!(surface = %self.region.surface(), "surface removed while mounted");
        }
    }
}

/// Content region of an overlay. Not clonable: dropping it is removal.
pub struct Surface {
    inner: Rc<SurfaceInner>,
}

impl Surface {
    /// Create a surface bound to a controller. Mounts immediately if the
    /// controller is already open.
    #[must_use]
    pub fn new(
        controller: &OverlayController,
        context: &OverlayContext,
        behavior: SurfaceBehavior,
    ) -> Self {
        let inner = Rc::new(SurfaceInner {
            controller: controller.clone(),
            context: context.clone(),
            behavior,
            region: HitRegion::new(NodeId::next()),
            mounted: RefCell::new(None),
            mounts: Cell::new(0),
        });
        let observer: Weak<dyn OpenObserver> = Rc::downgrade(&inner) as Weak<dyn OpenObserver>;
        controller.subscribe(observer);
        inner.sync();
        Self { inner }
    }

    /// Node id of the surface element.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.inner.region.surface()
    }

    /// Whether the surface is mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.borrow().is_some()
    }

    /// How many times the surface has mounted.
    #[must_use]
    pub fn mount_count(&self) -> u64 {
        self.inner.mounts.get()
    }

    /// The surface's behavior.
    #[must_use]
    pub fn behavior(&self) -> &SurfaceBehavior {
        &self.inner.behavior
    }

    /// The inside-area used for outside dismissal.
    #[must_use]
    pub fn region(&self) -> &Rc<HitRegion> {
        &self.inner.region
    }

    /// Record laid-out bounds.
    pub fn set_bounds(&self, bounds: Rect) {
        self.inner.region.set_bounds(bounds);
    }

    /// Record the anchor (trigger) so presses on it are not outside.
    pub fn set_anchor(&self, node: NodeId, bounds: Rect) {
        self.inner.region.set_anchor(node, bounds);
    }

    /// Complete the focus hand-off once the surface element is in the
    /// document. Returns false while focus is still pending.
    pub fn after_render(&self) -> bool {
        let focus = self
            .inner
            .mounted
            .borrow()
            .as_ref()
            .and_then(|mounted| mounted.focus.clone());
        match focus {
            Some(guard) => guard.settle(),
            None => true,
        }
    }

    /// Remove the surface without a state transition, as a parent dropping
    /// it would. The controller keeps its value; a surface created for it
    /// later mounts straight away if it is still open.
    pub fn remove(self) {
        drop(self);
    }

    /// Render `content` inside the surface element, or nothing when
    /// unmounted.
    #[must_use]
    pub fn render(&self, content: impl IntoIterator<Item = Markup>) -> Option<Markup> {
        if !self.is_mounted() {
            return None;
        }
        let behavior = &self.inner.behavior;
        let mut element = Markup::new("div")
            .attr("id", self.node().dom_id())
            .attr("role", behavior.role)
            .attr("data-state", "open")
            .class(&behavior.classes())
            .children(content);
        if behavior.aligned {
            element = element.attr("data-align", format!("{:?}", behavior.align).to_lowercase());
        }
        if behavior.dismiss.outside || behavior.lock_scroll {
            element = element.attr("tabindex", "-1");
        }
        Some(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devui_core::{Key, ListenerKind, Point};
    use devui_test::{FakeDocument, Journal};
    use proptest::prelude::*;

    fn context() -> (Rc<FakeDocument>, OverlayContext) {
        let doc = FakeDocument::new();
        let ctx = OverlayContext::new(doc.clone());
        (doc, ctx)
    }

    // =========================================================================
    // Behavior Tests
    // =========================================================================

    #[test]
    fn test_behavior_defaults() {
        assert!(SurfaceBehavior::dialog().lock_scroll);
        assert!(SurfaceBehavior::dialog().dismiss.escape);
        assert!(!SurfaceBehavior::dropdown().dismiss.escape);
        assert!(SurfaceBehavior::select().dismiss.escape);
        assert!(!SurfaceBehavior::select().lock_scroll);
    }

    #[test]
    fn test_behavior_with_options() {
        let b = SurfaceBehavior::dropdown().with_options(
            &OverlayOptions::new()
                .close_on_escape(true)
                .lock_scroll(true)
                .align(Align::End),
        );
        assert!(b.dismiss.escape);
        assert!(b.lock_scroll);
        assert_eq!(b.align, Align::End);
        assert!(b.classes().ends_with("right-0"));
    }

    #[test]
    fn test_unaligned_behavior_ignores_align() {
        let b = SurfaceBehavior::select().with_options(&OverlayOptions::new().align(Align::End));
        assert_eq!(b.align, Align::Start);
        assert!(!b.classes().contains("right-0"));
    }

    // =========================================================================
    // Mount Lifecycle Tests
    // =========================================================================

    #[test]
    fn test_surface_follows_controller() {
        let (doc, ctx) = context();
        let c = OverlayController::new();
        let s = Surface::new(&c, &ctx, SurfaceBehavior::select());
        assert!(!s.is_mounted());
        assert_eq!(doc.listener_count(), 0);

        c.set_open(true);
        assert!(s.is_mounted());
        assert_eq!(doc.listener_count(), 2);

        c.set_open(false);
        assert!(!s.is_mounted());
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_surface_mounts_when_created_open() {
        let (doc, ctx) = context();
        let c = OverlayController::controlled(true);
        let s = Surface::new(&c, &ctx, SurfaceBehavior::dropdown());
        assert!(s.is_mounted());
        assert_eq!(doc.listener_count_of(ListenerKind::PointerDown), 1);
        assert_eq!(doc.listener_count_of(ListenerKind::KeyDown), 0);
    }

    #[test]
    fn test_repeated_open_registers_once() {
        let (doc, ctx) = context();
        let c = OverlayController::new();
        let s = Surface::new(&c, &ctx, SurfaceBehavior::select());
        c.set_open(true);
        c.set_open(true);
        c.sync_open(true);
        assert_eq!(s.mount_count(), 1);
        assert_eq!(doc.listener_count(), 2);
    }

    #[test]
    fn test_drop_while_mounted_releases_everything() {
        let (doc, ctx) = context();
        let c = OverlayController::new();
        let s = Surface::new(&c, &ctx, SurfaceBehavior::dialog());
        c.set_open(true);
        assert!(doc.is_scroll_locked());
        assert_eq!(c.observer_count(), 1);

        drop(s);
        assert_eq!(doc.listener_count(), 0);
        assert!(!doc.is_scroll_locked());
        assert!(c.is_open(), "removal is not a state transition");
        assert_eq!(c.observer_count(), 0);
    }

    #[test]
    fn test_remove_then_reopen_mounts_replacement() {
        let (doc, ctx) = context();
        let c = OverlayController::new();
        let s = Surface::new(&c, &ctx, SurfaceBehavior::select());
        c.set_open(true);
        s.remove();
        assert!(c.is_open());
        assert_eq!(doc.listener_count(), 0);

        let s = Surface::new(&c, &ctx, SurfaceBehavior::select());
        assert!(s.is_mounted());
        assert_eq!(doc.listener_count(), 2);

        c.toggle();
        assert!(!s.is_mounted());
        c.toggle();
        assert!(s.is_mounted());
        assert_eq!(s.mount_count(), 2);
    }

    #[test]
    fn test_focus_lands_after_render() {
        let (doc, ctx) = context();
        let before = NodeId::next();
        doc.set_active_element(Some(before));
        let c = OverlayController::new();
        let s = Surface::new(&c, &ctx, SurfaceBehavior::dialog());
        doc.set_node_rendered(s.node(), false);

        c.set_open(true);
        assert_eq!(doc.focused(), Some(before));
        assert!(!s.after_render());

        doc.set_node_rendered(s.node(), true);
        assert!(s.after_render());
        assert_eq!(doc.focused(), Some(s.node()));

        c.set_open(false);
        assert_eq!(doc.focused(), Some(before));
    }

    #[test]
    fn test_after_render_without_focus_handoff() {
        let (doc, ctx) = context();
        let c = OverlayController::new();
        let s = Surface::new(&c, &ctx, SurfaceBehavior::select());
        assert!(s.after_render());
        c.set_open(true);
        assert!(s.after_render());
        assert_eq!(doc.focused(), None);
    }

    #[test]
    fn test_release_order_listeners_scroll_focus() {
        let (doc, ctx) = context();
        let before = NodeId::next();
        doc.set_active_element(Some(before));
        let c = OverlayController::new();
        let s = Surface::new(&c, &ctx, SurfaceBehavior::dialog());
        c.set_open(true);
        assert_eq!(doc.focused(), Some(s.node()));
        doc.clear_journal();

        c.set_open(false);
        let journal = doc.journal();
        let removed = journal
            .iter()
            .position(|j| matches!(j, Journal::ListenerRemoved { .. }))
            .expect("listeners removed");
        let unlocked = journal
            .iter()
            .position(|j| *j == Journal::ScrollUnlocked)
            .expect("scroll unlocked");
        let refocused = journal
            .iter()
            .position(|j| *j == Journal::Focused(before))
            .expect("focus restored");
        assert!(removed < unlocked && unlocked < refocused);
    }

    #[test]
    fn test_escape_through_document_unmounts() {
        let (doc, ctx) = context();
        let c = OverlayController::new();
        let s = Surface::new(&c, &ctx, SurfaceBehavior::select());
        c.set_open(true);
        doc.key_down(Key::Escape);
        assert!(!c.is_open());
        assert!(!s.is_mounted());
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_press_inside_keeps_open() {
        let (doc, ctx) = context();
        let c = OverlayController::new();
        let s = Surface::new(&c, &ctx, SurfaceBehavior::dropdown());
        s.set_bounds(Rect::new(0.0, 40.0, 120.0, 80.0));
        c.set_open(true);
        doc.pointer_down(Point::new(60.0, 60.0));
        assert!(s.is_mounted());
        doc.pointer_down(Point::new(300.0, 60.0));
        assert!(!s.is_mounted());
    }

    // =========================================================================
    // Render Tests
    // =========================================================================

    #[test]
    fn test_render_only_when_mounted() {
        let (_doc, ctx) = context();
        let c = OverlayController::new();
        let s = Surface::new(
            &c,
            &ctx,
            SurfaceBehavior::dropdown().with_options(&OverlayOptions::new().align(Align::Start)),
        );
        assert!(s.render([Markup::new("span")]).is_none());

        c.set_open(true);
        let m = s.render([Markup::new("span").text("Copy")]).expect("mounted");
        assert_eq!(m.get_attr("id"), Some(s.node().dom_id().as_str()));
        assert_eq!(m.get_attr("role"), Some("menu"));
        assert_eq!(m.get_attr("data-align"), Some("start"));
        assert!(m.has_class("left-0"));
        assert_eq!(m.text_content(), "Copy");
    }

    // =========================================================================
    // Property Tests
    // =========================================================================

    proptest! {
        #[test]
        fn prop_mounted_iff_open(ops in proptest::collection::vec(any::<bool>(), 0..50)) {
            let (doc, ctx) = context();
            let c = OverlayController::new();
            let s = Surface::new(&c, &ctx, SurfaceBehavior::dialog());
            for next in ops {
                c.set_open(next);
                prop_assert_eq!(s.is_mounted(), c.is_open());
                prop_assert_eq!(doc.listener_count() > 0, c.is_open());
                prop_assert_eq!(doc.is_scroll_locked(), c.is_open());
            }
        }

        #[test]
        fn prop_cycles_do_not_leak(cycles in 1usize..25) {
            let (doc, ctx) = context();
            let c = OverlayController::new();
            let s = Surface::new(&c, &ctx, SurfaceBehavior::select());
            let baseline = doc.listener_count();
            for _ in 0..cycles {
                c.set_open(true);
                c.set_open(false);
                prop_assert_eq!(doc.listener_count(), baseline);
            }
            prop_assert_eq!(s.mount_count(), cycles as u64);
        }
    }
}
