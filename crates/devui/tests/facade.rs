//! Native tests for the facade re-exports.

use devui::overlay::{Button, DropdownMenu, OverlayContext};
use devui::{Key, OverlayOptions, Point, Rect};
use devui_test::FakeDocument;

#[test]
fn test_facade_exposes_core_and_overlay() {
    let doc = FakeDocument::new();
    let ctx = OverlayContext::new(doc.clone());
    let menu = DropdownMenu::new(&ctx, &OverlayOptions::new(), Button::new("Tools"))
        .item("format", "Format JSON");
    menu.surface().set_bounds(Rect::new(0.0, 40.0, 160.0, 40.0));

    menu.controller().set_open(true);
    doc.key_down(Key::Escape);
    assert!(menu.is_open());
    doc.pointer_down(Point::new(80.0, 60.0));
    assert!(menu.is_open());
    doc.pointer_down(Point::new(400.0, 400.0));
    assert!(!menu.is_open());
    assert_eq!(doc.listener_count(), 0);
}
