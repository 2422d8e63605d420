//! Browser event handling - converts web events to DevUI events.
//!
//! Positions are viewport (client) coordinates so they compare directly
//! with `getBoundingClientRect` bounds.

use devui_core::{Event, Key, MouseButton, Point, PointerId, PointerType};
use wasm_bindgen::JsCast;
use web_sys::{KeyboardEvent, MouseEvent, PointerEvent};

/// Map a DOM `button` index to a core button.
#[must_use]
pub const fn mouse_button(button: i16) -> MouseButton {
    match button {
        1 => MouseButton::Middle,
        2 => MouseButton::Right,
        _ => MouseButton::Left,
    }
}

fn client_position(event: &MouseEvent) -> Point {
    Point::new(event.client_x() as f32, event.client_y() as f32)
}

/// Convert a `web_sys::MouseEvent` to a DevUI event.
#[must_use]
pub fn mouse_event_to_devui(event: &MouseEvent, event_type: &str) -> Event {
    let position = client_position(event);
    let button = mouse_button(event.button());

    match event_type {
        "mousedown" => Event::MouseDown { position, button },
        // Click is mousedown + mouseup, treat as mouseup
        "mouseup" | "click" => Event::MouseUp { position, button },
        _ => Event::MouseMove { position },
    }
}

/// Convert a `web_sys::PointerEvent` (pointerdown) to a DevUI event.
#[must_use]
pub fn pointer_event_to_devui(event: &PointerEvent) -> Event {
    Event::PointerDown {
        pointer_id: PointerId(event.pointer_id() as u32),
        pointer_type: PointerType::from(event.pointer_type().as_str()),
        position: client_position(event),
    }
}

/// Convert a `web_sys::KeyboardEvent` to a DevUI event.
#[must_use]
pub fn keyboard_event_to_devui(event: &KeyboardEvent, event_type: &str) -> Event {
    let key = Key::from_dom_key(&event.key());

    match event_type {
        "keyup" => Event::KeyUp { key },
        _ => Event::KeyDown { key },
    }
}

/// Convert any supported DOM event by its `type`.
#[must_use]
pub fn dom_event_to_devui(event: &web_sys::Event) -> Option<Event> {
    let event_type = event.type_();
    match event_type.as_str() {
        "pointerdown" => event.dyn_ref::<PointerEvent>().map(pointer_event_to_devui),
        "mousedown" | "mouseup" | "mousemove" | "click" => event
            .dyn_ref::<MouseEvent>()
            .map(|e| mouse_event_to_devui(e, &event_type)),
        "keydown" | "keyup" => event
            .dyn_ref::<KeyboardEvent>()
            .map(|e| keyboard_event_to_devui(e, &event_type)),
        "focusin" => Some(Event::FocusIn),
        "focusout" => Some(Event::FocusOut),
        _ => None,
    }
}
