//! [`Host`] over the page document.

use super::events::dom_event_to_devui;
use devui_core::{Host, HostError, Listener, ListenerId, ListenerKind, NodeId, Phase, Rect};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, HtmlElement};

type DomClosure = Closure<dyn FnMut(web_sys::Event)>;

struct Registration {
    kind: ListenerKind,
    capture: bool,
    closure: DomClosure,
}

/// The browser document as an overlay host.
///
/// Listeners are registered on `document`. A listener removed while a
/// listener is running (an overlay closing from its own Escape handler)
/// keeps its closure alive until dispatch has unwound. Such closures are
/// freed by the next registration or removal, or by a zero-delay timer
/// scheduled when the first one is retired.
pub struct DomHost {
    document: Document,
    body: HtmlElement,
    next_id: Cell<u64>,
    listeners: RefCell<HashMap<ListenerId, Registration>>,
    retired: Rc<RefCell<Vec<DomClosure>>>,
    depth: Rc<Cell<usize>>,
}

impl DomHost {
    /// Attach to the current window's document.
    pub fn new() -> Result<Self, HostError> {
        let document = window()
            .ok_or(HostError::NoWindow)?
            .document()
            .ok_or(HostError::NoDocument)?;
        let body = document.body().ok_or(HostError::NoBody)?;
        Ok(Self {
            document,
            body,
            next_id: Cell::new(0),
            listeners: RefCell::new(HashMap::new()),
            retired: Rc::new(RefCell::new(Vec::new())),
            depth: Rc::new(Cell::new(0)),
        })
    }

    /// Number of listeners currently registered.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Closures removed during dispatch and not yet freed.
    #[must_use]
    pub fn retired_count(&self) -> usize {
        self.retired.borrow().len()
    }

    fn flush_retired(&self) {
        if self.depth.get() == 0 {
            self.retired.borrow_mut().clear();
        }
    }

    fn retire(&self, closure: DomClosure) {
        let first = {
            let mut retired = self.retired.borrow_mut();
            retired.push(closure);
            retired.len() == 1
        };
        if !first {
            return;
        }
        let retired = Rc::clone(&self.retired);
        let depth = Rc::clone(&self.depth);
        let flush = Closure::once_into_js(move || {
            if depth.get() == 0 {
                retired.borrow_mut().clear();
            }
        });
        let scheduled = window().map(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(flush.unchecked_ref(), 0)
        });
        if let Some(Err(err)) = scheduled {
            tracing::debug!(?err, "retired listener flush not scheduled");
        }
    }

    /// Set the body's `overflow` style.
    pub fn set_body_overflow(&self, value: &str) -> Result<(), HostError> {
        self.body
            .style()
            .set_property("overflow", value)
            .map_err(rejected)
    }

    /// Focus the element rendered for `node`.
    pub fn try_focus(&self, node: NodeId) -> Result<(), HostError> {
        let element = self
            .element(node)
            .ok_or_else(|| HostError::Rejected(format!("no element with id {node}")))?;
        element.focus().map_err(rejected)
    }

    fn element(&self, node: NodeId) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(&node.dom_id())?
            .dyn_into::<HtmlElement>()
            .ok()
    }
}

impl Host for DomHost {
    fn add_listener(&self, kind: ListenerKind, phase: Phase, listener: Listener) -> ListenerId {
        self.flush_retired();
        let depth = Rc::clone(&self.depth);
        let closure = DomClosure::new(move |raw: web_sys::Event| {
            let Some(event) = dom_event_to_devui(&raw) else {
                return;
            };
            if !kind.accepts(&event) {
                return;
            }
            depth.set(depth.get() + 1);
            listener(&event);
            depth.set(depth.get() - 1);
        });

        let capture = phase == Phase::Capture;
        if let Err(err) = self.document.add_event_listener_with_callback_and_bool(
            kind.dom_event_type(),
            closure.as_ref().unchecked_ref(),
            capture,
        ) {
            tracing::warn!(?kind, ?err, "addEventListener failed");
        }

        let id = ListenerId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        self.listeners.borrow_mut().insert(
            id,
            Registration {
                kind,
                capture,
                closure,
            },
        );
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.flush_retired();
        let removed = self.listeners.borrow_mut().remove(&id);
        let Some(registration) = removed else {
            return false;
        };
        if let Err(err) = self.document.remove_event_listener_with_callback_and_bool(
            registration.kind.dom_event_type(),
            registration.closure.as_ref().unchecked_ref(),
            registration.capture,
        ) {
            tracing::warn!(kind = ?registration.kind, ?err, "removeEventListener failed");
        }
        if self.depth.get() > 0 {
            self.retire(registration.closure);
        }
        true
    }

    fn set_scroll_locked(&self, locked: bool) {
        let overflow = if locked { "hidden" } else { "auto" };
        if let Err(err) = self.set_body_overflow(overflow) {
            tracing::warn!(%err, overflow, "scroll lock not applied");
        }
    }

    fn active_element(&self) -> Option<NodeId> {
        NodeId::from_dom_id(&self.document.active_element()?.id())
    }

    fn focus(&self, node: NodeId) {
        if let Err(err) = self.try_focus(node) {
            tracing::debug!(%err, "focus not moved");
        }
    }

    fn node_bounds(&self, node: NodeId) -> Option<Rect> {
        let rect = self
            .document
            .get_element_by_id(&node.dom_id())?
            .get_bounding_client_rect();
        Some(Rect::new(
            rect.x() as f32,
            rect.y() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ))
    }
}

fn rejected(err: JsValue) -> HostError {
    let message = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    HostError::Rejected(message)
}

impl Drop for DomHost {
    fn drop(&mut self) {
        let ids: Vec<ListenerId> = self.listeners.get_mut().keys().copied().collect();
        for id in ids {
            self.remove_listener(id);
        }
    }
}
