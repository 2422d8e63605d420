//! In-memory document implementing [`Host`].

use devui_core::{
    Event, Host, Key, Listener, ListenerId, ListenerKind, NodeId, Phase, Point, PointerId,
    PointerType, Rect,
};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

/// One host operation, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Journal {
    /// A listener was registered
    ListenerAdded {
        /// Listener handle
        id: ListenerId,
        /// Listener kind
        kind: ListenerKind,
        /// Dispatch phase
        phase: Phase,
    },
    /// A listener was unregistered
    ListenerRemoved {
        /// Listener handle
        id: ListenerId,
        /// Listener kind
        kind: ListenerKind,
    },
    /// Background scrolling suppressed
    ScrollLocked,
    /// Background scrolling restored
    ScrollUnlocked,
    /// Focus moved to a node
    Focused(NodeId),
    /// Marker pushed by the test itself
    Mark(String),
}

struct Registered {
    kind: ListenerKind,
    phase: Phase,
    listener: Listener,
}

#[derive(Default)]
struct State {
    next_id: u64,
    listeners: BTreeMap<ListenerId, Registered>,
    scroll_locked: bool,
    focused: Option<NodeId>,
    bounds: HashMap<NodeId, Rect>,
    unrendered: HashSet<NodeId>,
    journal: Vec<Journal>,
}

/// A document with listener bookkeeping, a scroll-lock flag and focus.
#[derive(Default)]
pub struct FakeDocument {
    state: RefCell<State>,
}

impl FakeDocument {
    /// Create a shared empty document.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    // === Event Simulation ===

    /// Deliver an event to matching listeners, capture phase first, each
    /// phase in registration order. Returns how many listeners ran.
    ///
    /// Listeners may add or remove listeners while running. A listener
    /// removed before its turn is skipped; one added during dispatch does
    /// not see the current event.
    pub fn dispatch(&self, event: &Event) -> usize {
        let mut snapshot: Vec<(ListenerId, Listener)> = Vec::new();
        {
            let state = self.state.borrow();
            for phase in [Phase::Capture, Phase::Bubble] {
                snapshot.extend(
                    state
                        .listeners
                        .iter()
                        .filter(|(_, r)| r.phase == phase && r.kind.accepts(event))
                        .map(|(id, r)| (*id, Rc::clone(&r.listener))),
                );
            }
        }

        let mut ran = 0;
        for (id, listener) in snapshot {
            if !self.state.borrow().listeners.contains_key(&id) {
                continue;
            }
            listener(event);
            ran += 1;
        }
        ran
    }

    /// Simulate a primary pointer press at a position.
    pub fn pointer_down(&self, position: Point) -> usize {
        self.dispatch(&Event::PointerDown {
            pointer_id: PointerId(1),
            pointer_type: PointerType::Mouse,
            position,
        })
    }

    /// Simulate a key press.
    pub fn key_down(&self, key: Key) -> usize {
        self.dispatch(&Event::KeyDown { key })
    }

    /// Give a node host-measured bounds.
    pub fn set_node_bounds(&self, node: NodeId, bounds: Rect) {
        self.state.borrow_mut().bounds.insert(node, bounds);
    }

    /// Mark whether a node's element exists. Focusing a node that is not
    /// rendered does nothing, as in a browser.
    pub fn set_node_rendered(&self, node: NodeId, rendered: bool) {
        let mut state = self.state.borrow_mut();
        if rendered {
            state.unrendered.remove(&node);
        } else {
            state.unrendered.insert(node);
        }
    }

    /// Focus a node as the user would, without journaling.
    pub fn set_active_element(&self, node: Option<NodeId>) {
        self.state.borrow_mut().focused = node;
    }

    // === Queries ===

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Number of registered listeners of one kind.
    #[must_use]
    pub fn listener_count_of(&self, kind: ListenerKind) -> usize {
        self.state
            .borrow()
            .listeners
            .values()
            .filter(|r| r.kind == kind)
            .count()
    }

    /// Phases of registered listeners of one kind.
    #[must_use]
    pub fn phases_of(&self, kind: ListenerKind) -> Vec<Phase> {
        self.state
            .borrow()
            .listeners
            .values()
            .filter(|r| r.kind == kind)
            .map(|r| r.phase)
            .collect()
    }

    /// Whether background scrolling is currently suppressed.
    #[must_use]
    pub fn is_scroll_locked(&self) -> bool {
        self.state.borrow().scroll_locked
    }

    /// Currently focused node.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.state.borrow().focused
    }

    // === Journal ===

    /// Push a marker into the journal, e.g. from a callback under test.
    pub fn mark(&self, label: impl Into<String>) {
        self.state
            .borrow_mut()
            .journal
            .push(Journal::Mark(label.into()));
    }

    /// Copy of the journal so far.
    #[must_use]
    pub fn journal(&self) -> Vec<Journal> {
        self.state.borrow().journal.clone()
    }

    /// Forget journaled operations.
    pub fn clear_journal(&self) {
        self.state.borrow_mut().journal.clear();
    }

    /// Index of the first journal entry matching a predicate.
    #[must_use]
    pub fn position_of(&self, pred: impl Fn(&Journal) -> bool) -> Option<usize> {
        self.state.borrow().journal.iter().position(pred)
    }
}

impl Host for FakeDocument {
    fn add_listener(&self, kind: ListenerKind, phase: Phase, listener: Listener) -> ListenerId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = ListenerId(state.next_id);
        state.listeners.insert(
            id,
            Registered {
                kind,
                phase,
                listener,
            },
        );
        state.journal.push(Journal::ListenerAdded { id, kind, phase });
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        // The listener is dropped after the borrow ends: its captures may
        // call back into the document when they go away.
        let removed = self.state.borrow_mut().listeners.remove(&id);
        match removed {
            Some(removed) => {
                self.state
                    .borrow_mut()
                    .journal
                    .push(Journal::ListenerRemoved {
                        id,
                        kind: removed.kind,
                    });
                true
            }
            None => false,
        }
    }

    fn set_scroll_locked(&self, locked: bool) {
        let mut state = self.state.borrow_mut();
        state.scroll_locked = locked;
        state.journal.push(if locked {
            Journal::ScrollLocked
        } else {
            Journal::ScrollUnlocked
        });
    }

    fn active_element(&self) -> Option<NodeId> {
        self.state.borrow().focused
    }

    fn focus(&self, node: NodeId) {
        let mut state = self.state.borrow_mut();
        if state.unrendered.contains(&node) {
            return;
        }
        state.focused = Some(node);
        state.journal.push(Journal::Focused(node));
    }

    fn node_bounds(&self, node: NodeId) -> Option<Rect> {
        self.state.borrow().bounds.get(&node).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, Listener) {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        (count, Rc::new(move |_: &Event| seen.set(seen.get() + 1)))
    }

    #[test]
    fn test_add_remove_listener() {
        let doc = FakeDocument::new();
        let (_, l) = counter();
        let id = doc.add_listener(ListenerKind::PointerDown, Phase::Capture, l);
        assert_eq!(doc.listener_count(), 1);
        assert_eq!(doc.listener_count_of(ListenerKind::KeyDown), 0);
        assert!(doc.remove_listener(id));
        assert!(!doc.remove_listener(id));
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_dispatch_filters_by_kind() {
        let doc = FakeDocument::new();
        let (presses, l) = counter();
        doc.add_listener(ListenerKind::PointerDown, Phase::Bubble, l);
        assert_eq!(doc.key_down(Key::Escape), 0);
        assert_eq!(doc.pointer_down(Point::ORIGIN), 1);
        assert_eq!(presses.get(), 1);
    }

    #[test]
    fn test_dispatch_capture_before_bubble() {
        let doc = FakeDocument::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let o = Rc::clone(&order);
        doc.add_listener(
            ListenerKind::KeyDown,
            Phase::Bubble,
            Rc::new(move |_: &Event| o.borrow_mut().push("bubble")),
        );
        let o = Rc::clone(&order);
        doc.add_listener(
            ListenerKind::KeyDown,
            Phase::Capture,
            Rc::new(move |_: &Event| o.borrow_mut().push("capture")),
        );
        doc.key_down(Key::Tab);
        assert_eq!(*order.borrow(), vec!["capture", "bubble"]);
    }

    #[test]
    fn test_listener_may_remove_itself_and_others() {
        let doc = FakeDocument::new();
        let (later, l) = counter();
        let ids = Rc::new(RefCell::new(Vec::new()));
        let ids_in = Rc::clone(&ids);
        let doc_in = Rc::clone(&doc);
        let first = doc.add_listener(
            ListenerKind::KeyDown,
            Phase::Capture,
            Rc::new(move |_: &Event| {
                for id in ids_in.borrow().iter() {
                    doc_in.remove_listener(*id);
                }
            }),
        );
        let second = doc.add_listener(ListenerKind::KeyDown, Phase::Capture, l);
        ids.borrow_mut().extend([first, second]);

        assert_eq!(doc.key_down(Key::Escape), 1);
        assert_eq!(later.get(), 0);
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn test_scroll_lock_and_focus_journal() {
        let doc = FakeDocument::new();
        let node = NodeId(7);
        doc.set_scroll_locked(true);
        doc.focus(node);
        doc.mark("done");
        doc.set_scroll_locked(false);
        assert!(!doc.is_scroll_locked());
        assert_eq!(doc.focused(), Some(node));
        assert_eq!(
            doc.journal(),
            vec![
                Journal::ScrollLocked,
                Journal::Focused(node),
                Journal::Mark("done".into()),
                Journal::ScrollUnlocked,
            ]
        );
        assert_eq!(doc.position_of(|j| *j == Journal::ScrollUnlocked), Some(3));
        doc.clear_journal();
        assert!(doc.journal().is_empty());
    }

    proptest! {
        #[test]
        fn prop_listener_count_matches_model(ops in proptest::collection::vec((any::<bool>(), 0usize..8), 0..40)) {
            let doc = FakeDocument::new();
            let mut live: Vec<ListenerId> = Vec::new();
            for (add, pick) in ops {
                if add || live.is_empty() {
                    let (_, l) = counter();
                    live.push(doc.add_listener(ListenerKind::KeyDown, Phase::Bubble, l));
                } else {
                    let id = live.remove(pick % live.len());
                    prop_assert!(doc.remove_listener(id));
                }
                prop_assert_eq!(doc.listener_count(), live.len());
            }
            prop_assert_eq!(doc.key_down(Key::Enter), live.len());
        }
    }

    #[test]
    fn test_focus_ignores_unrendered_node() {
        let doc = FakeDocument::new();
        let node = NodeId(3);
        doc.set_node_rendered(node, false);
        doc.focus(node);
        assert_eq!(doc.focused(), None);
        assert!(doc.journal().is_empty());

        doc.set_node_rendered(node, true);
        doc.focus(node);
        assert_eq!(doc.focused(), Some(node));
    }

    #[test]
    fn test_node_bounds() {
        let doc = FakeDocument::new();
        let node = NodeId(3);
        assert_eq!(doc.node_bounds(node), None);
        doc.set_node_bounds(node, Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(doc.node_bounds(node), Some(Rect::new(1.0, 2.0, 3.0, 4.0)));
    }
}
