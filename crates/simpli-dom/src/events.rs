//! DOM Events
//!
//! Listener storage and capture/target/bubble dispatch over the tree.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{DomError, DomResult, NodeId, SharedDocument};

/// Which listener API the host exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventSupport {
    /// `addEventListener`
    #[default]
    Modern,
    /// `attachEvent("on" + type)` only
    Legacy,
    /// No event subscription at all
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// Event being dispatched
///
/// Flags use `Cell` so listeners can flip them through a shared reference.
#[derive(Debug)]
pub struct DomEvent {
    pub event_type: String,
    pub target: NodeId,
    pub bubbles: bool,
    pub cancelable: bool,
    current_target: Cell<NodeId>,
    phase: Cell<EventPhase>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl DomEvent {
    /// Bubbling, cancelable event
    pub fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            bubbles: true,
            cancelable: true,
            current_target: Cell::new(NodeId::NONE),
            phase: Cell::new(EventPhase::None),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    /// Event that only reaches the target (load, readystatechange)
    pub fn non_bubbling(event_type: &str, target: NodeId) -> Self {
        Self {
            bubbles: false,
            cancelable: false,
            ..Self::new(event_type, target)
        }
    }

    pub fn current_target(&self) -> NodeId {
        self.current_target.get()
    }

    pub fn phase(&self) -> EventPhase {
        self.phase.get()
    }

    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

pub type Listener = Rc<dyn Fn(&DomEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    pub capture: bool,
    pub once: bool,
}

struct Entry {
    id: ListenerId,
    event_type: String,
    listener: Listener,
    options: ListenerOptions,
}

impl Entry {
    fn fires_in(&self, phase: EventPhase) -> bool {
        match phase {
            EventPhase::Capturing => self.options.capture,
            EventPhase::AtTarget => true,
            EventPhase::Bubbling => !self.options.capture,
            EventPhase::None => false,
        }
    }
}

/// Event listener storage
#[derive(Default)]
pub struct EventListenerRegistry {
    /// Map of node ID -> listeners in registration order
    listeners: HashMap<NodeId, Vec<Entry>>,
    next_id: u64,
}

impl EventListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event listener
    pub fn add_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        listener: Listener,
        options: ListenerOptions,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.entry(node).or_default().push(Entry {
            id,
            event_type: event_type.to_string(),
            listener,
            options,
        });
        id
    }

    /// Remove an event listener
    pub fn remove_listener(&mut self, node: NodeId, id: ListenerId) -> bool {
        let Some(entries) = self.listeners.get_mut(&node) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| e.id != id);
        before != entries.len()
    }

    /// Number of listeners for a node and event type
    pub fn count(&self, node: NodeId, event_type: &str) -> usize {
        self.listeners.get(&node).map_or(0, |entries| {
            entries.iter().filter(|e| e.event_type == event_type).count()
        })
    }

    /// Clear all listeners for a node
    pub fn clear_node(&mut self, node: NodeId) {
        self.listeners.remove(&node);
    }

    /// Listeners that fire on `node` in `phase`; `once` entries are removed
    fn take_for(&mut self, node: NodeId, event_type: &str, phase: EventPhase) -> Vec<Listener> {
        let Some(entries) = self.listeners.get_mut(&node) else {
            return Vec::new();
        };
        let selected: Vec<(ListenerId, Listener, bool)> = entries
            .iter()
            .filter(|e| e.event_type == event_type && e.fires_in(phase))
            .map(|e| (e.id, e.listener.clone(), e.options.once))
            .collect();
        entries.retain(|e| !selected.iter().any(|(id, _, once)| *once && *id == e.id));
        selected.into_iter().map(|(_, l, _)| l).collect()
    }
}

impl std::fmt::Debug for EventListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventListenerRegistry")
            .field("nodes", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

fn invoke(doc: &SharedDocument, event: &DomEvent, node: NodeId, phase: EventPhase) {
    // Borrow is released before listeners run so they may touch the document.
    let listeners = doc
        .borrow_mut()
        .listeners
        .take_for(node, &event.event_type, phase);
    if listeners.is_empty() {
        return;
    }
    event.current_target.set(node);
    event.phase.set(phase);
    for listener in listeners {
        listener(event);
    }
}

/// Dispatch `event` through the capture, target and bubble phases
pub fn dispatch_event(doc: &SharedDocument, event: DomEvent) -> DomResult<DomEvent> {
    let mut path = {
        let d = doc.borrow();
        if d.tree.get(event.target).is_none() {
            return Err(DomError::NotFound(event.target));
        }
        d.tree.ancestors(event.target)
    };
    path.reverse();
    tracing::trace!(event = %event.event_type, target = ?event.target, "dispatch");

    for &node in &path {
        if event.is_propagation_stopped() {
            break;
        }
        invoke(doc, &event, node, EventPhase::Capturing);
    }
    if !event.is_propagation_stopped() {
        invoke(doc, &event, event.target, EventPhase::AtTarget);
    }
    if event.bubbles {
        for &node in path.iter().rev() {
            if event.is_propagation_stopped() {
                break;
            }
            invoke(doc, &event, node, EventPhase::Bubbling);
        }
    }

    event.phase.set(EventPhase::None);
    event.current_target.set(NodeId::NONE);
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;
    use std::cell::RefCell;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, tag: &'static str) -> Listener {
        let log = log.clone();
        Rc::new(move |e: &DomEvent| log.borrow_mut().push(format!("{tag}:{:?}", e.phase())))
    }

    #[test]
    fn test_capture_target_bubble_order() {
        let doc = Document::new().into_shared();
        let (body, button) = {
            let mut d = doc.borrow_mut();
            let body = d.body();
            let button = d.tree.create_element("button");
            d.tree.append_child(body, button).unwrap();
            (body, button)
        };
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut d = doc.borrow_mut();
            let capture = ListenerOptions { capture: true, once: false };
            d.listeners.add_listener(body, "click", recorder(&log, "body-bubble"), ListenerOptions::default());
            d.listeners.add_listener(body, "click", recorder(&log, "body-capture"), capture);
            d.listeners.add_listener(button, "click", recorder(&log, "button"), ListenerOptions::default());
        }

        dispatch_event(&doc, DomEvent::new("click", button)).unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["body-capture:Capturing", "button:AtTarget", "body-bubble:Bubbling"]
        );
    }

    #[test]
    fn test_stop_propagation_and_once() {
        let doc = Document::new().into_shared();
        let body = doc.borrow().body();
        let hits = Rc::new(Cell::new(0));
        {
            let hits = hits.clone();
            let once = ListenerOptions { capture: false, once: true };
            doc.borrow_mut().listeners.add_listener(
                body,
                "click",
                Rc::new(move |e: &DomEvent| {
                    hits.set(hits.get() + 1);
                    e.stop_propagation();
                }),
                once,
            );
        }
        let event = dispatch_event(&doc, DomEvent::new("click", body)).unwrap();
        assert!(event.is_propagation_stopped());
        dispatch_event(&doc, DomEvent::new("click", body)).unwrap();
        assert_eq!(hits.get(), 1);
        assert_eq!(doc.borrow().listeners.count(body, "click"), 0);
    }

    #[test]
    fn test_listener_may_mutate_document() {
        let doc = Document::new().into_shared();
        let body = doc.borrow().body();
        let shared = doc.clone();
        doc.borrow_mut().listeners.add_listener(
            body,
            "click",
            Rc::new(move |e: &DomEvent| {
                let mut d = shared.borrow_mut();
                if let Ok(elem) = d.tree.element_mut(e.target) {
                    elem.set_attr("data-clicked", "yes");
                }
            }),
            ListenerOptions::default(),
        );
        dispatch_event(&doc, DomEvent::new("click", body)).unwrap();
        assert_eq!(doc.borrow().tree.element(body).unwrap().get_attr("data-clicked"), Some("yes"));
    }

    #[test]
    fn test_dispatch_unknown_target() {
        let doc = Document::new().into_shared();
        let missing = NodeId(9999);
        assert_eq!(
            dispatch_event(&doc, DomEvent::new("click", missing)).unwrap_err(),
            DomError::NotFound(missing)
        );
    }
}
