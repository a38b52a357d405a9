//! Event subscription: `listenTo`, `click`, `ready`
//!
//! Listeners hold a weak handle to the host and the subscribed node. When
//! the event fires the node is wrapped again, so the callback receives a
//! fresh element wrapper as `this` and an [`EventObject`] as its argument.

use std::any::Any;
use std::cell::Cell;
use std::rc::{Rc, Weak};

use simpli_dom::{DomEvent, EventSupport, Listener, ListenerId, ListenerOptions, NodeId, ReadyState};

use super::{arg, this};
use crate::registry::{DOCUMENT_TAG, ElementRegistry, GENERIC_TAG, Method, Policy};
use crate::selection::{Host, Selection};
use crate::types::{Presence, TypeDescriptor, expect_type};
use crate::value::{Function, HostObject, Value};
use crate::{Result, SimpliError};

/// Class name of the event argument passed to listeners
pub const EVENT_CLASS: &str = "Event";

pub(crate) fn register(registry: &mut ElementRegistry) -> Result<()> {
    registry.extend(
        &[GENERIC_TAG, DOCUMENT_TAG],
        "listenTo",
        Policy::Collection,
        Method::new(listen_to),
        None,
    )?;
    registry.extend(
        &[GENERIC_TAG, DOCUMENT_TAG],
        "click",
        Policy::Collection,
        Method::new(click),
        None,
    )?;
    registry.register(DOCUMENT_TAG, "ready", Policy::Element, Method::new(ready), None)?;
    Ok(())
}

fn expect_listener(listener: &Value) -> Result<Function> {
    expect_type(
        listener,
        &TypeDescriptor::function(),
        Presence::Required,
        "Invalid type, it should be a function",
    )?;
    listener
        .as_function()
        .cloned()
        .ok_or_else(|| SimpliError::invalid_argument("Invalid type, it should be a function"))
}

fn expect_capture(capture: &Value) -> Result<bool> {
    expect_type(
        capture,
        &TypeDescriptor::boolean(),
        Presence::Optional,
        "Invalid capture flag, it should be a boolean",
    )?;
    Ok(capture.as_bool().unwrap_or(false))
}

// listenTo(type, listener, useCapture?)
fn listen_to(target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
    let event_type = arg(args, 0);
    expect_type(
        &event_type,
        &TypeDescriptor::string(),
        Presence::Required,
        "Invalid type, it should be a string",
    )?;
    let listener = expect_listener(&arg(args, 1))?;
    let capture = expect_capture(&arg(args, 2))?;
    let node = target.node().unwrap_or(NodeId::ROOT);
    subscribe(target, node, event_type.as_str().unwrap_or_default(), listener, capture)?;
    Ok(this(target))
}

// click(listener, useCapture?)
fn click(target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
    let mut forwarded = Vec::with_capacity(args.len() + 1);
    forwarded.push(Value::from("click"));
    forwarded.extend_from_slice(args);
    listen_to(target, &forwarded)
}

/// Subscribe `callback` on `node` through whichever listener API the host offers
pub(crate) fn subscribe(
    target: &Rc<Selection>,
    node: NodeId,
    event_type: &str,
    callback: Function,
    capture: bool,
) -> Result<ListenerId> {
    let host = target.weak_host();
    let listener: Listener = Rc::new(move |event: &DomEvent| run_listener(&host, node, &callback, event));
    register_listener(target, node, event_type, listener, capture)
}

fn register_listener(
    target: &Rc<Selection>,
    node: NodeId,
    event_type: &str,
    listener: Listener,
    capture: bool,
) -> Result<ListenerId> {
    let shared = target.document();
    let mut doc = shared.borrow_mut();
    let id = match doc.event_support() {
        EventSupport::Modern => doc.add_event_listener(
            node,
            event_type,
            listener,
            ListenerOptions {
                capture,
                once: false,
            },
        )?,
        EventSupport::Legacy => doc.attach_event(node, &format!("on{event_type}"), listener)?,
        EventSupport::None => return Err(SimpliError::EventListeningUnsupported),
    };
    tracing::trace!(event = event_type, ?node, "listener added");
    Ok(id)
}

fn run_listener(host: &Weak<Host>, node: NodeId, callback: &Function, event: &DomEvent) {
    let Some(host) = host.upgrade() else {
        return;
    };
    if let Err(err) = invoke(&host, node, callback, event) {
        tracing::warn!(event = %event.event_type, error = %err, "event listener failed");
    }
}

fn invoke(host: &Rc<Host>, node: NodeId, callback: &Function, event: &DomEvent) -> Result<()> {
    let current = host.wrap_node(node)?;
    let object = Rc::new(EventObject::new(host, event, current.clone())?);
    callback.call(&Value::host(current), &[Value::host(object.clone())])?;
    object.apply_to(event);
    Ok(())
}

// ready(listener)
fn ready(target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
    let callback = expect_listener(&arg(args, 0))?;
    let (state, support) = {
        let shared = target.document();
        let doc = shared.borrow();
        (doc.ready_state(), doc.event_support())
    };
    if state == ReadyState::Complete {
        callback.call(&this(target), &[])?;
        return Ok(this(target));
    }

    let host = target.weak_host();
    match support {
        EventSupport::Modern => {
            let listener: Listener = Rc::new(move |_: &DomEvent| fire_ready(&host, &callback));
            target.document().borrow_mut().add_event_listener(
                NodeId::ROOT,
                "DOMContentLoaded",
                listener,
                ListenerOptions {
                    capture: false,
                    once: true,
                },
            )?;
        }
        EventSupport::Legacy => {
            let fired = Cell::new(false);
            let listener: Listener = Rc::new(move |_: &DomEvent| {
                let complete = host
                    .upgrade()
                    .is_some_and(|h| h.document.borrow().ready_state() == ReadyState::Complete);
                if complete && !fired.replace(true) {
                    fire_ready(&host, &callback);
                }
            });
            target
                .document()
                .borrow_mut()
                .attach_event(NodeId::ROOT, "onreadystatechange", listener)?;
        }
        EventSupport::None => return Err(SimpliError::EventListeningUnsupported),
    }
    Ok(this(target))
}

fn fire_ready(host: &Weak<Host>, callback: &Function) {
    let Some(host) = host.upgrade() else {
        return;
    };
    let document = Value::host(host.wrap_document());
    if let Err(err) = callback.call(&document, &[]) {
        tracing::warn!(error = %err, "ready listener failed");
    }
}

/// Event argument handed to listeners
///
/// `preventDefault` and `stopPropagation` set flags that are copied back
/// onto the dispatched event once the listener returns.
pub struct EventObject {
    event_type: String,
    target: Rc<Selection>,
    current_target: Rc<Selection>,
    cancelable: bool,
    default_prevented: Rc<Cell<bool>>,
    propagation_stopped: Rc<Cell<bool>>,
}

impl EventObject {
    fn new(host: &Rc<Host>, event: &DomEvent, current_target: Rc<Selection>) -> Result<Self> {
        Ok(Self {
            event_type: event.event_type.clone(),
            target: host.wrap_node(event.target)?,
            current_target,
            cancelable: event.cancelable,
            default_prevented: Rc::new(Cell::new(event.is_default_prevented())),
            propagation_stopped: Rc::new(Cell::new(false)),
        })
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    fn apply_to(&self, event: &DomEvent) {
        if self.default_prevented.get() {
            event.prevent_default();
        }
        if self.propagation_stopped.get() {
            event.stop_propagation();
        }
    }
}

fn flag_setter(flag: &Rc<Cell<bool>>, enabled: bool) -> Value {
    let flag = flag.clone();
    Value::function(move |_, _| {
        if enabled {
            flag.set(true);
        }
        Ok(Value::Undefined)
    })
}

impl HostObject for EventObject {
    fn class_name(&self) -> &str {
        EVENT_CLASS
    }

    fn property(&self, name: &str) -> Value {
        match name {
            "type" => Value::from(self.event_type.as_str()),
            "target" => Value::host(self.target.clone()),
            "currentTarget" => Value::host(self.current_target.clone()),
            "cancelable" => Value::from(self.cancelable),
            "defaultPrevented" => Value::from(self.default_prevented.get()),
            "preventDefault" => flag_setter(&self.default_prevented, self.cancelable),
            "stopPropagation" => flag_setter(&self.propagation_stopped, true),
            _ => Value::Undefined,
        }
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}
