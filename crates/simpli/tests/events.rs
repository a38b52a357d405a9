//! Event tests for simpli
//!
//! listenTo/click on modern and legacy hosts, the event argument and ready
//! handling.

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::{init_tracing, page, recorder, s};
use simpli::methods::events::EventObject;
use simpli::{Selection, Selector, Simpli, SimpliError, Value};
use simpli_dom::{DomEvent, EventSupport, dispatch_event};

fn click(simpli: &Simpli, selector: &str) -> DomEvent {
    let node = simpli.select(selector).unwrap().nodes()[0];
    dispatch_event(&simpli.document(), DomEvent::new("click", node)).unwrap()
}

fn with_support(body: &str, support: EventSupport) -> Simpli {
    init_tracing();
    let mut document = simpli_html::parse(&format!("<html><body>{body}</body></html>")).unwrap();
    document.set_event_support(support);
    Simpli::new(document).unwrap()
}

// ============================================================================
// LISTENERS
// ============================================================================

#[test]
fn test_listen_to_broadcasts() {
    let simpli = page(r#"<button id="a"></button><button id="b"></button>"#);
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    let listener = Value::function(move |_, _| {
        counter.set(counter.get() + 1);
        Ok(Value::Undefined)
    });
    simpli.select("button").unwrap().call("listenTo", &[s("click"), listener]).unwrap();

    click(&simpli, "#a");
    click(&simpli, "#b");
    click(&simpli, "#b");
    assert_eq!(count.get(), 3);
}

#[test]
fn test_listener_receives_wrapper_and_event() {
    let simpli = page(r#"<div id="outer"><span id="inner"></span></div>"#);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let listener = Value::function(move |this, args| {
        let event = args[0].downcast::<EventObject>().unwrap();
        let current = this.downcast::<Selection>().unwrap();
        let target = args[0].get("target").downcast::<Selection>().unwrap();
        sink.borrow_mut().push(format!(
            "{} {} -> {}",
            event.event_type(),
            target.call("prop", &[s("id")])?.to_display_string(),
            current.call("prop", &[s("id")])?.to_display_string(),
        ));
        Ok(Value::Undefined)
    });
    simpli.select("#outer").unwrap().call("click", &[listener]).unwrap();
    click(&simpli, "#inner");
    assert_eq!(*seen.borrow(), vec!["click inner -> outer"]);
}

#[test]
fn test_event_object_controls_dispatch() {
    let simpli = page(r#"<div id="outer"><a id="link"></a></div>"#);
    let (log, outer_listener) = recorder();
    simpli.select("#outer").unwrap().call("click", &[outer_listener]).unwrap();

    let stop = Value::function(|_, args| {
        let event = &args[0];
        event.get("preventDefault").as_function().unwrap().call(event, &[])?;
        event.get("stopPropagation").as_function().unwrap().call(event, &[])?;
        Ok(Value::Undefined)
    });
    simpli.select("#link").unwrap().call("click", &[stop]).unwrap();

    let event = click(&simpli, "#link");
    assert!(event.is_default_prevented());
    assert!(event.is_propagation_stopped());
    assert!(log.borrow().is_empty());
}

#[test]
fn test_listener_errors_do_not_escape() {
    let simpli = page(r#"<p id="p"></p>"#);
    let failing = Value::function(|_, _| Err(SimpliError::InvalidArgument("boom".into())));
    let (log, after) = recorder();
    let p = simpli.select("#p").unwrap();
    p.call("click", &[failing]).unwrap();
    p.call("click", &[after]).unwrap();
    click(&simpli, "#p");
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn test_listen_to_validation() {
    let simpli = page("<p></p>");
    let p = simpli.select("p").unwrap();
    let (_, listener) = recorder();
    assert!(p.call("listenTo", &[Value::from(1), listener.clone()]).is_err());
    assert!(p.call("listenTo", &[s("click"), s("not a function")]).is_err());
    assert!(p.call("listenTo", &[s("click"), listener, s("yes")]).is_err());
}

#[test]
fn test_legacy_and_missing_event_support() {
    let simpli = with_support(r#"<p id="p"></p>"#, EventSupport::Legacy);
    let (log, listener) = recorder();
    simpli.select("#p").unwrap().call("click", &[listener]).unwrap();
    click(&simpli, "#p");
    assert_eq!(log.borrow().len(), 1);

    let simpli = with_support(r#"<p id="p"></p>"#, EventSupport::None);
    let (_, listener) = recorder();
    assert!(matches!(
        simpli.select("#p").unwrap().call("click", &[listener]),
        Err(SimpliError::EventListeningUnsupported)
    ));
}

// ============================================================================
// READY
// ============================================================================

#[test]
fn test_ready_fires_once_on_load() {
    let simpli = page("");
    let (log, listener) = recorder();
    let document = simpli.select(Selector::Document).unwrap();
    document.call("ready", &[listener]).unwrap();
    assert!(log.borrow().is_empty());

    simpli.finish_loading().unwrap();
    simpli.finish_loading().unwrap();
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn test_ready_after_load_runs_at_once() {
    let simpli = page("");
    simpli.finish_loading().unwrap();
    let (log, listener) = recorder();
    simpli.select(Selector::Document).unwrap().call("ready", &[listener]).unwrap();
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn test_ready_on_legacy_host_waits_for_complete() {
    let simpli = with_support("", EventSupport::Legacy);
    let (log, listener) = recorder();
    simpli.select(Selector::Document).unwrap().call("ready", &[listener]).unwrap();
    simpli.finish_loading().unwrap();
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn test_ready_is_document_only() {
    let simpli = page("<p></p>");
    let (_, listener) = recorder();
    let p = simpli.select("p").unwrap();
    assert!(matches!(p.call("ready", &[listener]), Err(SimpliError::UnknownMethod { .. })));
}
