//! Integration tests for simpli-dom
//!
//! Tree editing, queries, events and timers working together.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use simpli_dom::{
    Document, DomError, DomEvent, EventSupport, Listener, ListenerOptions, NodeId, ReadyState,
    TimerManager, dispatch_event, finish_loading,
};

fn list_document() -> (Document, NodeId, Vec<NodeId>) {
    let mut doc = Document::new();
    let ul = doc.tree.create_element("ul");
    doc.tree.append_child(doc.body(), ul).unwrap();
    let items = (0..3)
        .map(|i| {
            let li = doc.tree.create_element("li");
            doc.tree.append_child(ul, li).unwrap();
            doc.tree.element_mut(li).unwrap().set_attr("data-index", &i.to_string());
            li
        })
        .collect();
    (doc, ul, items)
}

// ============================================================================
// QUERIES
// ============================================================================

#[test]
fn test_query_in_document_order() {
    let (doc, _, items) = list_document();
    assert_eq!(doc.tree.query_selector_all(NodeId::ROOT, "li").unwrap(), items);
    assert_eq!(
        doc.tree.query_selector_all(NodeId::ROOT, "li[data-index='1'], li[data-index=2]").unwrap(),
        items[1..].to_vec()
    );
}

#[test]
fn test_query_invalid_selector() {
    let (doc, _, _) = list_document();
    assert!(matches!(
        doc.tree.query_selector_all(NodeId::ROOT, "li::before"),
        Err(DomError::InvalidSelector(_))
    ));
}

#[test]
fn test_query_universal_excludes_text() {
    let (mut doc, ul, _) = list_document();
    let text = doc.tree.create_text("loose");
    doc.tree.append_child(ul, text).unwrap();
    assert_eq!(doc.tree.query_selector_all(ul, "*").unwrap().len(), 3);
}

// ============================================================================
// EVENTS
// ============================================================================

#[test]
fn test_click_bubbles_to_list() {
    let (doc, ul, items) = list_document();
    let doc = doc.into_shared();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    let listener: Listener = Rc::new(move |e: &DomEvent| s.borrow_mut().push((e.target, e.current_target())));
    doc.borrow_mut()
        .add_event_listener(ul, "click", listener, ListenerOptions::default())
        .unwrap();

    dispatch_event(&doc, DomEvent::new("click", items[2])).unwrap();
    assert_eq!(*seen.borrow(), vec![(items[2], ul)]);
}

#[test]
fn test_legacy_host_ready_state() {
    let doc = Document::new().into_shared();
    doc.borrow_mut().set_event_support(EventSupport::Legacy);
    let completes = Rc::new(Cell::new(0));
    let (c, shared) = (completes.clone(), doc.clone());
    let listener: Listener = Rc::new(move |_: &DomEvent| {
        if shared.borrow().ready_state() == ReadyState::Complete {
            c.set(c.get() + 1);
        }
    });
    doc.borrow_mut()
        .attach_event(NodeId::ROOT, "onreadystatechange", listener)
        .unwrap();

    finish_loading(&doc).unwrap();
    assert_eq!(completes.get(), 1);
}

// ============================================================================
// TIMERS
// ============================================================================

#[test]
fn test_timer_mutates_document() {
    let (doc, _, items) = list_document();
    let doc = doc.into_shared();
    let timers = TimerManager::new();
    let (d, target) = (doc.clone(), items[0]);
    timers.set_timeout(
        100,
        Box::new(move |_| {
            let mut doc = d.borrow_mut();
            if let Ok(elem) = doc.tree.element_mut(target) {
                let mut style = elem.style();
                style.set_property("display", "none");
                elem.set_style(&style);
            }
        }),
    );

    timers.advance(100);
    assert_eq!(
        doc.borrow().tree.element(items[0]).unwrap().get_attr("style"),
        Some("display:none;")
    );
}
