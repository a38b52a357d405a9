//! Document
//!
//! The tree plus document-level state: URL, ready state, listener registry
//! and the event API the host exposes.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    DomError, DomEvent, DomResult, DomTree, EventListenerRegistry, EventSupport, Listener,
    ListenerId, ListenerOptions, NodeId, dispatch_event,
};

/// Shared handle to a document
pub type SharedDocument = Rc<RefCell<Document>>;

/// `document.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    #[default]
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadyState::Loading => "loading",
            ReadyState::Interactive => "interactive",
            ReadyState::Complete => "complete",
        }
    }
}

#[derive(Debug)]
pub struct Document {
    pub tree: DomTree,
    pub listeners: EventListenerRegistry,
    url: String,
    ready_state: ReadyState,
    event_support: EventSupport,
    html: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Document {
    /// Empty `<html><head></head><body></body></html>` document
    pub fn new() -> Self {
        Self::from_tree(DomTree::new(), "about:blank")
    }

    /// Wrap a parsed tree, creating any missing html/head/body element
    pub fn from_tree(mut tree: DomTree, url: &str) -> Self {
        let root = tree.root();
        let html = find_child(&tree, root, "html").unwrap_or_else(|| {
            let html = tree.create_element("html");
            // Fresh nodes always attach cleanly.
            let _ = tree.append_child(root, html);
            html
        });
        let head = find_child(&tree, html, "head").unwrap_or_else(|| {
            let head = tree.create_element("head");
            let _ = tree.append_child(html, head);
            head
        });
        let body = find_child(&tree, html, "body").unwrap_or_else(|| {
            let body = tree.create_element("body");
            let _ = tree.append_child(html, body);
            body
        });
        Self {
            tree,
            listeners: EventListenerRegistry::new(),
            url: url.to_string(),
            ready_state: ReadyState::Loading,
            event_support: EventSupport::Modern,
            html,
            head,
            body,
        }
    }

    pub fn into_shared(self) -> SharedDocument {
        Rc::new(RefCell::new(self))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    pub fn event_support(&self) -> EventSupport {
        self.event_support
    }

    /// Emulate a host with a different listener API
    pub fn set_event_support(&mut self, support: EventSupport) {
        self.event_support = support;
    }

    /// `document.documentElement`
    pub fn html(&self) -> NodeId {
        self.html
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&n| self.tree.element(n).is_ok_and(|e| e.id() == Some(id)))
    }

    /// `document.title` (whitespace collapsed)
    pub fn title(&self) -> String {
        let Some(title) = find_descendant(&self.tree, self.html, "title") else {
            return String::new();
        };
        self.tree
            .text_content(title)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn set_title(&mut self, value: &str) -> DomResult<()> {
        let title = match find_descendant(&self.tree, self.html, "title") {
            Some(title) => title,
            None => {
                let title = self.tree.create_element("title");
                self.tree.append_child(self.head, title)?;
                title
            }
        };
        self.tree.set_text_content(title, value)
    }

    /// `addEventListener`, available on modern hosts only
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        listener: Listener,
        options: ListenerOptions,
    ) -> DomResult<ListenerId> {
        if self.event_support != EventSupport::Modern {
            return Err(DomError::NotSupported("addEventListener"));
        }
        self.tree.get(node).ok_or(DomError::NotFound(node))?;
        Ok(self.listeners.add_listener(node, event_type, listener, options))
    }

    /// `attachEvent("on" + type)`, available on legacy hosts only
    pub fn attach_event(
        &mut self,
        node: NodeId,
        handler_name: &str,
        listener: Listener,
    ) -> DomResult<ListenerId> {
        if self.event_support != EventSupport::Legacy {
            return Err(DomError::NotSupported("attachEvent"));
        }
        let event_type = handler_name
            .strip_prefix("on")
            .ok_or(DomError::NotSupported("attachEvent without an 'on' handler name"))?;
        self.tree.get(node).ok_or(DomError::NotFound(node))?;
        Ok(self
            .listeners
            .add_listener(node, event_type, listener, ListenerOptions::default()))
    }

    pub fn remove_event_listener(&mut self, node: NodeId, id: ListenerId) -> bool {
        self.listeners.remove_listener(node, id)
    }

    /// Option elements of a select, in document order
    pub fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.tree
            .descendants(select)
            .into_iter()
            .filter(|&n| self.tree.element(n).is_ok_and(|e| e.tag == "option"))
            .collect()
    }

    /// Selected option of a single select: the last option carrying
    /// `selected`, else the first option
    pub fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        let options = self.options(select);
        options
            .iter()
            .rev()
            .find(|&&o| self.tree.element(o).is_ok_and(|e| e.attrs.has("selected")))
            .or_else(|| options.first())
            .copied()
    }

    /// `option.value`: the value attribute, else the text
    pub fn option_value(&self, option: NodeId) -> String {
        match self.tree.element(option).ok().and_then(|e| e.get_attr("value")) {
            Some(value) => value.to_string(),
            None => self.option_text(option),
        }
    }

    /// `option.text` (whitespace collapsed)
    pub fn option_text(&self, option: NodeId) -> String {
        self.tree
            .text_content(option)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn find_child(tree: &DomTree, parent: NodeId, tag: &str) -> Option<NodeId> {
    tree.element_children(parent)
        .into_iter()
        .find(|&c| tree.element(c).is_ok_and(|e| e.tag == tag))
}

fn find_descendant(tree: &DomTree, root: NodeId, tag: &str) -> Option<NodeId> {
    tree.descendants(root)
        .into_iter()
        .find(|&c| tree.element(c).is_ok_and(|e| e.tag == tag))
}

/// Run the end of document loading: `interactive`, `DOMContentLoaded`,
/// `complete`, `load`. Does nothing once the document is complete.
pub fn finish_loading(doc: &SharedDocument) -> DomResult<()> {
    if doc.borrow().ready_state == ReadyState::Complete {
        return Ok(());
    }
    let root = NodeId::ROOT;

    doc.borrow_mut().ready_state = ReadyState::Interactive;
    dispatch_event(doc, DomEvent::non_bubbling("readystatechange", root))?;
    let mut loaded = DomEvent::new("DOMContentLoaded", root);
    loaded.cancelable = false;
    dispatch_event(doc, loaded)?;

    doc.borrow_mut().ready_state = ReadyState::Complete;
    dispatch_event(doc, DomEvent::non_bubbling("readystatechange", root))?;
    dispatch_event(doc, DomEvent::non_bubbling("load", root))?;
    tracing::debug!(url = %doc.borrow().url, "document loaded");
    Ok(())
}
