//! Simpli
//!
//! A jQuery-like convenience layer over `simpli_dom`: selections with
//! per-tag bound methods, a runtime type descriptor engine for argument
//! validation, fade effects on the host timer loop and a few small data
//! structures.
//!
//! ```no_run
//! use simpli::{Simpli, Value};
//!
//! let s = Simpli::from_html("<p class=\"note\">hi</p>")?;
//! let notes = s.select(".note")?;
//! notes.call("css", &[Value::from("color"), Value::from("red")])?;
//! notes.call("addClass", &[Value::from("seen")])?;
//! # Ok::<(), simpli::SimpliError>(())
//! ```

mod config;
mod effects;
mod error;
pub mod methods;
pub mod registry;
mod selection;
pub mod structures;
pub mod types;
pub mod value;

use std::rc::Rc;

use simpli_dom::{Document, NodeId, SharedDocument, TimerManager};

pub use config::{FadeConfig, SimpliConfig};
pub use error::{Result, SimpliError};
pub use registry::{ElementRegistry, Method, Policy, Strategy, TargetKind};
pub use selection::{COLLECTION_CLASS, ELEMENT_CLASS, Selection};
pub use types::{Presence, Primitive, TypeDescriptor, is_type, resolve_class_name};
pub use value::{Function, HostObject, Object, Value};

use selection::Host;

/// What to select
#[derive(Debug, Clone, Copy)]
pub enum Selector<'a> {
    /// CSS selector, matched against the whole document
    Css(&'a str),
    /// One element, wrapped as a collection of one
    Node(NodeId),
    /// Several elements
    Nodes(&'a [NodeId]),
    /// The document itself
    Document,
}

impl<'a> From<&'a str> for Selector<'a> {
    fn from(selector: &'a str) -> Self {
        Selector::Css(selector)
    }
}

impl From<NodeId> for Selector<'_> {
    fn from(node: NodeId) -> Self {
        Selector::Node(node)
    }
}

impl<'a> From<&'a [NodeId]> for Selector<'a> {
    fn from(nodes: &'a [NodeId]) -> Self {
        Selector::Nodes(nodes)
    }
}

/// Selection entry point bound to one document
pub struct Simpli {
    host: Rc<Host>,
}

impl Simpli {
    /// Use the built-in method registry and default configuration
    pub fn new(document: Document) -> Result<Self> {
        Ok(Self::with_registry(document, ElementRegistry::with_builtins()?))
    }

    /// Parse `html` into a fresh document
    pub fn from_html(html: &str) -> Result<Self> {
        Self::new(simpli_html::parse(html)?)
    }

    pub fn with_registry(document: Document, registry: ElementRegistry) -> Self {
        Self::from_parts(document.into_shared(), registry, SimpliConfig::default())
    }

    pub fn with_config(document: Document, registry: ElementRegistry, config: SimpliConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(document.into_shared(), registry, config))
    }

    fn from_parts(document: SharedDocument, registry: ElementRegistry, config: SimpliConfig) -> Self {
        Self {
            host: Rc::new(Host {
                document,
                timers: Rc::new(TimerManager::new()),
                registry: Rc::new(registry),
                config,
            }),
        }
    }

    /// Wrap a selector, an element, several elements or the document
    pub fn select<'a>(&self, target: impl Into<Selector<'a>>) -> Result<Rc<Selection>> {
        match target.into() {
            Selector::Css(selector) => {
                let nodes = {
                    let doc = self.host.document.borrow();
                    doc.tree
                        .query_selector_all(doc.tree.root(), selector)
                        .map_err(|_| {
                            SimpliError::InvalidSelector("it should be a valid CSS selector".to_string())
                        })?
                };
                self.host.wrap_collection(&nodes)
            }
            Selector::Node(NodeId::ROOT) | Selector::Document => Ok(self.host.wrap_document()),
            Selector::Node(node) => self.host.wrap_collection(&[node]),
            Selector::Nodes(nodes) => self.host.wrap_collection(nodes),
        }
    }

    /// Dynamic entry point: a selector string or an existing selection
    pub fn select_value(&self, target: &Value) -> Result<Rc<Selection>> {
        match target {
            Value::String(selector) => self.select(selector.as_str()),
            Value::Object(_) => match target.downcast::<Selection>() {
                Some(selection) if selection.is_document() => Ok(self.host.wrap_document()),
                Some(selection) => self.host.wrap_collection(&selection.nodes()),
                None => Err(SimpliError::InvalidDomObject(
                    "it should be a DOM collection or element".to_string(),
                )),
            },
            _ => Err(SimpliError::InvalidSelector(
                "it should be a string or DOM object".to_string(),
            )),
        }
    }

    pub fn document(&self) -> SharedDocument {
        self.host.document.clone()
    }

    /// Timer loop driving fades; advance it to let time pass
    pub fn timers(&self) -> Rc<TimerManager> {
        self.host.timers.clone()
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.host.registry
    }

    pub fn config(&self) -> &SimpliConfig {
        &self.host.config
    }

    /// Finish loading the document, firing ready listeners
    pub fn finish_loading(&self) -> Result<()> {
        simpli_dom::finish_loading(&self.host.document)?;
        Ok(())
    }
}

impl std::fmt::Debug for Simpli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simpli")
            .field("url", &self.host.document.borrow().url())
            .field("config", &self.host.config)
            .finish()
    }
}
