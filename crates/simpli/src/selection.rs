//! Wrapped selections
//!
//! A selection is an element wrapper (one element, or the document) or a
//! collection wrapper (element wrappers for zero or more elements). Its
//! method table is filled from the registry when it is created and never
//! changes afterwards.

use std::any::Any;
use std::rc::{Rc, Weak};

use simpli_dom::{NodeId, SharedDocument, TimerManager};

use crate::config::SimpliConfig;
use crate::registry::{COLLECTION_TAG, DOCUMENT_TAG, ElementRegistry, MethodTable, TargetKind};
use crate::value::{HostObject, Value};
use crate::{Result, SimpliError};

/// Class name of element wrappers
pub const ELEMENT_CLASS: &str = "simpliElement";
/// Class name of collection wrappers
pub const COLLECTION_CLASS: &str = "simpliCollection";

/// Services shared by every selection of one `Simpli` instance
#[derive(Debug)]
pub(crate) struct Host {
    pub(crate) document: SharedDocument,
    pub(crate) timers: Rc<TimerManager>,
    pub(crate) registry: Rc<ElementRegistry>,
    pub(crate) config: SimpliConfig,
}

impl Host {
    /// Element wrapper for an element node, document wrapper for the root
    pub(crate) fn wrap_node(self: &Rc<Self>, node: NodeId) -> Result<Rc<Selection>> {
        if node == NodeId::ROOT {
            return Ok(self.wrap_document());
        }
        let tag = {
            let doc = self.document.borrow();
            doc.tree
                .element(node)
                .map_err(|_| {
                    SimpliError::InvalidDomObject(
                        "it should be a DOM collection or element".to_string(),
                    )
                })?
                .tag_name()
        };
        let mut methods = MethodTable::new();
        self.registry.install(&tag, TargetKind::Element, &mut methods);
        Ok(Rc::new(Selection {
            host: self.clone(),
            target: Target::Element(node),
            tag,
            methods,
        }))
    }

    pub(crate) fn wrap_document(self: &Rc<Self>) -> Rc<Selection> {
        let mut methods = MethodTable::new();
        self.registry
            .install(DOCUMENT_TAG, TargetKind::Element, &mut methods);
        Rc::new(Selection {
            host: self.clone(),
            target: Target::Document,
            tag: DOCUMENT_TAG.to_string(),
            methods,
        })
    }

    /// Collection wrapper; every node must be an element
    pub(crate) fn wrap_collection(self: &Rc<Self>, nodes: &[NodeId]) -> Result<Rc<Selection>> {
        let members = nodes
            .iter()
            .map(|&node| {
                if node == NodeId::ROOT {
                    return Err(SimpliError::InvalidDomObject(
                        "a collection holds elements only".to_string(),
                    ));
                }
                self.wrap_node(node)
            })
            .collect::<Result<Vec<_>>>()?;
        let mut methods = MethodTable::new();
        self.registry
            .install(COLLECTION_TAG, TargetKind::Collection, &mut methods);
        tracing::trace!(len = members.len(), "collection selected");
        Ok(Rc::new(Selection {
            host: self.clone(),
            target: Target::Collection(members),
            tag: COLLECTION_TAG.to_string(),
            methods,
        }))
    }
}

#[derive(Debug)]
pub(crate) enum Target {
    Document,
    Element(NodeId),
    Collection(Vec<Rc<Selection>>),
}

/// Wrapped selection
pub struct Selection {
    host: Rc<Host>,
    target: Target,
    /// Registry lookup identity
    tag: String,
    methods: MethodTable,
}

impl Selection {
    /// Invoke a bound method
    pub fn call(self: &Rc<Self>, name: &str, args: &[Value]) -> Result<Value> {
        let method = self.methods.get(name).ok_or_else(|| SimpliError::UnknownMethod {
            method: name.to_string(),
            class: self.class_name().to_string(),
        })?;
        method.call(self, args)
    }

    pub fn kind(&self) -> TargetKind {
        match self.target {
            Target::Collection(_) => TargetKind::Collection,
            _ => TargetKind::Element,
        }
    }

    pub fn is_collection(&self) -> bool {
        self.kind() == TargetKind::Collection
    }

    pub fn is_document(&self) -> bool {
        matches!(self.target, Target::Document)
    }

    /// Uppercased tag, `DOCUMENT` or `HTMLCOLLECTION`
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Element count (1 for an element wrapper)
    pub fn len(&self) -> usize {
        match &self.target {
            Target::Collection(members) => members.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element wrapper at `index`
    pub fn get(self: &Rc<Self>, index: usize) -> Option<Rc<Selection>> {
        match &self.target {
            Target::Collection(members) => members.get(index).cloned(),
            _ => (index == 0).then(|| self.clone()),
        }
    }

    /// Element wrappers of a collection (empty for an element wrapper)
    pub fn members(&self) -> &[Rc<Selection>] {
        match &self.target {
            Target::Collection(members) => members,
            _ => &[],
        }
    }

    /// This element wrapper, or the only member of a collection of one
    pub fn single(self: &Rc<Self>) -> Option<Rc<Selection>> {
        match &self.target {
            Target::Collection(members) if members.len() == 1 => members.first().cloned(),
            Target::Collection(_) => None,
            _ => Some(self.clone()),
        }
    }

    /// Wrapped node of an element wrapper (`NodeId::ROOT` for the document)
    pub fn node(&self) -> Option<NodeId> {
        match self.target {
            Target::Document => Some(NodeId::ROOT),
            Target::Element(node) => Some(node),
            Target::Collection(_) => None,
        }
    }

    /// Wrapped nodes in order
    pub fn nodes(&self) -> Vec<NodeId> {
        match &self.target {
            Target::Collection(members) => members.iter().filter_map(|m| m.node()).collect(),
            _ => self.node().into_iter().collect(),
        }
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Bound method names, sorted
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn document(&self) -> SharedDocument {
        self.host.document.clone()
    }

    pub(crate) fn host(&self) -> &Rc<Host> {
        &self.host
    }

    pub(crate) fn weak_host(&self) -> Weak<Host> {
        Rc::downgrade(&self.host)
    }

    /// Element node of an element wrapper, `InvalidDomObject` otherwise
    pub(crate) fn element_node(&self, method: &str) -> Result<NodeId> {
        match self.target {
            Target::Element(node) => Ok(node),
            Target::Document => Err(SimpliError::InvalidDomObject(format!(
                "{method}() needs an element, not the document"
            ))),
            Target::Collection(_) => Err(SimpliError::unsupported_on_collection(method)),
        }
    }
}

impl std::fmt::Debug for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selection")
            .field("tag", &self.tag)
            .field("nodes", &self.nodes())
            .field("methods", &self.methods.len())
            .finish()
    }
}

impl HostObject for Selection {
    fn class_name(&self) -> &str {
        if self.is_collection() { COLLECTION_CLASS } else { ELEMENT_CLASS }
    }

    fn property(&self, name: &str) -> Value {
        if name == "length" {
            return Value::from(self.len());
        }
        match (&self.target, name.parse::<usize>()) {
            (Target::Collection(members), Ok(index)) => members
                .get(index)
                .map_or(Value::Undefined, |m| Value::host(m.clone())),
            _ => Value::Undefined,
        }
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}
