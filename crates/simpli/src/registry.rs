//! Element Method Registry
//!
//! Per-tag tables of methods. Each registration carries a dispatch policy
//! that decides what the collection side of the method does:
//!
//! * `Policy::Element` - element only, collections get an error
//! * `Policy::Collection` - collections broadcast to every element
//! * `Policy::Customize` - caller supplies both sides
//!
//! `install` copies the generic fallback bindings and then the tag's own
//! bindings onto a selection's method table; the last write wins.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::selection::Selection;
use crate::types::{Presence, TypeDescriptor, expect_type, is_type};
use crate::value::Value;
use crate::{Result, SimpliError};

/// Generic fallback merged into every element install
pub const GENERIC_TAG: &str = "HTMLELEMENT";
/// Identity of every collection wrapper
pub const COLLECTION_TAG: &str = "HTMLCOLLECTION";
/// Identity of the document wrapper
pub const DOCUMENT_TAG: &str = "DOCUMENT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Element,
    Collection,
    Customize,
}

/// Which side of a binding a selection receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Element,
    Collection,
}

type MethodFn = dyn Fn(&Rc<Selection>, &[Value]) -> Result<Value>;

/// A bound method implementation
#[derive(Clone)]
pub struct Method(Rc<MethodFn>);

impl Method {
    pub fn new(f: impl Fn(&Rc<Selection>, &[Value]) -> Result<Value> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Adapt a dynamic function; it receives the selection as `this`
    pub fn from_function(function: crate::value::Function) -> Self {
        Self::new(move |target, args| function.call(&Value::host(target.clone()), args))
    }

    pub fn call(&self, target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
        (self.0)(target, args)
    }

    pub fn ptr_eq(&self, other: &Method) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Method")
    }
}

/// Normalised registration
#[derive(Debug, Clone)]
pub enum Strategy {
    ElementOnly(Method),
    Broadcast(Method),
    Custom { element: Method, collection: Method },
}

impl Strategy {
    pub fn new(policy: Policy, element: Method, collection: Option<Method>) -> Result<Self> {
        match (policy, collection) {
            (Policy::Element, None) => Ok(Strategy::ElementOnly(element)),
            (Policy::Collection, None) => Ok(Strategy::Broadcast(element)),
            (Policy::Customize, Some(collection)) => Ok(Strategy::Custom { element, collection }),
            (Policy::Customize, None) => Err(SimpliError::invalid_argument(
                "Invalid collection function, it should be a function",
            )),
            (_, Some(_)) => Err(SimpliError::invalid_argument(
                "Invalid collection function, it is only accepted by CUSTOMIZE policy",
            )),
        }
    }

    pub fn policy(&self) -> Policy {
        match self {
            Strategy::ElementOnly(_) => Policy::Element,
            Strategy::Broadcast(_) => Policy::Collection,
            Strategy::Custom { .. } => Policy::Customize,
        }
    }

    fn element_side(&self) -> Method {
        match self {
            Strategy::ElementOnly(m) | Strategy::Broadcast(m) => m.clone(),
            Strategy::Custom { element, .. } => element.clone(),
        }
    }

    fn collection_side(&self, name: &str) -> Method {
        match self {
            Strategy::ElementOnly(_) => {
                let name = name.to_string();
                Method::new(move |_, _| Err(SimpliError::unsupported_on_collection(&name)))
            }
            Strategy::Broadcast(element) => {
                let element = element.clone();
                Method::new(move |target, args| {
                    for member in target.members() {
                        element.call(member, args)?;
                    }
                    Ok(Value::host(target.clone()))
                })
            }
            Strategy::Custom { collection, .. } => collection.clone(),
        }
    }

    fn side(&self, name: &str, kind: TargetKind) -> Method {
        match kind {
            TargetKind::Element => self.element_side(),
            TargetKind::Collection => self.collection_side(name),
        }
    }
}

#[derive(Debug, Clone)]
struct Binding {
    name: String,
    strategy: Strategy,
}

/// Method table of one selection
pub type MethodTable = HashMap<String, Method>;

/// Tag -> bindings, in registration order
#[derive(Debug, Default)]
pub struct ElementRegistry {
    tags: HashMap<String, Vec<Binding>>,
}

impl ElementRegistry {
    /// Registry with no bindings at all
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in method families
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        crate::methods::register_builtins(&mut registry)?;
        tracing::debug!(
            tags = registry.tags.len(),
            bindings = registry.tags.values().map(Vec::len).sum::<usize>(),
            "element registry ready"
        );
        Ok(registry)
    }

    /// Register one method for one tag
    pub fn register(
        &mut self,
        tag: &str,
        name: &str,
        policy: Policy,
        element: Method,
        collection: Option<Method>,
    ) -> Result<()> {
        if tag.is_empty() {
            return Err(SimpliError::invalid_argument("Invalid element, it should be a non-empty string"));
        }
        if name.is_empty() {
            return Err(SimpliError::invalid_argument("Invalid name, it should be a non-empty string"));
        }
        let strategy = Strategy::new(policy, element, collection)?;
        self.tags
            .entry(tag.to_ascii_uppercase())
            .or_default()
            .push(Binding {
                name: name.to_string(),
                strategy,
            });
        Ok(())
    }

    /// Register the same method for several tags
    pub fn extend(
        &mut self,
        tags: &[&str],
        name: &str,
        policy: Policy,
        element: Method,
        collection: Option<Method>,
    ) -> Result<()> {
        for tag in tags {
            self.register(tag, name, policy, element.clone(), collection.clone())?;
        }
        Ok(())
    }

    /// Register from dynamic values: `tags` is a string or array of strings,
    /// the implementations are functions receiving the selection as `this`
    pub fn register_value(
        &mut self,
        tags: &Value,
        name: &Value,
        policy: Policy,
        element: &Value,
        collection: &Value,
    ) -> Result<()> {
        let tag_type = TypeDescriptor::union([
            TypeDescriptor::string(),
            TypeDescriptor::array_of(TypeDescriptor::string()),
        ]);
        expect_type(tags, &tag_type, Presence::Required, "Invalid element, it should be a string or array of string")?;
        expect_type(name, &TypeDescriptor::string(), Presence::Required, "Invalid name, it should be a string")?;
        expect_type(element, &TypeDescriptor::function(), Presence::Required, "Invalid function, it should be a function")?;
        if !is_type(collection, &TypeDescriptor::function(), Presence::Optional)? {
            return Err(SimpliError::invalid_argument(
                "Invalid collection function, it should be a function",
            ));
        }

        let name = name.as_str().unwrap_or_default();
        let element = element.as_function().cloned().map(Method::from_function);
        let collection = collection.as_function().cloned().map(Method::from_function);
        let Some(element) = element else {
            return Err(SimpliError::invalid_argument("Invalid function, it should be a function"));
        };
        let tag_names: Vec<&str> = match tags {
            Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
            other => other.as_str().into_iter().collect(),
        };
        self.extend(&tag_names, name, policy, element, collection)
    }

    /// Install bindings for `tag` onto `table`
    ///
    /// Generic bindings go first (except for the document), then the
    /// tag's own. Unknown tags leave only the generic bindings.
    ///
    /// `COLLECTION_TAG` bindings target the collection object itself, so a
    /// collection receives their element side: an ELEMENT method registered
    /// there is called once with the whole collection.
    pub fn install(&self, tag: &str, kind: TargetKind, table: &mut MethodTable) {
        let tag = tag.to_ascii_uppercase();
        if tag != DOCUMENT_TAG && tag != GENERIC_TAG {
            self.install_tag(GENERIC_TAG, kind, table);
        }
        let own_kind = if tag == COLLECTION_TAG { TargetKind::Element } else { kind };
        self.install_tag(&tag, own_kind, table);
        tracing::trace!(tag = %tag, ?kind, methods = table.len(), "installed");
    }

    fn install_tag(&self, tag: &str, kind: TargetKind, table: &mut MethodTable) {
        let Some(bindings) = self.tags.get(tag) else {
            return;
        };
        for binding in bindings {
            table.insert(binding.name.clone(), binding.strategy.side(&binding.name, kind));
        }
    }

    /// Whether `tag` itself registers `name` (ignores the generic fallback)
    pub fn has_binding(&self, tag: &str, name: &str) -> bool {
        self.tags
            .get(&tag.to_ascii_uppercase())
            .is_some_and(|bindings| bindings.iter().any(|b| b.name == name))
    }

    /// Policy of the last registration of `name` under `tag`
    pub fn policy_of(&self, tag: &str, name: &str) -> Option<Policy> {
        self.tags
            .get(&tag.to_ascii_uppercase())?
            .iter()
            .rev()
            .find(|b| b.name == name)
            .map(|b| b.strategy.policy())
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.tags.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}
