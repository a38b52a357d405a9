//! Tree navigation and iteration: `parent`, `children`, `eq`, `forEach`

use std::rc::Rc;

use simpli_dom::{DomError, NodeId};

use super::{arg, delegate_single, this};
use crate::registry::{DOCUMENT_TAG, ElementRegistry, GENERIC_TAG, Method, Policy};
use crate::selection::Selection;
use crate::types::{Presence, TypeDescriptor, expect_type};
use crate::value::Value;
use crate::{Result, SimpliError};

pub(crate) fn register(registry: &mut ElementRegistry) -> Result<()> {
    registry.extend(
        &[GENERIC_TAG, DOCUMENT_TAG],
        "parent",
        Policy::Customize,
        Method::new(parent),
        Some(delegate_single("parent", parent)),
    )?;
    registry.register(
        GENERIC_TAG,
        "children",
        Policy::Customize,
        Method::new(children),
        Some(delegate_single("children", children)),
    )?;
    registry.register(
        GENERIC_TAG,
        "eq",
        Policy::Customize,
        Method::new(|_, _| {
            Err(SimpliError::UnsupportedOnElement {
                method: "eq".to_string(),
            })
        }),
        Some(Method::new(eq)),
    )?;
    registry.register(
        GENERIC_TAG,
        "forEach",
        Policy::Customize,
        Method::new(for_each_element),
        Some(Method::new(for_each_collection)),
    )?;
    Ok(())
}

// parent()
fn parent(target: &Rc<Selection>, _args: &[Value]) -> Result<Value> {
    let node = target.node().unwrap_or(NodeId::ROOT);
    if node == NodeId::ROOT {
        return Ok(Value::Undefined);
    }
    let parent = target.document().borrow().tree.parent(node);
    match parent {
        Some(parent) => Ok(Value::host(target.host().wrap_node(parent)?)),
        None => Ok(Value::Undefined),
    }
}

// children(selector?)
fn children(target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
    let selector = arg(args, 0);
    expect_type(
        &selector,
        &TypeDescriptor::string(),
        Presence::Optional,
        "Invalid selector, it should be a string",
    )?;
    let node = target.element_node("children")?;
    let nodes = {
        let shared = target.document();
        let doc = shared.borrow();
        let mut nodes = doc.tree.element_children(node);
        if let Some(selector) = selector.as_str() {
            let mut kept = Vec::with_capacity(nodes.len());
            for child in nodes {
                if doc.tree.matches(child, selector).map_err(selector_error)? {
                    kept.push(child);
                }
            }
            nodes = kept;
        }
        nodes
    };
    Ok(Value::host(target.host().wrap_collection(&nodes)?))
}

fn selector_error(err: DomError) -> SimpliError {
    match err {
        DomError::InvalidSelector(_) => {
            SimpliError::InvalidSelector("it should be a valid CSS selector".to_string())
        }
        other => SimpliError::Dom(other),
    }
}

// eq(index)
fn eq(target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
    let index = arg(args, 0);
    expect_type(
        &index,
        &TypeDescriptor::integer(),
        Presence::Required,
        "Invalid index, it should be an integer",
    )?;
    let index = index.as_f64().unwrap_or(-1.0);
    if index < 0.0 {
        return Ok(Value::Undefined);
    }
    Ok(target
        .get(index as usize)
        .map_or(Value::Undefined, Value::host))
}

fn for_each_args(args: &[Value]) -> Result<(crate::value::Function, Value)> {
    let callback = arg(args, 0);
    expect_type(
        &callback,
        &TypeDescriptor::function(),
        Presence::Required,
        "Invalid callback, it should be a function",
    )?;
    let this_arg = arg(args, 1);
    expect_type(
        &this_arg,
        &TypeDescriptor::object(),
        Presence::Optional,
        "Invalid this context, it should be an object",
    )?;
    let callback = callback
        .as_function()
        .cloned()
        .ok_or_else(|| SimpliError::invalid_argument("Invalid callback, it should be a function"))?;
    Ok((callback, this_arg))
}

// forEach(callback, thisArg?) on one element
fn for_each_element(target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
    let (callback, this_arg) = for_each_args(args)?;
    let element = this(target);
    let receiver = if this_arg.is_nullish() { element.clone() } else { this_arg };
    callback.call(&receiver, &[element.clone(), Value::from(0), element.clone()])?;
    Ok(element)
}

// forEach(callback, thisArg?) on a collection
fn for_each_collection(target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
    let (callback, this_arg) = for_each_args(args)?;
    let collection = this(target);
    for (index, member) in target.members().iter().enumerate() {
        let element = Value::host(member.clone());
        let receiver = if this_arg.is_nullish() { element.clone() } else { this_arg.clone() };
        callback.call(&receiver, &[element, Value::from(index), collection.clone()])?;
    }
    Ok(collection)
}
