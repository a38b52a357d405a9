//! `prop(name, value?)`: reflected properties with an attribute fallback

use std::rc::Rc;

use simpli_dom::{Document, NodeId};

use super::{arg, this, write_all_read_single};
use crate::registry::{DOCUMENT_TAG, ElementRegistry, GENERIC_TAG, Method, Policy};
use crate::selection::Selection;
use crate::types::{Presence, TypeDescriptor, expect_type};
use crate::value::Value;
use crate::{Result, SimpliError};

pub(crate) fn register(registry: &mut ElementRegistry) -> Result<()> {
    registry.extend(
        &[GENERIC_TAG, DOCUMENT_TAG],
        "prop",
        Policy::Customize,
        Method::new(prop),
        Some(write_all_read_single("prop", prop, is_read)),
    )
}

fn is_read(args: &[Value]) -> bool {
    args.get(1).is_none_or(Value::is_nullish)
}

/// Attribute spelling -> property spelling
fn attr_to_prop(name: &str) -> &str {
    match name {
        "for" => "htmlFor",
        "class" => "className",
        other => other,
    }
}

/// Element properties backed by the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reflected {
    Attribute(&'static str),
    TextContent,
    InnerHtml,
    /// Read-only
    TagName,
}

fn reflected(prop: &str) -> Option<Reflected> {
    Some(match prop {
        "id" => Reflected::Attribute("id"),
        "className" => Reflected::Attribute("class"),
        "htmlFor" => Reflected::Attribute("for"),
        "title" => Reflected::Attribute("title"),
        "value" => Reflected::Attribute("value"),
        "name" => Reflected::Attribute("name"),
        "type" => Reflected::Attribute("type"),
        "href" => Reflected::Attribute("href"),
        "src" => Reflected::Attribute("src"),
        "alt" => Reflected::Attribute("alt"),
        "placeholder" => Reflected::Attribute("placeholder"),
        "textContent" => Reflected::TextContent,
        "innerHTML" => Reflected::InnerHtml,
        "tagName" | "nodeName" => Reflected::TagName,
        _ => return None,
    })
}

fn prop(target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
    let name = arg(args, 0);
    expect_type(
        &name,
        &TypeDescriptor::string(),
        Presence::Required,
        "Invalid property, it should be a string",
    )?;
    let value = arg(args, 1);
    let value_type = TypeDescriptor::union([TypeDescriptor::string(), TypeDescriptor::number()]);
    expect_type(
        &value,
        &value_type,
        Presence::Optional,
        "Invalid value, it should be a string or number",
    )?;

    let name = name.as_str().unwrap_or_default();
    let node = target.node().unwrap_or(NodeId::ROOT);
    let shared = target.document();
    if value.is_nullish() {
        let doc = shared.borrow();
        return if node == NodeId::ROOT {
            Ok(document_prop(&doc, name))
        } else {
            element_prop(&doc, node, name)
        };
    }

    let mut doc = shared.borrow_mut();
    let value = value.to_display_string();
    if node == NodeId::ROOT {
        set_document_prop(&mut doc, name, &value)?;
    } else {
        set_element_prop(&mut doc, node, name, &value)?;
    }
    Ok(this(target))
}

fn document_prop(doc: &Document, name: &str) -> Value {
    match name {
        "title" => Value::from(doc.title()),
        "URL" => Value::from(doc.url()),
        "readyState" => Value::from(doc.ready_state().as_str()),
        _ => Value::Undefined,
    }
}

fn set_document_prop(doc: &mut Document, name: &str, value: &str) -> Result<()> {
    match name {
        "title" => Ok(doc.set_title(value)?),
        "URL" | "readyState" => Ok(()),
        _ => Err(SimpliError::invalid_argument(format!(
            "Invalid property, '{name}' cannot be set on the document"
        ))),
    }
}

fn element_prop(doc: &Document, node: NodeId, name: &str) -> Result<Value> {
    let element = doc.tree.element(node)?;
    let value = match reflected(attr_to_prop(name)) {
        Some(Reflected::Attribute("value")) if element.tag == "select" => doc
            .selected_option(node)
            .map_or_else(String::new, |option| doc.option_value(option)),
        Some(Reflected::Attribute(attr)) => element.get_attr(attr).unwrap_or_default().to_string(),
        Some(Reflected::TextContent) => doc.tree.text_content(node),
        Some(Reflected::InnerHtml) => doc.tree.inner_html(node),
        Some(Reflected::TagName) => element.tag_name(),
        None => {
            return Ok(match element.get_attr(name) {
                Some(value) if !value.is_empty() => Value::from(value),
                _ => Value::Undefined,
            });
        }
    };
    Ok(Value::from(value))
}

fn set_element_prop(doc: &mut Document, node: NodeId, name: &str, value: &str) -> Result<()> {
    match reflected(attr_to_prop(name)) {
        Some(Reflected::Attribute(attr)) => doc.tree.element_mut(node)?.set_attr(attr, value),
        Some(Reflected::TextContent) => doc.tree.set_text_content(node, value)?,
        Some(Reflected::InnerHtml) => super::content::replace_html(doc, node, value)?,
        Some(Reflected::TagName) => {}
        None => doc.tree.element_mut(node)?.set_attr(name, value),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_to_prop() {
        assert_eq!(attr_to_prop("for"), "htmlFor");
        assert_eq!(attr_to_prop("class"), "className");
        assert_eq!(attr_to_prop("data-x"), "data-x");
    }

    #[test]
    fn test_reflection_table() {
        assert_eq!(reflected("className"), Some(Reflected::Attribute("class")));
        assert_eq!(reflected("nodeName"), Some(Reflected::TagName));
        assert_eq!(reflected("data-id"), None);
    }
}
