//! Inline style: `css(style, value?)`, `removeCss(style)`
//!
//! Reads return the inline declaration only. There is no cascade, so a
//! property that is not declared inline reads as an empty string.

use std::rc::Rc;

use super::{arg, this, write_all_read_single};
use crate::registry::{ElementRegistry, GENERIC_TAG, Method, Policy};
use crate::selection::Selection;
use crate::types::{Presence, TypeDescriptor, expect_type};
use crate::value::Value;
use crate::Result;

pub(crate) fn register(registry: &mut ElementRegistry) -> Result<()> {
    registry.register(
        GENERIC_TAG,
        "css",
        Policy::Customize,
        Method::new(css),
        Some(write_all_read_single("css", css, is_read)),
    )?;
    registry.register(GENERIC_TAG, "removeCss", Policy::Collection, Method::new(remove_css), None)?;
    Ok(())
}

fn is_read(args: &[Value]) -> bool {
    args.get(1).is_none_or(Value::is_nullish)
}

/// One style name or an array of them
fn style_names(style: &Value) -> Result<Vec<String>> {
    let style_type = TypeDescriptor::union([
        TypeDescriptor::string(),
        TypeDescriptor::array_of(TypeDescriptor::string()),
    ]);
    expect_type(
        style,
        &style_type,
        Presence::Required,
        "Invalid style, it should be a string or array of string",
    )?;
    Ok(match style {
        Value::Array(items) => items.iter().filter_map(Value::as_str).map(str::to_string).collect(),
        other => other.as_str().map(str::to_string).into_iter().collect(),
    })
}

/// Set inline declarations on one element
pub(crate) fn set_styles(target: &Selection, declarations: &[(&str, &str)]) -> Result<()> {
    let node = target.element_node("css")?;
    let shared = target.document();
    let mut doc = shared.borrow_mut();
    let element = doc.tree.element_mut(node)?;
    let mut style = element.style();
    for (name, value) in declarations {
        style.set_property(name, value);
    }
    element.set_style(&style);
    Ok(())
}

/// Inline declared value, "" when absent
pub(crate) fn inline_style(target: &Selection, name: &str) -> Result<String> {
    let node = target.element_node("css")?;
    let shared = target.document();
    let doc = shared.borrow();
    let style = doc.tree.element(node)?.style();
    Ok(style.get_property_value(name).unwrap_or_default().to_string())
}

// css(style | [style], value?)
fn css(target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
    let style = arg(args, 0);
    let names = style_names(&style)?;
    let value = arg(args, 1);
    let value_type = TypeDescriptor::union([TypeDescriptor::string(), TypeDescriptor::number()]);
    expect_type(
        &value,
        &value_type,
        Presence::Optional,
        "Invalid value, it should be a string or number",
    )?;

    if value.is_nullish() {
        return match style {
            Value::Array(_) => names
                .iter()
                .map(|name| inline_style(target, name).map(Value::from))
                .collect::<Result<Vec<_>>>()
                .map(Value::from),
            _ => names
                .first()
                .map_or(Ok(Value::from("")), |name| inline_style(target, name).map(Value::from)),
        };
    }

    let value = value.to_display_string();
    let declarations: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), value.as_str())).collect();
    set_styles(target, &declarations)?;
    Ok(this(target))
}

// removeCss(style | [style])
fn remove_css(target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
    let names = style_names(&arg(args, 0))?;
    let node = target.element_node("removeCss")?;
    {
        let shared = target.document();
        let mut doc = shared.borrow_mut();
        let element = doc.tree.element_mut(node)?;
        let mut style = element.style();
        for name in &names {
            style.remove_property(name);
        }
        element.set_style(&style);
    }
    Ok(this(target))
}
