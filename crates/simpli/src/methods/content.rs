//! Element content: `text(value?)`, `html(markup?)`

use std::rc::Rc;

use simpli_dom::{Document, NodeId};
use simpli_html::HtmlParser;

use super::{arg, this, write_all_read_single};
use crate::registry::{ElementRegistry, GENERIC_TAG, Method, Policy};
use crate::selection::Selection;
use crate::types::{Presence, TypeDescriptor, expect_type};
use crate::value::Value;
use crate::Result;

pub(crate) fn register(registry: &mut ElementRegistry) -> Result<()> {
    registry.register(
        GENERIC_TAG,
        "text",
        Policy::Customize,
        Method::new(text),
        Some(write_all_read_single("text", text, no_argument)),
    )?;
    registry.register(
        GENERIC_TAG,
        "html",
        Policy::Customize,
        Method::new(html),
        Some(write_all_read_single("html", html, no_argument)),
    )?;
    Ok(())
}

fn no_argument(args: &[Value]) -> bool {
    args.first().is_none_or(Value::is_nullish)
}

fn content_arg(args: &[Value], message: &str) -> Result<Option<String>> {
    let value = arg(args, 0);
    let content_type = TypeDescriptor::union([TypeDescriptor::string(), TypeDescriptor::number()]);
    expect_type(&value, &content_type, Presence::Optional, message)?;
    Ok((!value.is_nullish()).then(|| value.to_display_string()))
}

// text(value?)
fn text(target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
    let content = content_arg(args, "Invalid text, it should be a string or number")?;
    let node = target.element_node("text")?;
    let shared = target.document();
    match content {
        None => {
            let text = shared.borrow().tree.text_content(node);
            Ok(Value::from(text))
        }
        Some(content) => {
            shared.borrow_mut().tree.set_text_content(node, &content)?;
            Ok(this(target))
        }
    }
}

// html(markup?)
fn html(target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
    let markup = content_arg(args, "Invalid markup, it should be a string or number")?;
    let node = target.element_node("html")?;
    let shared = target.document();
    match markup {
        None => {
            let markup = shared.borrow().tree.inner_html(node);
            Ok(Value::from(markup))
        }
        Some(markup) => {
            replace_html(&mut shared.borrow_mut(), node, &markup)?;
            Ok(this(target))
        }
    }
}

/// Replace the children of `node` with parsed `markup`
pub(crate) fn replace_html(doc: &mut Document, node: NodeId, markup: &str) -> Result<()> {
    doc.tree.remove_children(node)?;
    let added = HtmlParser::new()
        .keep_whitespace(true)
        .parse_fragment_into(&mut doc.tree, node, markup)?;
    tracing::trace!(?node, nodes = added.len(), "inner html replaced");
    Ok(())
}
