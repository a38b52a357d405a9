//! Select elements: `getSelectedValue()`, `getSelectedOption()`

use std::rc::Rc;

use crate::registry::{ElementRegistry, Method, Policy};
use crate::selection::Selection;
use crate::value::Value;
use crate::Result;

pub(crate) fn register(registry: &mut ElementRegistry) -> Result<()> {
    registry.register("SELECT", "getSelectedValue", Policy::Element, Method::new(selected_value), None)?;
    registry.register("SELECT", "getSelectedOption", Policy::Element, Method::new(selected_option), None)?;
    Ok(())
}

// getSelectedValue()
fn selected_value(target: &Rc<Selection>, _args: &[Value]) -> Result<Value> {
    let select = target.element_node("getSelectedValue")?;
    let shared = target.document();
    let doc = shared.borrow();
    Ok(doc
        .selected_option(select)
        .map_or(Value::Undefined, |option| Value::from(doc.option_value(option))))
}

// getSelectedOption()
fn selected_option(target: &Rc<Selection>, _args: &[Value]) -> Result<Value> {
    let select = target.element_node("getSelectedOption")?;
    let shared = target.document();
    let doc = shared.borrow();
    Ok(doc
        .selected_option(select)
        .map_or(Value::Undefined, |option| Value::from(doc.option_text(option))))
}
