//! Class tokens: `addClass`, `removeClass`, `toggleClass`, `hasClass`

use std::rc::Rc;

use simpli_dom::ClassList;

use super::{arg, delegate_single, this};
use crate::registry::{ElementRegistry, GENERIC_TAG, Method, Policy};
use crate::selection::Selection;
use crate::types::{Presence, TypeDescriptor, expect_type};
use crate::value::Value;
use crate::{Result, SimpliError};

pub(crate) fn register(registry: &mut ElementRegistry) -> Result<()> {
    registry.register(GENERIC_TAG, "addClass", Policy::Collection, Method::new(add_class), None)?;
    registry.register(GENERIC_TAG, "removeClass", Policy::Collection, Method::new(remove_class), None)?;
    registry.register(GENERIC_TAG, "toggleClass", Policy::Collection, Method::new(toggle_class), None)?;
    registry.register(
        GENERIC_TAG,
        "hasClass",
        Policy::Customize,
        Method::new(has_class),
        Some(delegate_single("hasClass", has_class)),
    )?;
    Ok(())
}

fn class_name(name: &str) -> Result<&str> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(SimpliError::invalid_argument(format!(
            "Invalid class name '{name}', it should be a non-empty string without whitespace"
        )));
    }
    Ok(name)
}

fn class_names(value: &Value) -> Result<Vec<String>> {
    let names_type = TypeDescriptor::union([
        TypeDescriptor::string(),
        TypeDescriptor::array_of(TypeDescriptor::string()),
    ]);
    expect_type(
        value,
        &names_type,
        Presence::Required,
        "Invalid class, it should be a string or array of string",
    )?;
    let names: Vec<&str> = match value {
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        other => other.as_str().into_iter().collect(),
    };
    names
        .into_iter()
        .map(|name| class_name(name).map(str::to_string))
        .collect()
}

fn edit_classes(target: &Selection, method: &str, edit: impl FnOnce(&mut ClassList)) -> Result<()> {
    let node = target.element_node(method)?;
    let shared = target.document();
    let mut doc = shared.borrow_mut();
    let element = doc.tree.element_mut(node)?;
    let mut classes = element.class_list();
    edit(&mut classes);
    element.set_class_list(&classes);
    Ok(())
}

// addClass(name | [name])
fn add_class(target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
    let names = class_names(&arg(args, 0))?;
    edit_classes(target, "addClass", |classes| {
        for name in &names {
            classes.add(name);
        }
    })?;
    Ok(this(target))
}

// removeClass(name | [name])
fn remove_class(target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
    let names = class_names(&arg(args, 0))?;
    edit_classes(target, "removeClass", |classes| {
        for name in &names {
            classes.remove(name);
        }
    })?;
    Ok(this(target))
}

// toggleClass(name)
fn toggle_class(target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
    let name = arg(args, 0);
    expect_type(&name, &TypeDescriptor::string(), Presence::Required, "Invalid class, it should be a string")?;
    let name = class_name(name.as_str().unwrap_or_default())?;
    edit_classes(target, "toggleClass", |classes| {
        classes.toggle(name);
    })?;
    Ok(this(target))
}

// hasClass(name)
fn has_class(target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
    let name = arg(args, 0);
    expect_type(&name, &TypeDescriptor::string(), Presence::Required, "Invalid class, it should be a string")?;
    let name = class_name(name.as_str().unwrap_or_default())?;
    let node = target.element_node("hasClass")?;
    let shared = target.document();
    let doc = shared.borrow();
    let found = doc.tree.element(node)?.class_list().contains(name);
    Ok(Value::from(found))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name_rules() {
        assert!(class_name("note").is_ok());
        assert!(class_name("").is_err());
        assert!(class_name("a b").is_err());
        assert_eq!(
            class_names(&Value::from(vec![Value::from("a"), Value::from("b")])).unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(class_names(&Value::from(3)).is_err());
    }
}
