//! `show(display?)` and `hide()`

use std::rc::Rc;

use super::{arg, this};
use super::style::set_styles;
use crate::registry::{ElementRegistry, GENERIC_TAG, Method, Policy};
use crate::selection::Selection;
use crate::types::{Presence, TypeDescriptor, expect_type};
use crate::value::Value;
use crate::{Result, SimpliError};

/// Display keywords `show` accepts
pub const DISPLAY_VALUES: &[&str] = &[
    "inline",
    "block",
    "flex",
    "inline-block",
    "inline-flex",
    "inline-table",
    "list-item",
    "run-in",
    "table",
    "table-caption",
    "table-column-group",
    "table-header-group",
    "table-footer-group",
    "table-row-group",
    "table-cell",
    "table-column",
    "table-row",
    "initial",
    "inherit",
];

pub(crate) fn register(registry: &mut ElementRegistry) -> Result<()> {
    registry.register(GENERIC_TAG, "show", Policy::Collection, Method::new(show), None)?;
    registry.register(GENERIC_TAG, "hide", Policy::Collection, Method::new(hide), None)?;
    Ok(())
}

// show(display?)
fn show(target: &Rc<Selection>, args: &[Value]) -> Result<Value> {
    let display = arg(args, 0);
    expect_type(
        &display,
        &TypeDescriptor::string(),
        Presence::Optional,
        "Invalid value, it should be a string",
    )?;
    let display = match display.as_str() {
        None => target.host().config.default_display.clone(),
        Some("none") => {
            return Err(SimpliError::invalid_argument(
                "simpli(..).show(\"none\") is not supported. Please use simpli(..).hide() instead",
            ));
        }
        Some(value) if DISPLAY_VALUES.contains(&value) => value.to_string(),
        Some(_) => {
            return Err(SimpliError::invalid_argument(
                "Unrecognized display value. It should be one of the standard values",
            ));
        }
    };
    set_styles(target, &[("display", display.as_str())])?;
    Ok(this(target))
}

// hide()
fn hide(target: &Rc<Selection>, _args: &[Value]) -> Result<Value> {
    set_styles(target, &[("display", "none")])?;
    Ok(this(target))
}
