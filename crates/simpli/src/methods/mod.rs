//! Built-in method families
//!
//! Each family registers its bindings on an [`ElementRegistry`]; the
//! registry built by [`ElementRegistry::with_builtins`] holds all of them.

pub mod class;
pub mod content;
pub mod events;
pub mod form;
pub mod navigation;
pub mod property;
pub mod style;
pub mod visibility;

use std::rc::Rc;

use crate::registry::{ElementRegistry, Method};
use crate::selection::Selection;
use crate::value::Value;
use crate::{Result, SimpliError};

type ElementFn = fn(&Rc<Selection>, &[Value]) -> Result<Value>;

/// Register every built-in family
pub fn register_builtins(registry: &mut ElementRegistry) -> Result<()> {
    navigation::register(registry)?;
    events::register(registry)?;
    property::register(registry)?;
    style::register(registry)?;
    class::register(registry)?;
    content::register(registry)?;
    visibility::register(registry)?;
    crate::effects::register(registry)?;
    form::register(registry)?;
    Ok(())
}

/// Argument `index`, `Undefined` when absent
pub(crate) fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

/// The selection as a dynamic value, returned by chaining methods
pub(crate) fn this(target: &Rc<Selection>) -> Value {
    Value::host(target.clone())
}

/// Collection side that forwards to the only member and fails otherwise
pub(crate) fn delegate_single(method: &'static str, element: ElementFn) -> Method {
    Method::new(move |target, args| match target.single() {
        Some(member) => element(&member, args),
        None => Err(SimpliError::unsupported_on_collection(method)),
    })
}

/// Collection side that broadcasts writes and delegates reads
///
/// `is_read` decides from the arguments whether the call is a read.
pub(crate) fn write_all_read_single(
    method: &'static str,
    element: ElementFn,
    is_read: fn(&[Value]) -> bool,
) -> Method {
    Method::new(move |target, args| {
        if is_read(args) {
            return match target.single() {
                Some(member) => element(&member, args),
                None => Err(SimpliError::unsupported_on_collection(method)),
            };
        }
        for member in target.members() {
            element(member, args)?;
        }
        tracing::trace!(method, len = target.len(), "broadcast");
        Ok(this(target))
    })
}
