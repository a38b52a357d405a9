//! Fade effects
//!
//! A fade runs as an interval on the host [`TimerManager`]: `steps` ticks,
//! `timeout / steps` ms apart. Intermediate ticks scale the opacity
//! geometrically; the last tick applies the final opacity, clears the
//! interval and runs the `after` callback, so a fade lasts `timeout` ms.
//!
//! [`TimerManager`]: simpli_dom::TimerManager

use std::rc::{Rc, Weak};

use simpli_dom::{NodeId, SharedDocument, TimerId};

use crate::methods::{arg, this};
use crate::methods::style::set_styles;
use crate::registry::{ElementRegistry, GENERIC_TAG, Method, Policy};
use crate::selection::{Host, Selection};
use crate::types::{Presence, TypeDescriptor, expect_type};
use crate::value::{Function, Value, format_number};
use crate::Result;

pub(crate) fn register(registry: &mut ElementRegistry) -> Result<()> {
    registry.register(
        GENERIC_TAG,
        "fadeIn",
        Policy::Collection,
        Method::new(|target, args| fade(target, args, Direction::In)),
        None,
    )?;
    registry.register(
        GENERIC_TAG,
        "fadeOut",
        Policy::Collection,
        Method::new(|target, args| fade(target, args, Direction::Out)),
        None,
    )?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    In,
    Out,
}

impl Direction {
    /// Opacity applied before the first tick
    fn initial(self) -> f64 {
        match self {
            Direction::In => 0.0,
            Direction::Out => 1.0,
        }
    }

    /// Opacity of the first tick
    fn first_tick(self) -> f64 {
        match self {
            Direction::In => 0.1,
            Direction::Out => 1.0,
        }
    }

    fn factor(self) -> f64 {
        match self {
            Direction::In => 1.1,
            Direction::Out => 0.9,
        }
    }

    fn last(self) -> f64 {
        match self {
            Direction::In => 1.0,
            Direction::Out => 0.0,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Direction::In => "fadeIn",
            Direction::Out => "fadeOut",
        }
    }
}

fn optional_callback(value: &Value, message: &str) -> Result<Option<Function>> {
    expect_type(value, &TypeDescriptor::function(), Presence::Optional, message)?;
    Ok(value.as_function().cloned())
}

// fadeIn(timeout?, before?, after?) / fadeOut(timeout?, before?, after?)
fn fade(target: &Rc<Selection>, args: &[Value], direction: Direction) -> Result<Value> {
    let timeout = arg(args, 0);
    expect_type(
        &timeout,
        &TypeDescriptor::integer(),
        Presence::Optional,
        "Invalid timeout, it should be an integer",
    )?;
    let before = optional_callback(&arg(args, 1), "Invalid before callback, it should be a function")?;
    let after = optional_callback(&arg(args, 2), "Invalid after callback, it should be a function")?;

    let node = target.element_node(direction.name())?;
    let host = target.host();
    let steps = host.config.fade.steps.max(1);
    let timeout = timeout
        .as_f64()
        .map_or(host.config.fade.duration_ms, |ms| ms.max(0.0) as u64);

    set_styles(
        target,
        &[
            ("transition", "opacity 0s"),
            ("-webkit-transition", "opacity 0s"),
            ("-moz-transition", "opacity 0s"),
        ],
    )?;
    set_opacity(&host.document, node, direction.initial())?;
    if let Some(before) = before {
        before.call(&this(target), &[])?;
    }

    let weak = target.weak_host();
    let mut tick = 0u32;
    let mut opacity = direction.first_tick();
    let interval = timeout / u64::from(steps);
    host.timers.set_interval(
        interval,
        Box::new(move |id| {
            tick += 1;
            let finished = tick >= steps;
            let value = if finished { direction.last() } else { opacity };
            run_tick(&weak, id, node, value, finished, after.as_ref(), direction);
            opacity = (opacity * direction.factor()).min(1.0);
        }),
    );
    tracing::debug!(?node, timeout, steps, effect = direction.name(), "fade started");
    Ok(this(target))
}

fn run_tick(
    host: &Weak<Host>,
    id: TimerId,
    node: NodeId,
    opacity: f64,
    finished: bool,
    after: Option<&Function>,
    direction: Direction,
) {
    let Some(host) = host.upgrade() else {
        return;
    };
    if let Err(err) = set_opacity(&host.document, node, opacity) {
        tracing::warn!(?node, error = %err, "fade tick failed");
        host.timers.clear(id);
        return;
    }
    if !finished {
        return;
    }
    host.timers.clear(id);
    tracing::debug!(?node, effect = direction.name(), "fade finished");
    let Some(after) = after else {
        return;
    };
    let result = host
        .wrap_node(node)
        .and_then(|element| after.call(&Value::host(element), &[]));
    if let Err(err) = result {
        tracing::warn!(?node, error = %err, "fade callback failed");
    }
}

/// Write `opacity` and the legacy alpha filter, rounded to 3 decimals
fn set_opacity(document: &SharedDocument, node: NodeId, opacity: f64) -> Result<()> {
    let opacity = (opacity * 1000.0).round() / 1000.0;
    let mut doc = document.borrow_mut();
    let element = doc.tree.element_mut(node)?;
    let mut style = element.style();
    style.set_property("opacity", &format_number(opacity));
    style.set_property(
        "filter",
        &format!("alpha(opacity={})", format_number((opacity * 100.0).round())),
    );
    element.set_style(&style);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_curves() {
        assert_eq!(Direction::In.initial(), 0.0);
        assert_eq!(Direction::In.last(), 1.0);
        assert_eq!(Direction::Out.initial(), 1.0);
        assert_eq!(Direction::Out.last(), 0.0);
        assert!(Direction::In.factor() > 1.0);
        assert!(Direction::Out.factor() < 1.0);
    }
}
