//! Shared helpers for the simpli integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use simpli::{Simpli, Value};

static TRACING: Once = Once::new();

/// Route library logs to the test writer; filter with `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Simpli over a parsed page with `body` as body content
pub fn page(body: &str) -> Simpli {
    init_tracing();
    let html = format!("<!DOCTYPE html><html><head><title>Test</title></head><body>{body}</body></html>");
    Simpli::from_html(&html).unwrap()
}

pub fn s(text: &str) -> Value {
    Value::from(text)
}

/// Shared log plus a function value that appends its first argument's
/// display string to it
pub fn recorder() -> (Rc<RefCell<Vec<String>>>, Value) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let function = Value::function(move |_, args| {
        let entry = args.first().map(Value::to_display_string).unwrap_or_default();
        sink.borrow_mut().push(entry);
        Ok(Value::Undefined)
    });
    (log, function)
}
