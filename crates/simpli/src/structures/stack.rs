//! LIFO stack

use std::fmt;

use crate::value::Value;
use crate::{Result, SimpliError};

#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn top(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl Stack<Value> {
    /// Push a dynamic value; `undefined` and `null` are rejected
    pub fn push_value(&mut self, item: Value) -> Result<()> {
        if item.is_nullish() {
            return Err(SimpliError::invalid_argument("Missing element, it should be presented"));
        }
        self.push(item);
        Ok(())
    }

    /// Pop as a dynamic value, `null` when empty
    pub fn pop_value(&mut self) -> Value {
        self.pop().unwrap_or(Value::Null)
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Display for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[object simpli.Stack]")
    }
}
