//! FIFO queue

use std::collections::VecDeque;
use std::fmt;

use crate::value::Value;
use crate::{Result, SimpliError};

#[derive(Debug, Clone)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Remove the front item; `None` when empty
    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl Queue<Value> {
    /// Enqueue a dynamic value; `undefined` and `null` are rejected
    pub fn enqueue_value(&mut self, item: Value) -> Result<()> {
        if item.is_nullish() {
            return Err(SimpliError::invalid_argument("Missing element, it should be presented"));
        }
        self.enqueue(item);
        Ok(())
    }

    /// Dequeue as a dynamic value, `null` when empty
    pub fn dequeue_value(&mut self) -> Value {
        self.dequeue().unwrap_or(Value::Null)
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Display for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[object simpli.Queue]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = Queue::new();
        assert!(queue.is_empty());
        queue.enqueue(1);
        queue.enqueue(2);
        assert_eq!(queue.front(), Some(&1));
        assert_eq!(queue.dequeue(), Some(1));
        assert_eq!(queue.dequeue(), Some(2));
        assert_eq!(queue.dequeue(), None);
        assert_eq!(queue.to_string(), "[object simpli.Queue]");
    }

    #[test]
    fn test_dynamic_values() {
        let mut queue = Queue::new();
        assert!(queue.enqueue_value(Value::Undefined).is_err());
        assert!(queue.enqueue_value(Value::Null).is_err());
        queue.enqueue_value(Value::from("a")).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.dequeue_value(), Value::from("a"));
        assert_eq!(queue.dequeue_value(), Value::Null);
    }
}
