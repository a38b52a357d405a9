//! Dynamic values
//!
//! The argument and return type of every bound method. Mirrors the shapes a
//! script host would pass: primitives, arrays, callables and objects.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::Result;

type NativeFn = dyn Fn(&Value, &[Value]) -> Result<Value>;

/// Callable value. Receives `this` and the argument list.
#[derive(Clone)]
pub struct Function(Rc<NativeFn>);

impl Function {
    pub fn new(f: impl Fn(&Value, &[Value]) -> Result<Value> + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value> {
        (self.0)(this, args)
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Function")
    }
}

/// A Rust type exposed to dynamic code with an explicit class name
pub trait HostObject: Any {
    fn class_name(&self) -> &str;

    /// Named property lookup
    fn property(&self, _name: &str) -> Value {
        Value::Undefined
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

#[derive(Clone)]
pub enum Object {
    /// The host global object
    Global,
    /// String-keyed map
    Plain(Rc<BTreeMap<String, Value>>),
    Host(Rc<dyn HostObject>),
}

impl Object {
    pub fn get(&self, key: &str) -> Value {
        match self {
            Object::Global => Value::Undefined,
            Object::Plain(map) => map.get(key).cloned().unwrap_or_default(),
            Object::Host(host) => host.property(key),
        }
    }
}

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Function(Function),
    Object(Object),
}

impl Value {
    pub fn function(f: impl Fn(&Value, &[Value]) -> Result<Value> + 'static) -> Self {
        Value::Function(Function::new(f))
    }

    pub fn plain<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let map = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Value::Object(Object::Plain(Rc::new(map)))
    }

    pub fn host<T: HostObject>(object: Rc<T>) -> Self {
        Value::Object(Object::Host(object))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// `undefined` or `null`
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Downcast a host object to its concrete type
    pub fn downcast<T: HostObject>(&self) -> Option<Rc<T>> {
        match self {
            Value::Object(Object::Host(host)) => host.clone().into_any().downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Property access: object keys, array indices and `length`
    pub fn get(&self, key: &str) -> Value {
        match self {
            Value::Object(object) => object.get(key),
            Value::Array(items) if key == "length" => Value::from(items.len()),
            Value::Array(items) => key
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i).cloned())
                .unwrap_or_default(),
            Value::String(s) if key == "length" => Value::from(s.chars().count()),
            _ => Value::Undefined,
        }
    }

    /// `typeof`
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
        }
    }

    /// String conversion used when writing values into the document
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|v| if v.is_nullish() { String::new() } else { v.to_display_string() })
                .collect::<Vec<_>>()
                .join(","),
            Value::Function(_) => "function".to_string(),
            Value::Object(Object::Host(host)) => format!("[object {}]", host.class_name()),
            Value::Object(_) => "[object Object]".to_string(),
        }
    }
}

/// Integers print without a fractional part
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        (if n > 0.0 { "Infinity" } else { "-Infinity" }).to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Object(Object::Global), Value::Object(Object::Global)) => true,
            (Value::Object(Object::Plain(a)), Value::Object(Object::Plain(b))) => a == b,
            (Value::Object(Object::Host(a)), Value::Object(Object::Host(b))) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Array(items) => f.debug_list().entries(items).finish(),
            Value::Function(_) => f.write_str("[Function]"),
            Value::Object(Object::Global) => f.write_str("[Global]"),
            Value::Object(Object::Plain(map)) => f.debug_map().entries(map.iter()).finish(),
            Value::Object(Object::Host(host)) => write!(f, "[object {}]", host.class_name()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undefined, Into::into)
    }
}
