//! Type Descriptor Engine
//!
//! Declarative runtime type checks over [`Value`]: primitive tags,
//! array-of, class-of and ordered unions, with required/optional presence.
//! Every bound method validates its arguments through [`is_type`].

use crate::value::{Object, Value};
use crate::{Result, SimpliError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Number,
    Boolean,
    /// `typeof` object: also matches null and arrays
    Object,
    Function,
    /// Number with no fractional part
    Integer,
    Array,
}

impl Primitive {
    /// Tag names accepted in dynamic descriptors
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "String" => Primitive::String,
            "Number" => Primitive::Number,
            "Boolean" | "Bool" => Primitive::Boolean,
            "Object" => Primitive::Object,
            "Function" => Primitive::Function,
            "Integer" | "Int" => Primitive::Integer,
            "Array" => Primitive::Array,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Primitive::String => "String",
            Primitive::Number => "Number",
            Primitive::Boolean => "Boolean",
            Primitive::Object => "Object",
            Primitive::Function => "Function",
            Primitive::Integer => "Integer",
            Primitive::Array => "Array",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            Primitive::String => matches!(value, Value::String(_)),
            Primitive::Number => matches!(value, Value::Number(_)),
            Primitive::Boolean => matches!(value, Value::Bool(_)),
            Primitive::Object => value.type_of() == "object",
            Primitive::Function => matches!(value, Value::Function(_)),
            Primitive::Integer => is_integer(value),
            Primitive::Array => is_array(value),
        }
    }
}

/// Expected shape of a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Primitive(Primitive),
    /// Array whose every element matches
    ArrayOf(Box<TypeDescriptor>),
    /// Object whose resolved class name equals the given name
    ClassOf(String),
    /// Alternatives tried in order, first match wins
    Union(Vec<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn string() -> Self {
        Primitive::String.into()
    }

    pub fn number() -> Self {
        Primitive::Number.into()
    }

    pub fn boolean() -> Self {
        Primitive::Boolean.into()
    }

    pub fn object() -> Self {
        Primitive::Object.into()
    }

    pub fn function() -> Self {
        Primitive::Function.into()
    }

    pub fn integer() -> Self {
        Primitive::Integer.into()
    }

    pub fn array() -> Self {
        Primitive::Array.into()
    }

    pub fn array_of(inner: TypeDescriptor) -> Self {
        TypeDescriptor::ArrayOf(Box::new(inner))
    }

    pub fn class_of(name: impl Into<String>) -> Self {
        TypeDescriptor::ClassOf(name.into())
    }

    pub fn union(alternatives: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        TypeDescriptor::Union(alternatives.into_iter().collect())
    }

    /// Decode the loose dynamic form: a tag string, an array of descriptors
    /// (union), `{Array: T}` or `{Object: "ClassName"}`
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(tag) => Primitive::from_tag(tag).map(Self::Primitive).ok_or_else(|| {
                SimpliError::InvalidDescriptor(format!(
                    "unrecognized type '{tag}', it should be one of the valid data types"
                ))
            }),
            Value::Array(alternatives) => {
                let alternatives = alternatives
                    .iter()
                    .map(Self::from_value)
                    .collect::<Result<Vec<_>>>()?;
                let descriptor = Self::Union(alternatives);
                descriptor.validate()?;
                Ok(descriptor)
            }
            Value::Object(Object::Plain(map)) => {
                if let Some(inner) = map.get("Array") {
                    Ok(Self::array_of(Self::from_value(inner)?))
                } else if let Some(class) = map.get("Object") {
                    match class {
                        Value::String(name) if !name.is_empty() => Ok(Self::class_of(name.as_str())),
                        _ => Err(SimpliError::InvalidDescriptor(
                            "class name should be a non-empty string".to_string(),
                        )),
                    }
                } else {
                    Err(SimpliError::InvalidDescriptor(
                        "unrecognized type object, it should specify a typed array or object class"
                            .to_string(),
                    ))
                }
            }
            other => Err(SimpliError::InvalidDescriptor(format!(
                "it should be a string, object or an array of them, got {other:?}"
            ))),
        }
    }

    /// Reject malformed descriptors (empty union, empty class name)
    pub fn validate(&self) -> Result<()> {
        match self {
            TypeDescriptor::Primitive(_) => Ok(()),
            TypeDescriptor::ArrayOf(inner) => inner.validate(),
            TypeDescriptor::ClassOf(name) if name.is_empty() => Err(SimpliError::InvalidDescriptor(
                "class name should be a non-empty string".to_string(),
            )),
            TypeDescriptor::ClassOf(_) => Ok(()),
            TypeDescriptor::Union(alternatives) if alternatives.is_empty() => Err(
                SimpliError::InvalidDescriptor("union should have at least one alternative".to_string()),
            ),
            TypeDescriptor::Union(alternatives) => alternatives.iter().try_for_each(Self::validate),
        }
    }

    /// Match a validated descriptor
    fn matches(&self, value: &Value) -> bool {
        match self {
            TypeDescriptor::Primitive(p) => p.matches(value),
            TypeDescriptor::ArrayOf(inner) => {
                is_array(value) && elements_match(value, |v| inner.matches(v))
            }
            TypeDescriptor::ClassOf(name) => resolve_class_name(value) == *name,
            TypeDescriptor::Union(alternatives) => alternatives.iter().any(|alt| alt.matches(value)),
        }
    }
}

impl From<Primitive> for TypeDescriptor {
    fn from(p: Primitive) -> Self {
        TypeDescriptor::Primitive(p)
    }
}

/// Whether an argument must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    #[default]
    Required,
    /// `undefined` and `null` are accepted
    Optional,
}

/// Check `value` against `descriptor`
///
/// A mismatch is `Ok(false)`; only a malformed descriptor is an error.
pub fn is_type(value: &Value, descriptor: &TypeDescriptor, presence: Presence) -> Result<bool> {
    if presence == Presence::Optional && value.is_nullish() {
        return Ok(true);
    }
    descriptor.validate()?;
    Ok(descriptor.matches(value))
}

/// Validate an argument, failing with `InvalidArgument(message)` on mismatch
pub fn expect_type(
    value: &Value,
    descriptor: &TypeDescriptor,
    presence: Presence,
    message: &str,
) -> Result<()> {
    if is_type(value, descriptor, presence)? {
        Ok(())
    } else {
        Err(SimpliError::invalid_argument(message))
    }
}

/// Runtime class name
///
/// Plain objects whose `toString` reports `[object Name]` resolve to `Name`.
pub fn resolve_class_name(value: &Value) -> String {
    match value {
        Value::Undefined => "Undefined".to_string(),
        Value::Null => "Null".to_string(),
        Value::Bool(_) => "Boolean".to_string(),
        Value::Number(_) => "Number".to_string(),
        Value::String(_) => "String".to_string(),
        Value::Array(_) => "Array".to_string(),
        Value::Function(_) => "Function".to_string(),
        Value::Object(Object::Global) => "Global".to_string(),
        Value::Object(Object::Host(host)) => host.class_name().to_string(),
        Value::Object(Object::Plain(map)) => map
            .get("toString")
            .and_then(Value::as_function)
            .and_then(|to_string| to_string.call(value, &[]).ok())
            .and_then(|reported| {
                reported
                    .as_str()
                    .and_then(|s| s.strip_prefix("[object "))
                    .and_then(|s| s.strip_suffix(']'))
                    .filter(|name| !name.is_empty() && !name.contains(']'))
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "Object".to_string()),
    }
}

/// Array check. Falls back to a `length` duck test when class resolution
/// cannot recognise a fresh empty array.
pub fn is_array(value: &Value) -> bool {
    let reliable = resolve_class_name(&Value::Array(Vec::new())) == "Array";
    array_like(value, reliable)
}

fn array_like(value: &Value, class_resolution_reliable: bool) -> bool {
    let class = resolve_class_name(value);
    if class == "Array" {
        true
    } else if !class_resolution_reliable && class == "Object" {
        matches!(value.get("length"), Value::Number(_))
    } else {
        false
    }
}

/// Longest array a host can hold
const MAX_ARRAY_LENGTH: f64 = 4_294_967_295.0;

/// Length of an array-like value: an integer in `0..=MAX_ARRAY_LENGTH`
fn array_like_length(value: &Value) -> Option<usize> {
    let length = value.get("length").as_f64()?;
    if !is_integer(&Value::Number(length)) || !(0.0..=MAX_ARRAY_LENGTH).contains(&length) {
        return None;
    }
    Some(length as usize)
}

/// Every element of an array or array-like value satisfies `check`
///
/// Array-like elements are read one index at a time and the walk stops at
/// the first mismatch, so a missing index ends it early.
fn elements_match(value: &Value, check: impl Fn(&Value) -> bool) -> bool {
    match value {
        Value::Array(items) => items.iter().all(check),
        other => array_like_length(other)
            .is_some_and(|len| (0..len).all(|i| check(&other.get(&i.to_string())))),
    }
}

/// Not `undefined`
pub fn exist(value: &Value) -> bool {
    !value.is_undefined()
}

/// Neither `undefined` nor `null`
pub fn isset(value: &Value) -> bool {
    !value.is_nullish()
}

/// Walk `keys` down from `object`; false as soon as a level is undefined
pub fn iterative_isset(object: &Value, keys: &[Value]) -> Result<bool> {
    let key_type = TypeDescriptor::union([TypeDescriptor::string(), TypeDescriptor::integer()]);
    let mut current = object.clone();
    for key in keys {
        expect_type(key, &key_type, Presence::Required, "Invalid key, it should be a string or integer")?;
        let name = match key {
            Value::Number(n) => crate::value::format_number(*n),
            other => other.to_display_string(),
        };
        let next = current.get(&name);
        if next.is_undefined() {
            return Ok(false);
        }
        current = next;
    }
    Ok(true)
}

pub fn is_nan(value: &Value) -> bool {
    matches!(value, Value::Number(n) if n.is_nan())
}

pub fn is_integer(value: &Value) -> bool {
    matches!(value, Value::Number(n) if n.is_finite() && n.fract() == 0.0)
}

/// Largest magnitude a `Number` holds without losing integer precision
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Integer within `±MAX_SAFE_INTEGER`
pub fn is_safe_integer(value: &Value) -> bool {
    matches!(value, Value::Number(n) if is_integer(value) && n.abs() <= MAX_SAFE_INTEGER)
}

/// Convert a validated integer to `i64`, failing with `message` when it
/// lies outside the exactly representable range
pub(crate) fn to_exact_i64(value: &Value, message: &str) -> Result<i64> {
    match value {
        Value::Number(n) if is_safe_integer(value) => Ok(*n as i64),
        _ => Err(SimpliError::invalid_argument(message)),
    }
}

pub fn is_string(value: &Value) -> bool {
    matches!(value, Value::String(_))
}

pub fn is_number(value: &Value) -> bool {
    matches!(value, Value::Number(_))
}

pub fn is_boolean(value: &Value) -> bool {
    matches!(value, Value::Bool(_))
}

pub fn is_function(value: &Value) -> bool {
    matches!(value, Value::Function(_))
}

/// `typeof` object, or exactly the given class when one is named
pub fn is_object(value: &Value, class: Option<&str>) -> bool {
    match class {
        None => value.type_of() == "object",
        Some(name) => resolve_class_name(value) == name,
    }
}

/// Bounds check with optional bounds; at least one bound is required
pub fn in_range(value: &Value, lower: &Value, upper: &Value) -> Result<bool> {
    let number = TypeDescriptor::number();
    expect_type(value, &number, Presence::Required, "Invalid variable, it should be a number")?;
    expect_type(lower, &number, Presence::Optional, "Invalid lower bound, it should be a number")?;
    expect_type(upper, &number, Presence::Optional, "Invalid upper bound, it should be a number")?;
    if !isset(lower) && !isset(upper) {
        return Err(SimpliError::invalid_argument(
            "Invalid invocation, at least one bound should be specified",
        ));
    }
    let n = value.as_f64().unwrap_or(f64::NAN);
    if let Some(lo) = lower.as_f64() {
        if n < lo {
            return Ok(false);
        }
    }
    if let Some(hi) = upper.as_f64() {
        if n > hi {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Uppercase the first character
pub fn ucfirst(value: &Value) -> Result<String> {
    let Value::String(s) = value else {
        return Err(SimpliError::invalid_argument("Invalid argument, it should be a string"));
    };
    let mut chars = s.chars();
    Ok(match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn check(value: impl Into<Value>, descriptor: &TypeDescriptor) -> bool {
        is_type(&value.into(), descriptor, Presence::Required).unwrap()
    }

    #[test]
    fn test_primitive_tags() {
        assert!(check(3, &TypeDescriptor::integer()));
        assert!(!check(3.5, &TypeDescriptor::integer()));
        assert!(!check(f64::NAN, &TypeDescriptor::integer()));
        assert!(check("x", &TypeDescriptor::string()));
        assert!(check(f64::NAN, &TypeDescriptor::number()));
        assert!(check(true, &TypeDescriptor::boolean()));
        assert!(!check("true", &TypeDescriptor::boolean()));
        assert!(check(Value::function(|_, _| Ok(Value::Undefined)), &TypeDescriptor::function()));
    }

    #[test]
    fn test_object_is_loose() {
        let object = TypeDescriptor::object();
        assert!(check(Value::Null, &object));
        assert!(check(Value::Array(Vec::new()), &object));
        assert!(check(Value::plain::<&str>([]), &object));
        assert!(!check(Value::function(|_, _| Ok(Value::Undefined)), &object));
        assert!(!check(Value::Undefined, &object));
    }

    #[test]
    fn test_array_of() {
        let ints = TypeDescriptor::array_of(TypeDescriptor::integer());
        assert!(check(Value::Array(Vec::new()), &ints));
        assert!(check(vec![Value::from(1), Value::from(2)], &ints));
        assert!(!check(vec![Value::from(1), Value::from(2.5)], &ints));
        assert!(!check("12", &ints));
    }

    #[test]
    fn test_union_is_or() {
        let union = TypeDescriptor::union([TypeDescriptor::string(), TypeDescriptor::integer()]);
        for v in [Value::from("a"), Value::from(1), Value::from(1.5), Value::Null] {
            let expected = check(v.clone(), &TypeDescriptor::string()) || check(v.clone(), &TypeDescriptor::integer());
            assert_eq!(check(v, &union), expected);
        }
    }

    #[test]
    fn test_optional_absence() {
        for d in [TypeDescriptor::string(), TypeDescriptor::array_of(TypeDescriptor::number())] {
            assert!(is_type(&Value::Undefined, &d, Presence::Optional).unwrap());
            assert!(is_type(&Value::Null, &d, Presence::Optional).unwrap());
            assert!(!is_type(&Value::Undefined, &d, Presence::Required).unwrap());
        }
    }

    #[test]
    fn test_malformed_descriptors() {
        assert!(matches!(
            is_type(&Value::from(1), &TypeDescriptor::Union(Vec::new()), Presence::Required),
            Err(SimpliError::InvalidDescriptor(_))
        ));
        assert!(matches!(
            is_type(&Value::from(1), &TypeDescriptor::class_of(""), Presence::Required),
            Err(SimpliError::InvalidDescriptor(_))
        ));
        for bad in [Value::from("Whatever"), Value::from(3), Value::plain([("Map", Value::from("String"))])] {
            assert!(matches!(TypeDescriptor::from_value(&bad), Err(SimpliError::InvalidDescriptor(_))));
        }
    }

    #[test]
    fn test_from_value() {
        let dynamic = Value::from(vec![
            Value::from("Int"),
            Value::plain([("Array", Value::from("Bool"))]),
            Value::plain([("Object", Value::from("simpli.BinaryTree"))]),
        ]);
        assert_eq!(
            TypeDescriptor::from_value(&dynamic).unwrap(),
            TypeDescriptor::union([
                TypeDescriptor::integer(),
                TypeDescriptor::array_of(TypeDescriptor::boolean()),
                TypeDescriptor::class_of("simpli.BinaryTree"),
            ])
        );
    }

    #[test]
    fn test_class_name_resolution() {
        assert_eq!(resolve_class_name(&Value::Object(Object::Global)), "Global");
        assert_eq!(resolve_class_name(&Value::plain::<&str>([])), "Object");

        let foreign = Value::plain([(
            "toString",
            Value::function(|_, _| Ok(Value::from("[object my.Widget]"))),
        )]);
        assert_eq!(resolve_class_name(&foreign), "my.Widget");

        let chatty = Value::plain([("toString", Value::function(|_, _| Ok(Value::from("hello"))))]);
        assert_eq!(resolve_class_name(&chatty), "Object");
    }

    #[test]
    fn test_class_of_round_trip() {
        let foreign = Value::plain([(
            "toString",
            Value::function(|_, _| Ok(Value::from("[object Thing]"))),
        )]);
        let values = [
            Value::from(1),
            Value::from("s"),
            Value::Null,
            Value::Undefined,
            Value::Array(Vec::new()),
            Value::Object(Object::Global),
            foreign,
        ];
        for v in values {
            let descriptor = TypeDescriptor::class_of(resolve_class_name(&v));
            assert!(is_type(&v, &descriptor, Presence::Required).unwrap(), "{v:?}");
        }
    }

    #[test]
    fn test_array_like_fallback() {
        let like = Value::plain([("length", Value::from(2))]);
        assert!(!array_like(&like, true));
        assert!(array_like(&like, false));
        assert!(!array_like(&Value::plain::<&str>([]), false));
        assert!(is_array(&Value::Array(Vec::new())));
    }

    #[test]
    fn test_array_like_length_is_bounded() {
        let pair = Value::plain([
            ("length", Value::from(2)),
            ("0", Value::from(1)),
            ("1", Value::from(2)),
        ]);
        assert!(elements_match(&pair, |v| is_integer(v)));

        for length in [Value::from(1e300), Value::from(-1), Value::from(1.5), Value::from("2")] {
            let like = Value::plain([("length", length), ("0", Value::from(1))]);
            assert!(!elements_match(&like, |v| is_integer(v)));
        }

        // a huge length stops at the first missing index
        let sparse = Value::plain([("length", Value::from(MAX_ARRAY_LENGTH)), ("0", Value::from(1))]);
        assert!(!elements_match(&sparse, |v| is_integer(v)));
    }

    #[test]
    fn test_exact_integers() {
        assert!(is_safe_integer(&Value::from(MAX_SAFE_INTEGER)));
        assert!(!is_safe_integer(&Value::from(1e19)));
        assert!(!is_safe_integer(&Value::from(-1e19)));
        assert_eq!(to_exact_i64(&Value::from(-42), "bad").unwrap(), -42);
        assert!(matches!(
            to_exact_i64(&Value::from(1e19), "bad"),
            Err(SimpliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_iterative_isset() {
        let root = Value::plain([("a", Value::plain([("b", Value::from(vec![Value::from(7)]))]))]);
        assert!(iterative_isset(&root, &[Value::from("a"), Value::from("b"), Value::from(0)]).unwrap());
        assert!(!iterative_isset(&root, &[Value::from("a"), Value::from("x"), Value::from("y")]).unwrap());
        assert!(matches!(
            iterative_isset(&root, &[Value::from(true)]),
            Err(SimpliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_in_range() {
        let v = Value::from(5);
        assert!(in_range(&v, &Value::from(0), &Value::from(10)).unwrap());
        assert!(!in_range(&v, &Value::Undefined, &Value::from(4)).unwrap());
        assert!(in_range(&v, &Value::from(5), &Value::Undefined).unwrap());
        assert!(in_range(&v, &Value::Undefined, &Value::Undefined).is_err());
        assert!(in_range(&Value::from("5"), &Value::from(0), &Value::Undefined).is_err());
        assert!(in_range(&v, &Value::from(0), &Value::from("x")).is_err());
    }

    #[test]
    fn test_small_predicates() {
        assert!(exist(&Value::Null));
        assert!(!isset(&Value::Null));
        assert!(is_nan(&Value::from(f64::NAN)));
        assert!(!is_nan(&Value::from("NaN")));
        assert!(is_object(&Value::Null, None));
        assert!(is_object(&Value::host(Rc::new(crate::structures::BinaryTree::new())), Some("simpli.BinaryTree")));
        assert_eq!(ucfirst(&Value::from("élan")).unwrap(), "Élan");
        assert_eq!(ucfirst(&Value::from("")).unwrap(), "");
        assert!(ucfirst(&Value::from(1)).is_err());
    }
}
