//! Value types for the inspected universe.

use std::fmt;

use serde::Serialize;

use crate::heap::ObjectId;

/// A dynamically typed value.
///
/// Primitives are held inline. Everything with reference identity
/// (objects, arrays, functions, collections, buffers) lives in a
/// [`Heap`](crate::heap::Heap) and is referenced by its [`ObjectId`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    Symbol(Symbol),
    /// Reference to a heap object. Two values are the same object
    /// exactly when their ids are equal.
    Object(ObjectId),
}

impl Value {
    /// Shorthand for building a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// True for values that carry reference identity.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// The heap handle, if this value is an object reference.
    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Value::Object(id) => Some(*id),
            _ => None,
        }
    }

    /// Host-style `typeof` name for primitives. Objects report `"object"`;
    /// callers that need to tell functions apart must consult the heap.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Object(_) => "object",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
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

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::Object(id)
    }
}

/// A unique symbol with an optional description.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Symbol {
    pub description: Option<String>,
}

impl Symbol {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description.as_deref().unwrap_or(""))
    }
}

/// Format a number the way a script host prints it.
///
/// `NaN` and the infinities are spelled out, integral values drop the
/// fractional part and negative zero prints as `0`. Magnitudes of `1e21`
/// and above, or below `1e-6`, use exponent form (`1e+21`, `1.5e-7`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        return exponent_form(n);
    }
    n.to_string()
}

/// Shortest round-trip digits with a signed exponent.
fn exponent_form(n: f64) -> String {
    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exp)) if exp.starts_with('-') => format!("{}e{}", mantissa, exp),
        Some((mantissa, exp)) => format!("{}e+{}", mantissa, exp),
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_like_a_host() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-42.0), "-42");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn format_number_switches_to_exponent_form() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        // boundaries stay positional
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(123456789012345680000.0), "123456789012345680000");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn symbol_display() {
        assert_eq!(Symbol::new("tag").to_string(), "Symbol(tag)");
        assert_eq!(Symbol::anonymous().to_string(), "Symbol()");
    }

    #[test]
    fn only_objects_have_identity() {
        assert!(Value::Object(ObjectId::from_raw(3)).is_object());
        assert!(!Value::Null.is_object());
        assert!(!Value::string("x").is_object());
        assert_eq!(Value::Null.type_name(), "object");
        assert_eq!(Value::BigInt(7).type_name(), "bigint");
    }
}
