//! The closed set of node variants.

use std::fmt;

use serde::Serialize;

use crate::heap::BufferKind;

/// What a classified node is.
///
/// Exactly one variant applies per node. New kinds of values are added
/// here rather than special-cased by consumers; anything unrecognized is
/// [`ValueKind::Unknown`].
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ValueKind {
    Null,
    Undefined,
    Boolean,
    Number,
    BigInt,
    /// `empty` distinguishes `""` for styling.
    String { empty: bool },
    Symbol,
    Array,
    PlainObject,
    ClassInstance,
    Function,
    Map,
    Set,
    Date,
    RegExp,
    Error,
    Promise,
    WeakMap,
    WeakSet,
    BinaryBuffer { buffer: BufferKind },
    CircularReference,
    Unknown,
}

impl ValueKind {
    /// Variants that can have children.
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            ValueKind::Array
                | ValueKind::PlainObject
                | ValueKind::ClassInstance
                | ValueKind::Function
                | ValueKind::Map
                | ValueKind::Set
                | ValueKind::BinaryBuffer { .. }
        )
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            ValueKind::Null
                | ValueKind::Undefined
                | ValueKind::Boolean
                | ValueKind::Number
                | ValueKind::BigInt
                | ValueKind::String { .. }
                | ValueKind::Symbol
        )
    }

    /// Short variant name.
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Null => "Null",
            ValueKind::Undefined => "Undefined",
            ValueKind::Boolean => "Boolean",
            ValueKind::Number => "Number",
            ValueKind::BigInt => "BigInt",
            ValueKind::String { empty: true } => "EmptyString",
            ValueKind::String { empty: false } => "String",
            ValueKind::Symbol => "Symbol",
            ValueKind::Array => "Array",
            ValueKind::PlainObject => "PlainObject",
            ValueKind::ClassInstance => "ClassInstance",
            ValueKind::Function => "Function",
            ValueKind::Map => "Map",
            ValueKind::Set => "Set",
            ValueKind::Date => "Date",
            ValueKind::RegExp => "RegExp",
            ValueKind::Error => "Error",
            ValueKind::Promise => "Promise",
            ValueKind::WeakMap => "WeakMap",
            ValueKind::WeakSet => "WeakSet",
            ValueKind::BinaryBuffer { .. } => "BinaryBuffer",
            ValueKind::CircularReference => "CircularReference",
            ValueKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::BinaryBuffer { buffer } => write!(f, "BinaryBuffer<{}>", buffer),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_and_primitive_are_disjoint() {
        let all = [
            ValueKind::Null,
            ValueKind::String { empty: true },
            ValueKind::Array,
            ValueKind::ClassInstance,
            ValueKind::Date,
            ValueKind::BinaryBuffer { buffer: BufferKind::Uint8Array },
            ValueKind::CircularReference,
            ValueKind::Unknown,
        ];
        for kind in all {
            assert!(!(kind.is_compound() && kind.is_primitive()), "{kind}");
        }
        assert!(!ValueKind::CircularReference.is_compound());
        assert!(!ValueKind::Date.is_compound());
    }

    #[test]
    fn display_names() {
        assert_eq!(ValueKind::String { empty: true }.to_string(), "EmptyString");
        assert_eq!(
            ValueKind::BinaryBuffer { buffer: BufferKind::Float64Array }.to_string(),
            "BinaryBuffer<Float64Array>"
        );
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(ValueKind::BinaryBuffer {
            buffer: BufferKind::Int8Array,
        })
        .expect("serialize");
        assert_eq!(json, serde_json::json!({"type": "binaryBuffer", "buffer": "Int8Array"}));
    }
}
