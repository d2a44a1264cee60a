//! Value classification.
//!
//! [`classify`] maps a value to exactly one [`ValueKind`] from its dynamic
//! type and prototype chain alone; contents never matter. [`display_text`]
//! produces the node's payload and [`children`] expands compound kinds into
//! keyed, addressed members.

use chrono::SecondsFormat;
use spyglass_types::{
    format_number, Heap, NodePath, Object, ObjectId, ObjectKind, Value, ValueKind,
};

use crate::enumerate::{function_members, instance_members};

/// Shown when a value has no usable textual form.
pub const UNREPRESENTABLE: &str = "<unrepresentable>";

/// Shown for a circular reference.
pub const CIRCULAR: &str = "[Circular]";

/// A member of a compound value, not yet classified.
#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub key: String,
    pub value: Value,
    pub path: NodePath,
}

pub fn classify(heap: &Heap, value: &Value) -> ValueKind {
    match value {
        Value::Undefined => ValueKind::Undefined,
        Value::Null => ValueKind::Null,
        Value::Bool(_) => ValueKind::Boolean,
        Value::Number(_) => ValueKind::Number,
        Value::BigInt(_) => ValueKind::BigInt,
        Value::String(s) => ValueKind::String { empty: s.is_empty() },
        Value::Symbol(_) => ValueKind::Symbol,
        Value::Object(id) => match heap.get(*id) {
            Some(object) => classify_object(heap, *id, object),
            None => ValueKind::Unknown,
        },
    }
}

fn classify_object(heap: &Heap, id: ObjectId, object: &Object) -> ValueKind {
    match &object.kind {
        ObjectKind::Ordinary => {
            if is_plain(heap, id) {
                ValueKind::PlainObject
            } else {
                ValueKind::ClassInstance
            }
        }
        ObjectKind::Array(_) => ValueKind::Array,
        ObjectKind::Map(_) => ValueKind::Map,
        ObjectKind::Set(_) => ValueKind::Set,
        ObjectKind::Date(_) => ValueKind::Date,
        ObjectKind::RegExp { .. } => ValueKind::RegExp,
        ObjectKind::Error { .. } => ValueKind::Error,
        ObjectKind::Promise(_) => ValueKind::Promise,
        ObjectKind::WeakMap => ValueKind::WeakMap,
        ObjectKind::WeakSet => ValueKind::WeakSet,
        ObjectKind::Buffer { kind, .. } => ValueKind::BinaryBuffer { buffer: *kind },
        ObjectKind::Function { .. } => ValueKind::Function,
        ObjectKind::Foreign(_) => ValueKind::Unknown,
    }
}

/// Plain when the nearest named constructor is the base prototype's, or
/// there is none at all.
fn is_plain(heap: &Heap, id: ObjectId) -> bool {
    let base = heap.base_prototype();
    let named = std::iter::once(id)
        .chain(heap.prototype_chain(id))
        .find(|link| heap.get(*link).is_some_and(|o| o.constructor.is_some()));
    match named {
        None => true,
        Some(link) => link == base,
    }
}

/// The display payload for a node of kind `kind`.
pub fn display_text(heap: &Heap, value: &Value, kind: ValueKind) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::BigInt(n) => format!("{}n", n),
        Value::String(s) => s.clone(),
        Value::Symbol(sym) => sym.to_string(),
        Value::Object(id) => match heap.get(*id) {
            Some(object) => object_text(heap, *id, object, kind),
            None => {
                tracing::debug!(object = %id, "dangling object handle");
                UNREPRESENTABLE.to_string()
            }
        },
    }
}

fn object_text(heap: &Heap, id: ObjectId, object: &Object, kind: ValueKind) -> String {
    match &object.kind {
        ObjectKind::Ordinary => match kind {
            ValueKind::ClassInstance => heap.constructor_name(id).unwrap_or("Object").to_string(),
            _ => "Object".to_string(),
        },
        ObjectKind::Array(items) => format!("Array({})", items.len()),
        ObjectKind::Function { name } if name.is_empty() => "ƒ anonymous()".to_string(),
        ObjectKind::Function { name } => format!("ƒ {}()", name),
        ObjectKind::Map(entries) => format!("Map({})", entries.len()),
        ObjectKind::Set(members) => format!("Set({})", members.len()),
        ObjectKind::Date(Some(at)) => at.to_rfc3339_opts(SecondsFormat::Millis, true),
        ObjectKind::Date(None) => "Invalid Date".to_string(),
        ObjectKind::RegExp { source, flags } => format!("/{}/{}", source, flags),
        ObjectKind::Error { name, message } if message.is_empty() => name.clone(),
        ObjectKind::Error { name, message } => format!("{}: {}", name, message),
        ObjectKind::Promise(state) => format!("Promise {{<{}>}}", state.as_str()),
        ObjectKind::WeakMap => "WeakMap".to_string(),
        ObjectKind::WeakSet => "WeakSet".to_string(),
        ObjectKind::Buffer { kind, bytes } => {
            format!("{}({})", kind.name(), bytes.len() / kind.element_size())
        }
        ObjectKind::Foreign(foreign) => match foreign.describe() {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(object = %id, type_name = foreign.type_name(), "describe failed: {}", e);
                UNREPRESENTABLE.to_string()
            }
        },
    }
}

/// Members of a compound value, in display order. Non-compound kinds have
/// none.
///
/// Set members are not individually addressable: they all carry the set's
/// own path.
pub fn children(heap: &Heap, value: &Value, kind: ValueKind, path: &NodePath) -> Vec<Child> {
    let Some(id) = value.as_object() else {
        return Vec::new();
    };
    let Some(object) = heap.get(id) else {
        return Vec::new();
    };

    match (&object.kind, kind) {
        (ObjectKind::Ordinary, ValueKind::PlainObject) => object
            .own_properties()
            .iter()
            .map(|(key, value)| Child {
                key: key.clone(),
                value: value.clone(),
                path: path.key(key),
            })
            .collect(),
        (ObjectKind::Ordinary, ValueKind::ClassInstance) => instance_members(heap, id)
            .into_iter()
            .map(|key| Child {
                value: heap.lookup(id, &key).cloned().unwrap_or(Value::Undefined),
                path: path.key(&key),
                key,
            })
            .collect(),
        (ObjectKind::Function { .. }, _) => function_members(heap, id)
            .into_iter()
            .map(|key| Child {
                value: object.get_own(&key).cloned().unwrap_or(Value::Undefined),
                path: path.key(&key),
                key,
            })
            .collect(),
        (ObjectKind::Array(items), _) => indexed(items.iter().cloned(), path),
        (ObjectKind::Buffer { kind, bytes }, _) => indexed(kind.decode(bytes), path),
        (ObjectKind::Map(entries), _) => entries
            .iter()
            .map(|(key, value)| {
                let key = heap.key_string(key);
                Child {
                    value: value.clone(),
                    path: path.entry(&key),
                    key,
                }
            })
            .collect(),
        (ObjectKind::Set(members), _) => members
            .iter()
            .enumerate()
            .map(|(i, value)| Child {
                key: i.to_string(),
                value: value.clone(),
                path: path.clone(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn indexed(items: impl IntoIterator<Item = Value>, path: &NodePath) -> Vec<Child> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, value)| Child {
            key: i.to_string(),
            value,
            path: path.index(i),
        })
        .collect()
}
