//! The object arena.
//!
//! Everything with reference identity lives in a [`Heap`] and is addressed
//! by an [`ObjectId`]. Identity is the handle, never the contents: two
//! structurally equal objects are still two objects.
//!
//! The heap owns one *base prototype* (constructor `Object`). Plain objects
//! link to it, classes are prototype objects registered with
//! [`Heap::define_class`], and instances link to their class prototype.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::value::{format_number, Value};

/// Handle to an object in a [`Heap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Build a handle from its raw index. Mostly useful in tests; a handle
    /// that does not belong to the heap it is used with resolves to nothing.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The fixed family of binary buffer types.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BufferKind {
    ArrayBuffer,
    DataView,
    Int8Array,
    Uint8Array,
    Uint8ClampedArray,
    Int16Array,
    Uint16Array,
    Int32Array,
    Uint32Array,
    Float32Array,
    Float64Array,
    BigInt64Array,
    BigUint64Array,
}

impl BufferKind {
    pub const ALL: [BufferKind; 13] = [
        BufferKind::ArrayBuffer,
        BufferKind::DataView,
        BufferKind::Int8Array,
        BufferKind::Uint8Array,
        BufferKind::Uint8ClampedArray,
        BufferKind::Int16Array,
        BufferKind::Uint16Array,
        BufferKind::Int32Array,
        BufferKind::Uint32Array,
        BufferKind::Float32Array,
        BufferKind::Float64Array,
        BufferKind::BigInt64Array,
        BufferKind::BigUint64Array,
    ];

    /// The concrete type name, as a host would report it.
    pub fn name(self) -> &'static str {
        match self {
            BufferKind::ArrayBuffer => "ArrayBuffer",
            BufferKind::DataView => "DataView",
            BufferKind::Int8Array => "Int8Array",
            BufferKind::Uint8Array => "Uint8Array",
            BufferKind::Uint8ClampedArray => "Uint8ClampedArray",
            BufferKind::Int16Array => "Int16Array",
            BufferKind::Uint16Array => "Uint16Array",
            BufferKind::Int32Array => "Int32Array",
            BufferKind::Uint32Array => "Uint32Array",
            BufferKind::Float32Array => "Float32Array",
            BufferKind::Float64Array => "Float64Array",
            BufferKind::BigInt64Array => "BigInt64Array",
            BufferKind::BigUint64Array => "BigUint64Array",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Bytes per element. Untyped buffers are viewed as bytes.
    pub fn element_size(self) -> usize {
        match self {
            BufferKind::ArrayBuffer
            | BufferKind::DataView
            | BufferKind::Int8Array
            | BufferKind::Uint8Array
            | BufferKind::Uint8ClampedArray => 1,
            BufferKind::Int16Array | BufferKind::Uint16Array => 2,
            BufferKind::Int32Array | BufferKind::Uint32Array | BufferKind::Float32Array => 4,
            BufferKind::Float64Array | BufferKind::BigInt64Array | BufferKind::BigUint64Array => 8,
        }
    }

    /// Decode little-endian bytes into element values.
    ///
    /// Trailing bytes that do not fill a whole element are ignored.
    pub fn decode(self, bytes: &[u8]) -> Vec<Value> {
        bytes
            .chunks_exact(self.element_size())
            .map(|chunk| match self {
                BufferKind::ArrayBuffer
                | BufferKind::DataView
                | BufferKind::Uint8Array
                | BufferKind::Uint8ClampedArray => Value::Number(f64::from(chunk[0])),
                BufferKind::Int8Array => Value::Number(f64::from(chunk[0] as i8)),
                BufferKind::Int16Array => Value::Number(f64::from(i16::from_le_bytes(le(chunk)))),
                BufferKind::Uint16Array => Value::Number(f64::from(u16::from_le_bytes(le(chunk)))),
                BufferKind::Int32Array => Value::Number(f64::from(i32::from_le_bytes(le(chunk)))),
                BufferKind::Uint32Array => Value::Number(f64::from(u32::from_le_bytes(le(chunk)))),
                BufferKind::Float32Array => Value::Number(f64::from(f32::from_le_bytes(le(chunk)))),
                BufferKind::Float64Array => Value::Number(f64::from_le_bytes(le(chunk))),
                BufferKind::BigInt64Array => Value::BigInt(i128::from(i64::from_le_bytes(le(chunk)))),
                BufferKind::BigUint64Array => Value::BigInt(i128::from(u64::from_le_bytes(le(chunk)))),
            })
            .collect()
    }
}

// `chunks_exact` guarantees the chunk length matches N.
fn le<const N: usize>(chunk: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(chunk);
    buf
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settlement state of a promise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromiseState {
    Pending,
    Fulfilled,
    Rejected,
}

impl PromiseState {
    pub fn as_str(self) -> &'static str {
        match self {
            PromiseState::Pending => "pending",
            PromiseState::Fulfilled => "fulfilled",
            PromiseState::Rejected => "rejected",
        }
    }
}

/// Failure to produce a textual form for a foreign object.
#[derive(Debug, Clone, Error)]
pub enum DescribeError {
    #[error("{0} has no textual representation")]
    Unsupported(String),
    #[error("describe failed: {0}")]
    Failed(String),
}

/// An embedder-provided object the heap knows nothing about.
///
/// Foreign objects always classify as unknown; the inspector shows
/// whatever [`describe`](ForeignObject::describe) returns, or a fixed
/// placeholder when it fails.
pub trait ForeignObject: fmt::Debug + Send + Sync {
    /// Host type tag (e.g. `"WebSocket"`).
    fn type_name(&self) -> &str;

    /// Textual fallback representation.
    fn describe(&self) -> Result<String, DescribeError>;
}

/// The structural tag of a heap object.
#[derive(Debug, Clone)]
pub enum ObjectKind {
    /// Plain objects, class instances and prototypes.
    Ordinary,
    Array(Vec<Value>),
    Function { name: String },
    Map(Vec<(Value, Value)>),
    Set(Vec<Value>),
    /// `None` is an invalid date.
    Date(Option<DateTime<Utc>>),
    RegExp { source: String, flags: String },
    Error { name: String, message: String },
    Promise(PromiseState),
    WeakMap,
    WeakSet,
    Buffer { kind: BufferKind, bytes: Vec<u8> },
    Foreign(Arc<dyn ForeignObject>),
}

impl ObjectKind {
    /// Host-style tag, as in `[object <tag>]`.
    pub fn tag(&self) -> &str {
        match self {
            ObjectKind::Ordinary => "Object",
            ObjectKind::Array(_) => "Array",
            ObjectKind::Function { .. } => "Function",
            ObjectKind::Map(_) => "Map",
            ObjectKind::Set(_) => "Set",
            ObjectKind::Date(_) => "Date",
            ObjectKind::RegExp { .. } => "RegExp",
            ObjectKind::Error { .. } => "Error",
            ObjectKind::Promise(_) => "Promise",
            ObjectKind::WeakMap => "WeakMap",
            ObjectKind::WeakSet => "WeakSet",
            ObjectKind::Buffer { kind, .. } => kind.name(),
            ObjectKind::Foreign(foreign) => foreign.type_name(),
        }
    }
}

/// One heap object: its kind, prototype link and own properties.
#[derive(Debug, Clone)]
pub struct Object {
    pub kind: ObjectKind,
    pub prototype: Option<ObjectId>,
    /// Set on prototype objects: the name of the constructor they belong to.
    pub constructor: Option<String>,
    properties: Vec<(String, Value)>,
}

impl Object {
    pub fn new(kind: ObjectKind, prototype: Option<ObjectId>) -> Self {
        Self {
            kind,
            prototype,
            constructor: None,
            properties: Vec::new(),
        }
    }

    /// Own property names in insertion order.
    pub fn own_keys(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(key, _)| key.as_str())
    }

    pub fn own_properties(&self) -> &[(String, Value)] {
        &self.properties
    }

    pub fn get_own(&self, key: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert or overwrite. Overwriting keeps the original position.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.properties.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.properties.push((key, value)),
        }
    }
}

/// Arena of inspectable objects.
#[derive(Debug, Clone)]
pub struct Heap {
    objects: Vec<Object>,
    base: ObjectId,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    /// Create a heap holding only the base prototype.
    pub fn new() -> Self {
        let mut base = Object::new(ObjectKind::Ordinary, None);
        base.constructor = Some("Object".to_string());
        Self {
            objects: vec![base],
            base: ObjectId(0),
        }
    }

    /// The universal base prototype every plain object links to.
    pub fn base_prototype(&self) -> ObjectId {
        self.base
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.index())
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id.index())
    }

    pub fn alloc(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(object);
        id
    }

    fn alloc_kind(&mut self, kind: ObjectKind) -> ObjectId {
        let base = self.base;
        self.alloc(Object::new(kind, Some(base)))
    }

    // ------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------

    /// An empty plain object.
    pub fn object(&mut self) -> ObjectId {
        self.alloc_kind(ObjectKind::Ordinary)
    }

    /// A plain object with the given properties, in order.
    pub fn object_from<K: Into<String>>(
        &mut self,
        properties: impl IntoIterator<Item = (K, Value)>,
    ) -> ObjectId {
        let id = self.object();
        for (key, value) in properties {
            self.set_property(id, key, value);
        }
        id
    }

    /// A plain object with no prototype at all.
    pub fn null_prototype_object(&mut self) -> ObjectId {
        self.alloc(Object::new(ObjectKind::Ordinary, None))
    }

    /// Set an own property. Returns false if `id` is not in this heap.
    pub fn set_property(&mut self, id: ObjectId, key: impl Into<String>, value: Value) -> bool {
        match self.get_mut(id) {
            Some(object) => {
                object.set(key, value);
                true
            }
            None => false,
        }
    }

    pub fn array_of(&mut self, items: impl IntoIterator<Item = Value>) -> ObjectId {
        self.alloc_kind(ObjectKind::Array(items.into_iter().collect()))
    }

    /// Append to an array. Returns false if `array` is not an array.
    pub fn push(&mut self, array: ObjectId, value: Value) -> bool {
        match self.get_mut(array).map(|o| &mut o.kind) {
            Some(ObjectKind::Array(items)) => {
                items.push(value);
                true
            }
            _ => false,
        }
    }

    pub fn map_of(&mut self, entries: impl IntoIterator<Item = (Value, Value)>) -> ObjectId {
        self.alloc_kind(ObjectKind::Map(entries.into_iter().collect()))
    }

    pub fn set_of(&mut self, members: impl IntoIterator<Item = Value>) -> ObjectId {
        self.alloc_kind(ObjectKind::Set(members.into_iter().collect()))
    }

    /// Add a member to a set. Members are compared by value for
    /// primitives and by identity for objects.
    pub fn insert_member(&mut self, set: ObjectId, value: Value) -> bool {
        match self.get_mut(set).map(|o| &mut o.kind) {
            Some(ObjectKind::Set(members)) => {
                if !members.contains(&value) {
                    members.push(value);
                }
                true
            }
            _ => false,
        }
    }

    pub fn date(&mut self, at: Option<DateTime<Utc>>) -> ObjectId {
        self.alloc_kind(ObjectKind::Date(at))
    }

    pub fn regexp(&mut self, source: impl Into<String>, flags: impl Into<String>) -> ObjectId {
        self.alloc_kind(ObjectKind::RegExp {
            source: source.into(),
            flags: flags.into(),
        })
    }

    pub fn error(&mut self, name: impl Into<String>, message: impl Into<String>) -> ObjectId {
        self.alloc_kind(ObjectKind::Error {
            name: name.into(),
            message: message.into(),
        })
    }

    pub fn promise(&mut self, state: PromiseState) -> ObjectId {
        self.alloc_kind(ObjectKind::Promise(state))
    }

    pub fn weak_map(&mut self) -> ObjectId {
        self.alloc_kind(ObjectKind::WeakMap)
    }

    pub fn weak_set(&mut self) -> ObjectId {
        self.alloc_kind(ObjectKind::WeakSet)
    }

    pub fn buffer(&mut self, kind: BufferKind, bytes: impl Into<Vec<u8>>) -> ObjectId {
        self.alloc_kind(ObjectKind::Buffer {
            kind,
            bytes: bytes.into(),
        })
    }

    pub fn foreign(&mut self, foreign: Arc<dyn ForeignObject>) -> ObjectId {
        self.alloc_kind(ObjectKind::Foreign(foreign))
    }

    /// A function with its intrinsic `length`, `name` and `prototype` slots.
    pub fn function(&mut self, name: impl Into<String>, arity: usize) -> ObjectId {
        let name = name.into();
        let prototype = self.object();
        let id = self.alloc_kind(ObjectKind::Function { name: name.clone() });
        self.set_property(id, "length", Value::Number(arity as f64));
        self.set_property(id, "name", Value::String(name));
        self.set_property(id, "prototype", Value::Object(prototype));
        id
    }

    /// Register a class: a prototype object named `name` whose parent is
    /// `parent`, or the base prototype.
    pub fn define_class(&mut self, name: impl Into<String>, parent: Option<ObjectId>) -> ObjectId {
        let parent = parent.unwrap_or(self.base);
        let mut prototype = Object::new(ObjectKind::Ordinary, Some(parent));
        prototype.constructor = Some(name.into());
        self.alloc(prototype)
    }

    /// Declare a method on a class prototype. Returns the function.
    pub fn define_method(&mut self, class: ObjectId, name: &str) -> ObjectId {
        let method = self.function(name, 0);
        self.set_property(class, name, Value::Object(method));
        method
    }

    /// A new, empty instance of `class`.
    pub fn instantiate(&mut self, class: ObjectId) -> ObjectId {
        self.alloc(Object::new(ObjectKind::Ordinary, Some(class)))
    }

    // ------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------

    /// Prototypes of `id`, nearest first. Bounded by the heap size so a
    /// prototype loop cannot spin forever.
    pub fn prototype_chain(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut chain = Vec::new();
        let mut next = self.get(id).and_then(|o| o.prototype);
        while let Some(proto) = next {
            if chain.len() >= self.objects.len() || chain.contains(&proto) {
                break;
            }
            chain.push(proto);
            next = self.get(proto).and_then(|o| o.prototype);
        }
        chain
    }

    /// Property lookup through the prototype chain (own first).
    pub fn lookup(&self, id: ObjectId, key: &str) -> Option<&Value> {
        std::iter::once(id)
            .chain(self.prototype_chain(id))
            .find_map(|link| self.get(link).and_then(|o| o.get_own(key)))
    }

    /// Nearest constructor name, starting at the object itself.
    pub fn constructor_name(&self, id: ObjectId) -> Option<&str> {
        std::iter::once(id)
            .chain(self.prototype_chain(id))
            .find_map(|link| self.get(link).and_then(|o| o.constructor.as_deref()))
    }

    /// String form of a value used as a key (map entries, set members).
    pub fn key_string(&self, value: &Value) -> String {
        match value {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::BigInt(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Symbol(sym) => sym.to_string(),
            Value::Object(id) => match self.get(*id) {
                Some(object) => format!("[object {}]", object.kind.tag()),
                None => "[object Unknown]".to_string(),
            },
        }
    }

    // ------------------------------------------------------------
    // JSON import
    // ------------------------------------------------------------

    /// Import a JSON document. Arrays and objects become heap objects;
    /// object keys keep their document order.
    pub fn from_json(&mut self, json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                let values: Vec<Value> = items.iter().map(|item| self.from_json(item)).collect();
                Value::Object(self.array_of(values))
            }
            serde_json::Value::Object(map) => {
                let id = self.object();
                for (key, item) in map {
                    let value = self.from_json(item);
                    self.set_property(id, key.as_str(), value);
                }
                Value::Object(id)
            }
        }
    }
}
