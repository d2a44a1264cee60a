//! Node addressing.
//!
//! A [`NodePath`] is the string address of a node, built from the root
//! sentinel by appending accessors:
//!
//! | Accessor | Appends |
//! |----------|---------|
//! | member key | `.key` |
//! | index | `[3]` |
//! | map entry | `.stringified-key` |
//!
//! Set members reuse the parent path. Keys are not escaped, so a key
//! containing `.` or `[` cannot be told apart from deeper nesting.

use std::fmt;

use serde::Serialize;

/// The root sentinel.
pub const ROOT: &str = "$";

/// One step from a parent node to a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    /// Object or instance member.
    Key(String),
    /// Array or buffer element.
    Index(usize),
    /// Map entry, keyed by the entry key's string form.
    Entry(String),
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Key(key) | Accessor::Entry(key) => write!(f, ".{}", key),
            Accessor::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Address of a node inside an inspected value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodePath(String);

impl NodePath {
    pub fn root() -> Self {
        Self(ROOT.to_string())
    }

    /// Wrap an already-built path string.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT
    }

    pub fn child(&self, accessor: &Accessor) -> NodePath {
        NodePath(format!("{}{}", self.0, accessor))
    }

    pub fn key(&self, key: &str) -> NodePath {
        self.child(&Accessor::Key(key.to_string()))
    }

    pub fn index(&self, index: usize) -> NodePath {
        self.child(&Accessor::Index(index))
    }

    pub fn entry(&self, key: &str) -> NodePath {
        self.child(&Accessor::Entry(key.to_string()))
    }

    /// True if `other` lies strictly below `self`: it starts with this path
    /// immediately followed by a child separator.
    pub fn is_ancestor_of(&self, other: &NodePath) -> bool {
        other
            .0
            .strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('['))
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NodePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodePath {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodePath {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
