//! Node descriptors: the classified tree handed to a renderer.
//!
//! A renderer walks `NodeDescriptor`s and paints them. Everything it needs
//! to decide *how* to paint is here: the variant, a display payload, the
//! node's collapse flag and its children (or the fact that it has none).

use serde::Serialize;

use crate::kind::ValueKind;
use crate::path::NodePath;
use crate::value::Value;

/// The content of a node below its header line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "body", content = "entries", rename_all = "lowercase")]
pub enum NodeBody {
    /// Not a container (primitives, dates, circular markers, ...).
    Leaf,
    /// A container with nothing in it. Rendered as an explicit empty node
    /// rather than an empty table.
    Empty,
    /// Container members in display order.
    Entries(Vec<ChildEntry>),
}

/// One member of a container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildEntry {
    /// Display key (member name, index, stringified map key).
    pub key: String,
    /// The member value itself, for renderers that expand lazily.
    #[serde(skip)]
    pub value: Value,
    pub path: NodePath,
    /// The child's collapse flag at description time.
    pub collapsed: bool,
    /// `None` when the child is a collapsed object: a placeholder that was
    /// not descended into.
    pub node: Option<NodeDescriptor>,
}

impl ChildEntry {
    pub fn is_deferred(&self) -> bool {
        self.node.is_none()
    }
}

/// A classified node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDescriptor {
    pub path: NodePath,
    pub kind: ValueKind,
    /// Display payload: primitive text, class name, `Array(3)`, ...
    pub text: String,
    pub collapsed: bool,
    pub body: NodeBody,
}

impl NodeDescriptor {
    /// A childless node.
    pub fn leaf(path: NodePath, kind: ValueKind, text: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            text: text.into(),
            collapsed: false,
            body: NodeBody::Leaf,
        }
    }

    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    /// Attach children. An empty list becomes [`NodeBody::Empty`].
    pub fn with_entries(mut self, entries: Vec<ChildEntry>) -> Self {
        self.body = if entries.is_empty() {
            NodeBody::Empty
        } else {
            NodeBody::Entries(entries)
        };
        self
    }

    pub fn entries(&self) -> &[ChildEntry] {
        match &self.body {
            NodeBody::Entries(entries) => entries,
            NodeBody::Leaf | NodeBody::Empty => &[],
        }
    }

    pub fn is_empty_container(&self) -> bool {
        self.body == NodeBody::Empty
    }

    /// Find a described node by path, searching this subtree.
    pub fn find(&self, path: &str) -> Option<&NodeDescriptor> {
        if self.path == path {
            return Some(self);
        }
        self.entries()
            .iter()
            .filter_map(|entry| entry.node.as_ref())
            .find_map(|node| node.find(path))
    }

    /// Every described path in this subtree, depth first.
    pub fn paths(&self) -> Vec<NodePath> {
        let mut out = vec![self.path.clone()];
        for node in self.entries().iter().filter_map(|e| e.node.as_ref()) {
            out.extend(node.paths());
        }
        out
    }

    /// Plain-text outline, one node per line, two spaces per level:
    ///
    /// ```text
    /// $ PlainObject Object
    ///   x: $.x Number 1
    ///   y: $.y Array Array(2) [collapsed]
    /// ```
    ///
    /// Empty containers end in `{}`; deferred children print `…`.
    pub fn to_outline(&self) -> String {
        let mut lines = Vec::new();
        self.outline_into(None, 0, &mut lines);
        lines.join("\n")
    }

    fn outline_into(&self, key: Option<&str>, depth: usize, lines: &mut Vec<String>) {
        let indent = "  ".repeat(depth);
        let label = key.map(|k| format!("{}: ", k)).unwrap_or_default();
        let mut line = format!("{}{}{} {} {}", indent, label, self.path, self.kind, self.text);
        if self.is_empty_container() {
            line.push_str(" {}");
        }
        if self.collapsed {
            line.push_str(" [collapsed]");
        }
        lines.push(line);

        for entry in self.entries() {
            match &entry.node {
                Some(node) => node.outline_into(Some(&entry.key), depth + 1, lines),
                None => lines.push(format!("{}  {}: {} …", indent, entry.key, entry.path)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(path: NodePath, n: &str) -> NodeDescriptor {
        NodeDescriptor::leaf(path, ValueKind::Number, n)
    }

    fn entry(key: &str, node: NodeDescriptor) -> ChildEntry {
        ChildEntry {
            key: key.to_string(),
            value: Value::Undefined,
            path: node.path.clone(),
            collapsed: node.collapsed,
            node: Some(node),
        }
    }

    #[test]
    fn empty_entries_become_empty_body() {
        let node = NodeDescriptor::leaf(NodePath::root(), ValueKind::Array, "Array(0)")
            .with_entries(Vec::new());
        assert!(node.is_empty_container());
        assert!(node.entries().is_empty());
    }

    #[test]
    fn find_and_paths() {
        let root = NodePath::root();
        let inner = NodeDescriptor::leaf(root.key("y"), ValueKind::Array, "Array(1)")
            .with_entries(vec![entry("0", number(root.key("y").index(0), "2"))]);
        let tree = NodeDescriptor::leaf(root.clone(), ValueKind::PlainObject, "Object")
            .with_entries(vec![entry("x", number(root.key("x"), "1")), entry("y", inner)]);

        assert_eq!(tree.find("$.y[0]").map(|n| n.text.as_str()), Some("2"));
        assert!(tree.find("$.z").is_none());
        let paths: Vec<String> = tree.paths().iter().map(|p| p.to_string()).collect();
        assert_eq!(paths, ["$", "$.x", "$.y", "$.y[0]"]);
    }

    #[test]
    fn outline_marks_deferred_and_empty() {
        let root = NodePath::root();
        let deferred = ChildEntry {
            key: "big".to_string(),
            value: Value::Undefined,
            path: root.key("big"),
            collapsed: true,
            node: None,
        };
        let empty = NodeDescriptor::leaf(root.key("none"), ValueKind::PlainObject, "Object")
            .with_entries(Vec::new());
        let tree = NodeDescriptor::leaf(root, ValueKind::PlainObject, "Object")
            .with_entries(vec![deferred, entry("none", empty)]);

        assert!(tree.entries()[0].is_deferred());
        assert_eq!(
            tree.to_outline(),
            "$ PlainObject Object\n  big: $.big …\n  none: $.none PlainObject Object {}"
        );
    }

    #[test]
    fn serializes_body_tag() {
        let node = NodeDescriptor::leaf(NodePath::root(), ValueKind::Null, "null");
        let json = serde_json::to_value(&node).expect("serialize");
        assert_eq!(json["path"], "$");
        assert_eq!(json["body"]["body"], "leaf");
    }
}
