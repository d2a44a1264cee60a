//! Circular reference detection.
//!
//! Identity alone cannot tell a shared sub-object (reachable from two
//! sibling locations) from an object that contains itself. The detector
//! remembers, per object, every path it was seen at during the current
//! pass, and uses path structure to decide: reappearing *below* an earlier
//! sighting is a cycle, reappearing at the *same* path is a re-visit, and
//! anything else is sharing.

use std::collections::HashMap;

use spyglass_types::{NodePath, ObjectId, Value};

#[derive(Debug, Clone, Default)]
pub struct CycleDetector {
    seen: HashMap<ObjectId, Vec<NodePath>>,
}

impl CycleDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `value` at `path` is a circular reference and
    /// traversal must stop there.
    ///
    /// Primitives never participate. A circular sighting is not recorded.
    pub fn check(&mut self, value: &Value, path: &NodePath) -> bool {
        let Some(id) = value.as_object() else {
            return false;
        };

        let recorded = self.seen.entry(id).or_default();
        for earlier in recorded.iter() {
            if earlier == path {
                return false;
            }
            if earlier.is_ancestor_of(path) {
                tracing::debug!(object = %id, at = %path, first_seen = %earlier, "circular reference");
                return true;
            }
        }

        recorded.push(path.clone());
        false
    }

    /// Paths `id` has been recorded at, in insertion order.
    pub fn observed(&self, id: ObjectId) -> &[NodePath] {
        self.seen.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct objects recorded this pass.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Forget everything. Call between independent passes.
    pub fn reset(&mut self) {
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(raw: u32) -> Value {
        Value::Object(ObjectId::from_raw(raw))
    }

    #[test]
    fn primitives_are_ignored() {
        let mut detector = CycleDetector::new();
        let root = NodePath::root();
        assert!(!detector.check(&Value::from(1), &root));
        assert!(!detector.check(&Value::Null, &root.key("a")));
        assert!(detector.is_empty());
    }

    #[test]
    fn first_sighting_is_recorded() {
        let mut detector = CycleDetector::new();
        let root = NodePath::root();
        assert!(!detector.check(&obj(1), &root));
        assert_eq!(detector.observed(ObjectId::from_raw(1)), &[root]);
    }

    #[test]
    fn same_path_is_a_revisit() {
        let mut detector = CycleDetector::new();
        let path = NodePath::root().key("a");
        assert!(!detector.check(&obj(1), &path));
        assert!(!detector.check(&obj(1), &path));
        assert_eq!(detector.observed(ObjectId::from_raw(1)).len(), 1);
    }

    #[test]
    fn descendant_sighting_is_circular() {
        let mut detector = CycleDetector::new();
        let root = NodePath::root();
        assert!(!detector.check(&obj(1), &root));
        assert!(!detector.check(&obj(2), &root.key("child")));
        assert!(detector.check(&obj(1), &root.key("child").key("parent")));
        // the circular path is not recorded
        assert_eq!(detector.observed(ObjectId::from_raw(1)).len(), 1);
    }

    #[test]
    fn sibling_sighting_is_sharing() {
        let mut detector = CycleDetector::new();
        let root = NodePath::root();
        assert!(!detector.check(&obj(5), &root.key("left")));
        assert!(!detector.check(&obj(5), &root.key("right")));
        assert_eq!(
            detector.observed(ObjectId::from_raw(5)),
            &[root.key("left"), root.key("right")]
        );
        // under either recorded location it is a cycle
        assert!(detector.check(&obj(5), &root.key("right").index(0)));
    }

    #[test]
    fn prefix_without_separator_is_not_an_ancestor() {
        let mut detector = CycleDetector::new();
        let root = NodePath::root();
        assert!(!detector.check(&obj(1), &root.key("a")));
        assert!(!detector.check(&obj(1), &root.key("ab")));
    }

    #[test]
    fn reset_forgets() {
        let mut detector = CycleDetector::new();
        let root = NodePath::root();
        detector.check(&obj(1), &root);
        detector.reset();
        assert!(detector.is_empty());
        assert!(!detector.check(&obj(1), &root.key("x")));
    }
}
