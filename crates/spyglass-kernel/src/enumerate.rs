//! Member listing for instance-like and function-like objects.

use std::collections::HashSet;

use spyglass_types::{Heap, ObjectId};

/// Own slots every function carries that are host plumbing, not data.
pub const FUNCTION_INTRINSICS: [&str; 5] = ["length", "name", "arguments", "caller", "prototype"];

/// Own property names of a function, minus the intrinsic slots, in host
/// order.
pub fn function_members(heap: &Heap, id: ObjectId) -> Vec<String> {
    let Some(object) = heap.get(id) else {
        return Vec::new();
    };
    object
        .own_keys()
        .filter(|key| !FUNCTION_INTRINSICS.contains(key))
        .map(str::to_string)
        .collect()
}

/// Member names of an instance.
///
/// The instance's own names come first, followed by the names declared
/// along its prototype chain (excluding the base prototype), ordered from
/// the most basic class to the most derived, each name listed once at the
/// position it was first declared.
pub fn instance_members(heap: &Heap, id: ObjectId) -> Vec<String> {
    let Some(object) = heap.get(id) else {
        return Vec::new();
    };
    let base = heap.base_prototype();

    // derived -> base
    let levels: Vec<Vec<&str>> = heap
        .prototype_chain(id)
        .into_iter()
        .take_while(|proto| *proto != base)
        .filter_map(|proto| heap.get(proto))
        .map(|proto| proto.own_keys().collect())
        .collect();

    let mut seen = HashSet::new();
    let inherited = levels
        .into_iter()
        .rev()
        .flatten()
        .filter(|name| seen.insert(*name));

    object
        .own_keys()
        .chain(inherited)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spyglass_types::Value;

    #[test]
    fn function_members_drop_intrinsics() {
        let mut heap = Heap::new();
        let f = heap.function("handler", 1);
        heap.set_property(f, "displayName", Value::string("Handler"));
        heap.set_property(f, "caller", Value::Null);
        heap.set_property(f, "cache", Value::Null);
        assert_eq!(function_members(&heap, f), ["displayName", "cache"]);
    }

    #[test]
    fn function_without_extras_has_no_members() {
        let mut heap = Heap::new();
        let f = heap.function("f", 0);
        assert!(function_members(&heap, f).is_empty());
    }

    #[test]
    fn three_level_hierarchy_reads_base_first() {
        let mut heap = Heap::new();
        let base = heap.define_class("Base", None);
        heap.define_method(base, "a");
        let middle = heap.define_class("Middle", Some(base));
        heap.define_method(middle, "b");
        let derived = heap.define_class("Derived", Some(middle));
        heap.define_method(derived, "a");
        heap.define_method(derived, "c");

        let instance = heap.instantiate(derived);
        assert_eq!(instance_members(&heap, instance), ["a", "b", "c"]);
    }

    #[test]
    fn own_members_come_first() {
        let mut heap = Heap::new();
        let class = heap.define_class("Point", None);
        heap.define_method(class, "norm");
        let p = heap.instantiate(class);
        heap.set_property(p, "x", Value::from(1));
        heap.set_property(p, "y", Value::from(2));
        assert_eq!(instance_members(&heap, p), ["x", "y", "norm"]);
    }

    #[test]
    fn plain_object_has_only_own_members() {
        let mut heap = Heap::new();
        let obj = heap.object_from([("k", Value::Null)]);
        assert_eq!(instance_members(&heap, obj), ["k"]);
    }

    #[test]
    fn dangling_id_has_no_members() {
        let heap = Heap::new();
        assert!(instance_members(&heap, ObjectId::from_raw(42)).is_empty());
        assert!(function_members(&heap, ObjectId::from_raw(42)).is_empty());
    }
}
