//! The inspection engine.
//!
//! An [`Inspector`] owns the per-pass identity record and the long-lived
//! collapse state. It walks a value, classifying each node, cutting cycles,
//! and deferring collapsed object children so a renderer can expand them
//! later with [`Inspector::describe`].

use spyglass_types::{ChildEntry, Heap, NodeDescriptor, NodePath, ObjectId, Value, ValueKind};

use crate::classify::{children, classify, display_text, CIRCULAR};
use crate::collapse::{CollapseStore, RootChild};
use crate::config::InspectorConfig;
use crate::cycle::CycleDetector;
use crate::error::InspectResult;

#[derive(Debug, Clone, Default)]
pub struct Inspector {
    cycles: CycleDetector,
    collapse: CollapseStore,
    /// Objects on the current descent. Set members share their parent's
    /// path, so a set reached again inside itself never looks like a
    /// descendant to the path check; this catches it.
    descent: Vec<ObjectId>,
}

impl Inspector {
    /// An inspector that collapses nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and configure in one step.
    ///
    /// A bad option is logged and otherwise ignored; use
    /// [`Inspector::configure`] to receive it.
    pub fn with_config(config: &InspectorConfig, heap: &Heap, root: &Value) -> Self {
        let mut inspector = Self::new();
        // already logged by the collapse store
        let _ = inspector.configure(config, heap, root);
        inspector
    }

    /// Set up collapse state for `root` from caller options.
    ///
    /// On an unrecognized option the error is returned, but the inspector
    /// stays usable and collapses nothing.
    pub fn configure(&mut self, config: &InspectorConfig, heap: &Heap, root: &Value) -> InspectResult<()> {
        let root_path = NodePath::root();
        let kind = classify(heap, root);
        let root_children: Vec<RootChild> = children(heap, root, kind, &root_path)
            .into_iter()
            .map(|child| (child.key, child.path))
            .collect();
        self.collapse.apply_config(config, &root_children)
    }

    /// Describe `root` from scratch: the identity record is reset first.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn inspect(&mut self, heap: &Heap, root: &Value) -> NodeDescriptor {
        self.reset();
        self.describe(heap, root, &NodePath::root())
    }

    /// Describe `value` located at `path`.
    ///
    /// Call this without a reset to expand a deferred child: the identity
    /// record still knows the child's ancestors, so cycles through them are
    /// caught.
    pub fn describe(&mut self, heap: &Heap, value: &Value, path: &NodePath) -> NodeDescriptor {
        let on_descent = value
            .as_object()
            .is_some_and(|id| self.descent.contains(&id));
        if self.cycles.check(value, path) || on_descent {
            return NodeDescriptor::leaf(path.clone(), ValueKind::CircularReference, CIRCULAR);
        }

        let kind = classify(heap, value);
        let text = display_text(heap, value, kind);
        tracing::trace!(path = %path, kind = %kind, "classified");

        let node = NodeDescriptor::leaf(path.clone(), kind, text);
        if !kind.is_compound() {
            return node;
        }
        let node = node.with_collapsed(self.collapse.is_collapsed(path));

        let id = value.as_object();
        if let Some(id) = id {
            self.descent.push(id);
        }
        let entries: Vec<ChildEntry> = children(heap, value, kind, path)
            .into_iter()
            .map(|child| {
                let collapsed = self.collapse.is_collapsed(&child.path);
                let node = if collapsed && child.value.is_object() {
                    None
                } else {
                    Some(self.describe(heap, &child.value, &child.path))
                };
                ChildEntry {
                    key: child.key,
                    value: child.value,
                    path: child.path,
                    collapsed,
                    node,
                }
            })
            .collect();
        if id.is_some() {
            self.descent.pop();
        }

        node.with_entries(entries)
    }

    /// Flip the collapse flag of `path` and return the new state.
    pub fn toggle(&mut self, path: &NodePath) -> bool {
        self.collapse.toggle(path)
    }

    pub fn is_collapsed(&self, path: &NodePath) -> bool {
        self.collapse.is_collapsed(path)
    }

    /// Forget object identities. Collapse state is kept.
    pub fn reset(&mut self) {
        self.cycles.reset();
        self.descent.clear();
    }

    pub fn cycles(&self) -> &CycleDetector {
        &self.cycles
    }

    pub fn collapse_store(&self) -> &CollapseStore {
        &self.collapse
    }
}
