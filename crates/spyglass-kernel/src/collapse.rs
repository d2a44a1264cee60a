//! Per-path collapse state.
//!
//! The store holds a set of *flagged* paths: paths toggled away from the
//! default. In forward mode the default is expanded, so flagged means
//! collapsed; in reversed mode (collapse everything) flagged means
//! expanded. Every path's flag is independent: collapsing an ancestor
//! hides descendants on screen but never touches their flags.

use std::collections::HashSet;

use spyglass_types::NodePath;

use crate::config::{CollapsePolicy, InspectorConfig};
use crate::error::InspectResult;

/// What an unflagged path means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultMode {
    /// Unflagged paths are expanded.
    #[default]
    Forward,
    /// Unflagged paths are collapsed.
    Reversed,
}

/// A direct child of the root: its display key and path.
pub type RootChild = (String, NodePath);

#[derive(Debug, Clone, Default)]
pub struct CollapseStore {
    mode: DefaultMode,
    flagged: HashSet<NodePath>,
}

impl CollapseStore {
    /// Forward mode, nothing flagged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current state with what `policy` prescribes for a root
    /// whose direct children are `root_children`.
    pub fn configure(&mut self, policy: &CollapsePolicy, root_children: &[RootChild]) {
        self.flagged.clear();
        self.mode = DefaultMode::Forward;

        match policy {
            CollapsePolicy::None => {}
            CollapsePolicy::All => self.mode = DefaultMode::Reversed,
            CollapsePolicy::Top => {
                self.flagged
                    .extend(root_children.iter().map(|(_, path)| path.clone()));
            }
            CollapsePolicy::Listed(keys) => {
                // flagged by name so keys the root gains later still collapse
                let root = NodePath::root();
                self.flagged.extend(keys.iter().map(|key| root.key(key)));
                // index-addressed children (array roots) live at `$[i]`
                self.flagged.extend(
                    root_children
                        .iter()
                        .filter(|(key, _)| keys.contains(key))
                        .map(|(_, path)| path.clone()),
                );
            }
            CollapsePolicy::Except(keys) => {
                self.flagged.extend(
                    root_children
                        .iter()
                        .filter(|(key, _)| !keys.contains(key))
                        .map(|(_, path)| path.clone()),
                );
            }
        }
        tracing::debug!(mode = ?self.mode, flagged = self.flagged.len(), "collapse store configured");
    }

    /// Configure from caller options.
    ///
    /// An unrecognized option is logged and returned, and the store is left
    /// collapsing nothing.
    pub fn apply_config(
        &mut self,
        config: &InspectorConfig,
        root_children: &[RootChild],
    ) -> InspectResult<()> {
        match config.policy() {
            Ok(policy) => {
                self.configure(&policy, root_children);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("{}; nothing will be collapsed", e);
                self.configure(&CollapsePolicy::None, root_children);
                Err(e)
            }
        }
    }

    pub fn mode(&self) -> DefaultMode {
        self.mode
    }

    pub fn is_flagged(&self, path: &NodePath) -> bool {
        self.flagged.contains(path)
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged.len()
    }

    pub fn is_collapsed(&self, path: &NodePath) -> bool {
        match self.mode {
            DefaultMode::Forward => self.is_flagged(path),
            DefaultMode::Reversed => !self.is_flagged(path),
        }
    }

    /// Flip the flag for `path` alone and return its new collapsed state.
    pub fn toggle(&mut self, path: &NodePath) -> bool {
        if !self.flagged.remove(path) {
            self.flagged.insert(path.clone());
        }
        self.is_collapsed(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_children(keys: &[&str]) -> Vec<RootChild> {
        keys.iter()
            .map(|k| (k.to_string(), NodePath::root().key(k)))
            .collect()
    }

    #[test]
    fn new_store_expands_everything() {
        let store = CollapseStore::new();
        assert_eq!(store.mode(), DefaultMode::Forward);
        assert!(!store.is_collapsed(&NodePath::root()));
        assert!(!store.is_collapsed(&NodePath::root().key("a")));
    }

    #[test]
    fn toggle_twice_restores() {
        let mut store = CollapseStore::new();
        let path = NodePath::root().key("a");
        assert!(store.toggle(&path));
        assert!(!store.toggle(&path));
        assert!(!store.is_collapsed(&path));
        assert_eq!(store.flagged_count(), 0);
    }

    #[test]
    fn toggle_is_per_path() {
        let mut store = CollapseStore::new();
        let parent = NodePath::root().key("a");
        let child = parent.key("b");
        store.toggle(&parent);
        assert!(store.is_collapsed(&parent));
        assert!(!store.is_collapsed(&child));
        assert!(!store.is_collapsed(&NodePath::root()));
    }

    #[test]
    fn reversed_mode_inverts_flags() {
        let mut store = CollapseStore::new();
        store.configure(&CollapsePolicy::All, &root_children(&["a"]));
        let path = NodePath::root().key("a");
        assert!(store.is_collapsed(&NodePath::root()));
        assert!(store.is_collapsed(&path));
        assert!(!store.toggle(&path));
        assert!(store.is_flagged(&path));
        assert!(store.is_collapsed(&path.key("deeper")));
    }

    #[test]
    fn top_flags_root_children_only() {
        let mut store = CollapseStore::new();
        store.configure(&CollapsePolicy::Top, &root_children(&["a", "b"]));
        assert!(store.is_collapsed(&NodePath::root().key("a")));
        assert!(store.is_collapsed(&NodePath::root().key("b")));
        assert!(!store.is_collapsed(&NodePath::root()));
        assert!(!store.is_collapsed(&NodePath::root().key("a").key("x")));
    }

    #[test]
    fn listed_and_except_are_complements() {
        let children = root_children(&["a", "b", "c"]);
        let keys = vec!["b".to_string()];

        let mut listed = CollapseStore::new();
        listed.configure(&CollapsePolicy::Listed(keys.clone()), &children);
        let mut except = CollapseStore::new();
        except.configure(&CollapsePolicy::Except(keys), &children);

        for (_, path) in &children {
            assert_ne!(listed.is_collapsed(path), except.is_collapsed(path), "{path}");
        }
        assert!(listed.is_collapsed(&NodePath::root().key("b")));
    }

    #[test]
    fn listed_keys_apply_before_the_root_has_them() {
        let mut store = CollapseStore::new();
        store.configure(
            &CollapsePolicy::Listed(vec!["b".to_string()]),
            &root_children(&["a"]),
        );
        assert!(store.is_collapsed(&NodePath::root().key("b")));
        assert!(!store.is_collapsed(&NodePath::root().key("a")));
    }

    #[test]
    fn listed_index_keys_match_array_children() {
        let children = vec![
            ("0".to_string(), NodePath::root().index(0)),
            ("1".to_string(), NodePath::root().index(1)),
        ];
        let mut store = CollapseStore::new();
        store.configure(&CollapsePolicy::Listed(vec!["1".to_string()]), &children);
        assert!(store.is_collapsed(&NodePath::root().index(1)));
        assert!(!store.is_collapsed(&NodePath::root().index(0)));
    }

    #[test]
    fn unrecognized_config_falls_back() {
        let mut store = CollapseStore::new();
        store.configure(&CollapsePolicy::All, &[]);

        let config = InspectorConfig::from_json_str(r#"{"collapse": "sideways"}"#).expect("parse");
        assert!(store.apply_config(&config, &root_children(&["a"])).is_err());
        assert_eq!(store.mode(), DefaultMode::Forward);
        assert!(!store.is_collapsed(&NodePath::root().key("a")));
    }
}
