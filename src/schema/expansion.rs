use crate::schema::{NodePath, SchemaTree};
use std::collections::BTreeSet;

/// Which panels are open. Lives beside the tree so a re-render after a
/// structural edit restores it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpandedPaths(BTreeSet<NodePath>);

impl ExpandedPaths {
    pub fn is_expanded(&self, path: &NodePath) -> bool {
        self.0.contains(path)
    }

    /// Glyph shown on the toggle control.
    pub fn glyph(&self, path: &NodePath) -> &'static str {
        if self.is_expanded(path) {
            "-"
        } else {
            "+"
        }
    }

    pub fn toggle(&mut self, path: &NodePath) {
        if !self.0.remove(path) {
            self.0.insert(path.clone());
        }
    }

    pub fn expand_all(&mut self, tree: &SchemaTree) {
        self.0 = tree.node_paths().into_iter().collect();
    }

    pub fn collapse_all(&mut self) {
        self.0.clear();
    }

    /// Follow a rename of `parent/old` to `parent/new`.
    pub fn renamed(&mut self, parent: &NodePath, old: &str, new: &str) {
        let from = parent.child(old);
        let to = parent.child(new);
        self.0 = std::mem::take(&mut self.0)
            .into_iter()
            .map(|p| p.rebase(&from, &to).unwrap_or(p))
            .collect();
    }

    /// Forget `path` and everything below it.
    pub fn removed(&mut self, path: &NodePath) {
        self.0.retain(|p| !p.starts_with(path));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;

    fn tree() -> SchemaTree {
        let root: Node = serde_json::from_value(serde_json::json!({
            "children": {
                "a": {"children": {"b": {}, "c": {}}},
                "d": {}
            }
        }))
        .expect("should parse");
        SchemaTree::new(root)
    }

    fn p(names: &[&str]) -> NodePath {
        NodePath::from_names(names.iter().copied())
    }

    #[test]
    fn test_starts_collapsed_and_toggles() {
        let mut e = ExpandedPaths::default();
        assert_eq!(e.glyph(&p(&["a"])), "+");
        e.toggle(&p(&["a"]));
        assert!(e.is_expanded(&p(&["a"])));
        assert_eq!(e.glyph(&p(&["a"])), "-");
        e.toggle(&p(&["a"]));
        assert!(e.is_empty());
    }

    #[test]
    fn test_expand_all_then_collapse_all() {
        let mut e = ExpandedPaths::default();
        e.expand_all(&tree());
        assert_eq!(e.len(), 4);
        assert!(e.is_expanded(&p(&["a", "c"])));
        e.collapse_all();
        assert!(e.is_empty());
    }

    #[test]
    fn test_rename_rekeys_descendants() {
        let mut e = ExpandedPaths::default();
        e.expand_all(&tree());
        e.renamed(&NodePath::root(), "a", "z");
        assert!(e.is_expanded(&p(&["z"])));
        assert!(e.is_expanded(&p(&["z", "b"])));
        assert!(!e.is_expanded(&p(&["a", "b"])));
        assert!(e.is_expanded(&p(&["d"])));
    }

    #[test]
    fn test_remove_forgets_subtree() {
        let mut e = ExpandedPaths::default();
        e.expand_all(&tree());
        e.removed(&p(&["a"]));
        assert_eq!(e.len(), 1);
        assert!(e.is_expanded(&p(&["d"])));
    }
}
