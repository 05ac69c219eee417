use crate::error::{EditorError, EditorResult};
use crate::models::{Field, Node, Status};
use crate::schema::NodePath;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

/// The metadata schema being edited.
///
/// Owns the root node; every mutation goes through a method here so lookups
/// never materialize missing nodes.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct SchemaTree {
    root: Node,
}

impl SchemaTree {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// A schema holding only the default leaf.
    pub fn fresh() -> Self {
        Self::new(Node::default_leaf())
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    pub fn node(&self, path: &NodePath) -> EditorResult<&Node> {
        let mut current = &self.root;
        for name in path.names() {
            current = current
                .children()
                .and_then(|c| c.get(name))
                .ok_or_else(|| EditorError::PathNotFound(path.clone()))?;
        }
        Ok(current)
    }

    fn node_mut(&mut self, path: &NodePath) -> EditorResult<&mut Node> {
        let mut current = &mut self.root;
        for name in path.names() {
            current = current
                .children_mut()
                .and_then(|c| c.get_mut(name))
                .ok_or_else(|| EditorError::PathNotFound(path.clone()))?;
        }
        Ok(current)
    }

    pub fn contains(&self, path: &NodePath) -> bool {
        self.node(path).is_ok()
    }

    /// Insert a default leaf named `name` under `parent`.
    ///
    /// The parent's `children` map is created when it has none yet.
    pub fn add_child(&mut self, parent: &NodePath, name: &str) -> EditorResult<()> {
        let node = self.node_mut(parent)?;
        if name.trim().is_empty() {
            return Err(EditorError::EmptyName);
        }

        let children = node.children_or_insert();
        if children.contains_key(name) {
            return Err(EditorError::DuplicateName(name.to_string()));
        }
        children.insert(name.to_string(), Node::default_leaf());
        Ok(())
    }

    /// Move the child `old` to the key `new`, keeping its subtree.
    ///
    /// Returns `false` when `new == old`.
    pub fn rename_child(&mut self, parent: &NodePath, old: &str, new: &str) -> EditorResult<bool> {
        let children = self.children_containing(parent, old)?;
        if new.trim().is_empty() {
            return Err(EditorError::EmptyName);
        }
        if new == old {
            return Ok(false);
        }
        if children.contains_key(new) {
            return Err(EditorError::DuplicateName(new.to_string()));
        }

        let moved = children
            .remove(old)
            .ok_or_else(|| EditorError::PathNotFound(parent.child(old)))?;
        children.insert(new.to_string(), moved);
        Ok(true)
    }

    /// Delete the child `name` and all of its descendants.
    pub fn remove_child(&mut self, parent: &NodePath, name: &str) -> EditorResult<Node> {
        let children = self.children_containing(parent, name)?;
        children
            .remove(name)
            .ok_or_else(|| EditorError::PathNotFound(parent.child(name)))
    }

    fn children_containing(
        &mut self,
        parent: &NodePath,
        name: &str,
    ) -> EditorResult<&mut BTreeMap<String, Node>> {
        let missing = || EditorError::PathNotFound(parent.child(name));
        self.node_mut(parent)
            .map_err(|_| missing())?
            .children_mut()
            .filter(|c| c.contains_key(name))
            .ok_or_else(missing)
    }

    /// Store `value` in `field` of the node at `path`.
    ///
    /// Text fields are stored verbatim; a status is stored in its canonical
    /// lowercase form.
    pub fn set_field(&mut self, path: &NodePath, field: Field, value: &str) -> EditorResult<()> {
        let node = self.node_mut(path)?;
        match field {
            Field::Status => {
                let status = Status::from_str(value)
                    .map_err(|_| EditorError::InvalidStatus(value.to_string()))?;
                node.set_status(status);
            }
            Field::Comment => node.comment = Some(Some(value.to_string())),
            Field::Mapping => node.mapping = Some(Some(value.to_string())),
        }
        Ok(())
    }

    /// Replace the whole schema with the default leaf.
    pub fn reset(&mut self) {
        self.root = Node::default_leaf();
    }

    /// Paths of every node below the root, parents before children.
    pub fn node_paths(&self) -> Vec<NodePath> {
        let mut out = Vec::new();
        collect_paths(&self.root, &NodePath::root(), &mut out);
        out
    }
}

fn collect_paths(node: &Node, at: &NodePath, out: &mut Vec<NodePath>) {
    for (name, child) in node.children().into_iter().flatten() {
        let path = at.child(name.as_str());
        out.push(path.clone());
        collect_paths(child, &path, out);
    }
}

/// Children of `node` in display order: status priority, then name.
pub fn sorted_children(node: &Node) -> Vec<(&str, &Node)> {
    let mut kids = node
        .children()
        .into_iter()
        .flatten()
        .map(|(name, child)| (name.as_str(), child))
        .collect::<Vec<_>>();
    kids.sort_by(|(a_name, a), (b_name, b)| {
        a.effective_status()
            .priority()
            .cmp(&b.effective_status().priority())
            .then_with(|| compare_names(a_name, b_name))
    });
    kids
}

/// Case-aware name order: letters compare case-insensitively first, and on a
/// case-only difference lowercase sorts before uppercase.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded
        .then_with(|| {
            a.chars()
                .zip(b.chars())
                .map(|(x, y)| x.is_uppercase().cmp(&y.is_uppercase()))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SchemaTree {
        let root: Node = serde_json::from_value(serde_json::json!({
            "children": {
                "instrument": {
                    "status": "required",
                    "comment": "",
                    "mapping": "",
                    "children": {
                        "model": {"status": "required", "comment": "m", "mapping": "/a/b"},
                        "vendor": {"status": "optional", "comment": "", "mapping": ""}
                    }
                },
                "sample": {"status": "recommended", "comment": "s", "mapping": ""}
            }
        }))
        .expect("sample should parse");
        SchemaTree::new(root)
    }

    fn p(names: &[&str]) -> NodePath {
        NodePath::from_names(names.iter().copied())
    }

    #[test]
    fn test_lookup_missing_segment_is_an_error() {
        let tree = sample();
        assert!(tree.node(&p(&["instrument", "model"])).is_ok());
        assert_eq!(
            tree.node(&p(&["instrument", "nope"])),
            Err(EditorError::PathNotFound(p(&["instrument", "nope"])))
        );
    }

    #[test]
    fn test_add_child_inserts_default_leaf() {
        let mut tree = sample();
        tree.add_child(&p(&["sample"]), "thickness")
            .expect("add should succeed");
        let added = tree.node(&p(&["sample", "thickness"])).expect("present");
        assert_eq!(added, &Node::default_leaf());
    }

    #[test]
    fn test_add_child_at_root_of_fresh_schema_creates_children() {
        let mut tree = SchemaTree::fresh();
        assert!(tree.root().children().is_none());
        tree.add_child(&NodePath::root(), "a").expect("add should succeed");
        assert_eq!(tree.root().children().map(|c| c.len()), Some(1));
    }

    #[test]
    fn test_add_duplicate_leaves_tree_unchanged() {
        let mut tree = sample();
        let before = tree.clone();
        let err = tree.add_child(&p(&["instrument"]), "model").unwrap_err();
        assert_eq!(err, EditorError::DuplicateName("model".to_string()));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_add_blank_name_rejected() {
        let mut tree = sample();
        assert_eq!(
            tree.add_child(&NodePath::root(), "   "),
            Err(EditorError::EmptyName)
        );
    }

    #[test]
    fn test_add_under_missing_parent_does_not_materialize() {
        let mut tree = sample();
        let before = tree.clone();
        assert!(tree.add_child(&p(&["ghost"]), "x").is_err());
        assert_eq!(tree, before);
    }

    #[test]
    fn test_rename_preserves_subtree() {
        let mut tree = sample();
        let subtree = tree.node(&p(&["instrument"])).cloned().expect("present");
        let changed = tree
            .rename_child(&NodePath::root(), "instrument", "device")
            .expect("rename should succeed");
        assert!(changed);
        assert!(!tree.contains(&p(&["instrument"])));
        assert_eq!(tree.node(&p(&["device"])), Ok(&subtree));
    }

    #[test]
    fn test_rename_to_same_name_is_noop() {
        let mut tree = sample();
        let before = tree.clone();
        assert_eq!(
            tree.rename_child(&NodePath::root(), "sample", "sample"),
            Ok(false)
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn test_rename_collision_rejected() {
        let mut tree = sample();
        let before = tree.clone();
        assert_eq!(
            tree.rename_child(&NodePath::root(), "sample", "instrument"),
            Err(EditorError::DuplicateName("instrument".to_string()))
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn test_remove_drops_descendants_only() {
        let mut tree = sample();
        let removed = tree
            .remove_child(&NodePath::root(), "instrument")
            .expect("remove should succeed");
        assert_eq!(removed.children().map(|c| c.len()), Some(2));
        assert!(!tree.contains(&p(&["instrument", "model"])));
        assert_eq!(
            tree.node(&p(&["sample"])).map(|n| n.comment()),
            Ok(Some("s"))
        );
    }

    #[test]
    fn test_remove_missing_child_is_lookup_error() {
        let mut tree = sample();
        let err = tree.remove_child(&p(&["sample"]), "x").unwrap_err();
        assert!(err.is_lookup());
    }

    #[test]
    fn test_set_field_touches_only_target() {
        let mut tree = sample();
        tree.add_child(&p(&["sample"]), "model").expect("add");
        tree.set_field(&p(&["sample", "model"]), Field::Comment, "edited")
            .expect("set should succeed");

        assert_eq!(
            tree.node(&p(&["sample", "model"])).map(|n| n.comment()),
            Ok(Some("edited"))
        );
        assert_eq!(
            tree.node(&p(&["instrument", "model"])).map(|n| n.comment()),
            Ok(Some("m"))
        );
    }

    #[test]
    fn test_set_field_status_parses() {
        let mut tree = sample();
        tree.set_field(&p(&["sample"]), Field::Status, "Optional")
            .expect("set should succeed");
        assert_eq!(
            tree.node(&p(&["sample"])).map(|n| n.status_text()),
            Ok(Some("optional"))
        );
        assert_eq!(
            tree.set_field(&p(&["sample"]), Field::Status, "urgent"),
            Err(EditorError::InvalidStatus("urgent".to_string()))
        );
    }

    #[test]
    fn test_set_field_on_missing_path_fails() {
        let mut tree = sample();
        let before = tree.clone();
        assert!(tree.set_field(&p(&["ghost", "x"]), Field::Mapping, "v").is_err());
        assert_eq!(tree, before);
    }

    #[test]
    fn test_sorted_children_by_status_then_name() {
        let root: Node = serde_json::from_value(serde_json::json!({
            "children": {
                "zeta": {"status": "required"},
                "Alpha": {"status": "optional"},
                "beta": {},
                "gamma": {"status": "recommended"},
                "alpha": {"status": "required"}
            }
        }))
        .expect("should parse");
        let names = sorted_children(&root)
            .into_iter()
            .map(|(n, _)| n)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["alpha", "zeta", "gamma", "Alpha", "beta"]);
    }

    #[test]
    fn test_compare_names_case_aware() {
        assert_eq!(compare_names("a", "B"), Ordering::Less);
        assert_eq!(compare_names("a", "A"), Ordering::Less);
        assert_eq!(compare_names("Zed", "apple"), Ordering::Greater);
        assert_eq!(compare_names("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_node_paths_parent_first() {
        let tree = sample();
        let paths = tree.node_paths();
        assert_eq!(paths.len(), 4);
        assert_eq!(paths[0], p(&["instrument"]));
        assert!(paths.contains(&p(&["instrument", "vendor"])));
    }

    #[test]
    fn test_serialization_is_verbatim() {
        let tree = sample();
        let v = serde_json::to_value(&tree).expect("should serialize");
        let back: SchemaTree = serde_json::from_value(v).expect("should parse");
        assert_eq!(back, tree);
    }
}
