use crate::models::{Field, Node, Status};
use crate::schema::{sorted_children, NodePath, SchemaTree};
use strum::IntoEnumIterator;

/// Display model for one non-root node.
#[derive(Clone, Debug, PartialEq)]
pub struct OutlineRow {
    pub name: String,
    pub path: NodePath,
    /// Drives the label color; absent status renders as optional.
    pub label_status: Status,
    /// Drives the panel class; only set when the node carries a status.
    pub panel_status: Option<Status>,
    /// Editable fields the node actually carries, in fixed order.
    pub fields: Vec<(Field, String)>,
    pub children: Vec<OutlineRow>,
    /// Leaves get an inline "New node" control under their panel.
    pub is_leaf: bool,
}

/// What the tree view shows for the current schema.
#[derive(Clone, Debug, PartialEq)]
pub enum Outline {
    /// Root has no children: only the "New node" control.
    Empty,
    /// Root's children in display order; the root itself is never shown.
    Rows(Vec<OutlineRow>),
}

pub fn outline(tree: &SchemaTree) -> Outline {
    let root = tree.root();
    if root.children().is_none() {
        return Outline::Empty;
    }
    Outline::Rows(rows(root, &NodePath::root()))
}

fn rows(parent: &Node, at: &NodePath) -> Vec<OutlineRow> {
    sorted_children(parent)
        .into_iter()
        .map(|(name, node)| {
            let path = at.child(name);
            OutlineRow {
                name: name.to_string(),
                label_status: node.effective_status(),
                panel_status: node.status(),
                fields: Field::iter()
                    .filter_map(|f| node.field_text(f).map(|v| (f, v)))
                    .collect(),
                children: rows(node, &path),
                is_leaf: node.is_leaf(),
                path,
            }
        })
        .collect()
}
