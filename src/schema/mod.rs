//! The metadata schema tree and the edits a user can make to it.

mod commands;
mod expansion;
mod outline;
mod path;
mod tree;

pub use commands::{add_child, remove_child, rename_child, Outcome};
pub use expansion::ExpandedPaths;
pub use outline::{outline, Outline, OutlineRow};
pub use path::{NodePath, CHILDREN_SEGMENT};
pub use tree::{compare_names, sorted_children, SchemaTree};
