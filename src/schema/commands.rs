use crate::error::{EditorError, EditorResult};
use crate::interaction::Interaction;
use crate::schema::{NodePath, SchemaTree};

/// Result of a user-driven command that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The tree changed; re-render.
    Applied,
    /// A node moved to the carried name; re-render.
    Renamed(String),
    /// The user backed out of a prompt or confirmation.
    Cancelled,
    /// Accepted but nothing to do (rename to the same name).
    Unchanged,
}

/// Prompt for a name and add a default leaf under `parent`.
pub fn add_child(
    tree: &mut SchemaTree,
    parent: &NodePath,
    ui: &impl Interaction,
) -> EditorResult<Outcome> {
    tree.node(parent)?;

    let Some(name) = ui.prompt("Enter new node name:", "") else {
        return Ok(Outcome::Cancelled);
    };
    if name.trim().is_empty() {
        return Ok(Outcome::Cancelled);
    }

    match tree.add_child(parent, &name) {
        Ok(()) => {
            log::debug!("schema::add_child {}", parent.child(name.as_str()));
            Ok(Outcome::Applied)
        }
        Err(e) => Err(reject(e, ui)),
    }
}

/// Prompt for a new name for `parent/old` and move the subtree there.
pub fn rename_child(
    tree: &mut SchemaTree,
    parent: &NodePath,
    old: &str,
    ui: &impl Interaction,
) -> EditorResult<Outcome> {
    let path = parent.child(old);
    tree.node(&path)?;

    let Some(new) = ui.prompt("Enter a new name for the node:", old) else {
        return Ok(Outcome::Cancelled);
    };
    if new.trim().is_empty() {
        return Ok(Outcome::Cancelled);
    }

    match tree.rename_child(parent, old, &new) {
        Ok(true) => {
            log::debug!("schema::rename_child {} -> {}", path, new);
            Ok(Outcome::Renamed(new))
        }
        Ok(false) => Ok(Outcome::Unchanged),
        Err(e) => Err(reject(e, ui)),
    }
}

/// Confirm, then delete `parent/name` with all descendants.
pub fn remove_child(
    tree: &mut SchemaTree,
    parent: &NodePath,
    name: &str,
    ui: &impl Interaction,
) -> EditorResult<Outcome> {
    let path = parent.child(name);
    tree.node(&path)?;

    let question =
        format!("Are you sure you want to delete the node \"{name}\" and all its children?");
    if !ui.confirm(&question) {
        return Ok(Outcome::Cancelled);
    }

    tree.remove_child(parent, name)?;
    log::debug!("schema::remove_child {}", path);
    Ok(Outcome::Applied)
}

/// Surface a validation failure to the user and hand it back.
fn reject(e: EditorError, ui: &impl Interaction) -> EditorError {
    if !e.is_lookup() {
        log::info!("schema: rejected edit: {}", e);
        ui.alert(&e.to_string());
    }
    e
}
