//! Schema lifecycle: which document is being edited, and how save, delete
//! and "new schema" behave around it.

use crate::api::{DeleteFileRequest, DeleteFileResponse, SaveMetadataRequest, SaveMetadataResponse};
use crate::config::Bootstrap;
use crate::error::{EditorError, EditorResult};
use crate::interaction::Interaction;
use crate::models::Node;
use crate::schema::{Outcome, SchemaTree};

pub const SAVE_FAILED_MESSAGE: &str = "Failed to save metadata. Check the console for details.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete the file. Check console for details.";

const NEED_NAME_WHEN_NEW: &str = "Please provide a new file name when no file is currently loaded.";
const NEED_NAME_WHEN_NOT_OVERWRITING: &str =
    "Please provide a new file name if you do not wish to overwrite the existing file.";

/// The tree under edit plus the document it came from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorSession {
    pub tree: SchemaTree,
    selected_file: Option<String>,
}

/// Values of the save controls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveForm {
    pub overwrite: bool,
    pub new_file_name: String,
}

/// Where a validated save goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveTarget {
    pub file_name: String,
    pub overwrite: bool,
}

impl SaveTarget {
    pub fn request<'a>(&self, metadata: &'a Node) -> SaveMetadataRequest<'a> {
        SaveMetadataRequest {
            metadata,
            file_name: self.file_name.clone(),
            overwrite: self.overwrite,
        }
    }
}

/// What the page does once the endpoint has answered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AfterResponse {
    Stay,
    GoHome,
}

impl EditorSession {
    pub fn new(tree: SchemaTree, selected_file: Option<String>) -> Self {
        Self {
            tree,
            selected_file,
        }
    }

    pub fn from_bootstrap(b: &Bootstrap) -> Self {
        Self::new(b.tree.clone(), b.selected_file.clone())
    }

    pub fn selected_file(&self) -> Option<&str> {
        self.selected_file.as_deref()
    }

    pub fn is_new_file(&self) -> bool {
        self.selected_file.is_none()
    }

    pub fn title(&self) -> String {
        match &self.selected_file {
            Some(f) => format!("Editing: {f}"),
            None => "Saving New File".to_string(),
        }
    }

    /// Confirm, then start over from a single default leaf as an unsaved file.
    pub fn new_schema(&mut self, ui: &impl Interaction) -> Outcome {
        let question = "This will start a new schema from scratch. Unsaved changes to the current metadata will be lost. Proceed?";
        if !ui.confirm(question) {
            return Outcome::Cancelled;
        }
        self.tree.reset();
        self.selected_file = None;
        log::info!("session: started a new schema");
        Outcome::Applied
    }

    /// Validate the save controls before any request is made.
    pub fn plan_save(&self, form: &SaveForm) -> EditorResult<SaveTarget> {
        let new_name = form.new_file_name.trim();
        match (&self.selected_file, form.overwrite) {
            (None, _) if new_name.is_empty() => {
                Err(EditorError::MissingFileName(NEED_NAME_WHEN_NEW))
            }
            (Some(_), false) if new_name.is_empty() => {
                Err(EditorError::MissingFileName(NEED_NAME_WHEN_NOT_OVERWRITING))
            }
            (Some(current), true) => Ok(SaveTarget {
                file_name: current.clone(),
                overwrite: true,
            }),
            _ => Ok(SaveTarget {
                file_name: new_name.to_string(),
                overwrite: false,
            }),
        }
    }

    pub fn after_save(&self, resp: &SaveMetadataResponse) -> AfterResponse {
        if resp.is_success() && self.is_new_file() {
            AfterResponse::GoHome
        } else {
            AfterResponse::Stay
        }
    }
}

/// Validate and confirm deleting the picked document.
///
/// `Ok(None)` when the user declines.
pub fn plan_delete(
    picked: &str,
    ui: &impl Interaction,
) -> EditorResult<Option<DeleteFileRequest>> {
    let file_name = picked.trim();
    if file_name.is_empty() {
        return Err(EditorError::NoFileSelected);
    }

    let question = format!(
        "Are you sure you want to delete the file \"{file_name}\"? This action cannot be undone."
    );
    if !ui.confirm(&question) {
        return Ok(None);
    }

    Ok(Some(DeleteFileRequest {
        file_name: file_name.to_string(),
    }))
}

pub fn after_delete(resp: &DeleteFileResponse) -> AfterResponse {
    if resp.success {
        AfterResponse::GoHome
    } else {
        AfterResponse::Stay
    }
}

/// Client-side guard against submitting the same request twice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InFlight(bool);

impl InFlight {
    pub fn begin(&mut self) -> EditorResult<()> {
        if self.0 {
            return Err(EditorError::RequestInFlight);
        }
        self.0 = true;
        Ok(())
    }

    pub fn finish(&mut self) {
        self.0 = false;
    }

    pub fn is_active(&self) -> bool {
        self.0
    }
}
