use crate::schema::NodePath;
use thiserror::Error;

/// How a failed editor operation is surfaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reported to the user; no state change.
    Validation,
    /// A node could not be resolved; aborted without telling the user.
    Lookup,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("Node name must not be empty.")]
    EmptyName,

    #[error("A node with that name already exists!")]
    DuplicateName(String),

    #[error("path not found: {0}")]
    PathNotFound(NodePath),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("{0}")]
    MissingFileName(&'static str),

    #[error("No file selected to delete.")]
    NoFileSelected,

    #[error("A request is already in progress.")]
    RequestInFlight,
}

impl EditorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EditorError::PathNotFound(_) => ErrorKind::Lookup,
            _ => ErrorKind::Validation,
        }
    }

    pub fn is_lookup(&self) -> bool {
        self.kind() == ErrorKind::Lookup
    }
}

pub type EditorResult<T> = Result<T, EditorError>;
