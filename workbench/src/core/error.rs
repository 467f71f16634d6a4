//! Error taxonomy for workspace operations.
//!
//! `NotFound` and `Unrecognized` are surfaced to the user as transcript text by
//! the interpreter. The remaining variants are contract violations returned to
//! the calling layer, which decides whether to log or ignore them.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    /// No node with this id exists in the project tree.
    #[error("node '{0}' not found")]
    NotFound(String),
    /// No open buffer with this id.
    #[error("buffer '{0}' is not open")]
    NotOpen(String),
    /// The id does not resolve to a folder node.
    #[error("'{0}' is not a folder")]
    InvalidParent(String),
    /// The id is already used by another node in the tree.
    #[error("duplicate id '{0}'")]
    DuplicateId(String),
    /// The command line matched no registered verb.
    #[error("unrecognized command: {0}")]
    Unrecognized(String),
}
