//! Error types for blobq_core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using blobq_core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during object store operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem failure while reading or writing objects.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Object id is not 40 hex characters.
    #[error("Invalid object id {id:?}: {reason}")]
    InvalidObjectId { id: String, reason: String },

    /// Object not found in store.
    #[error("Object not found: {id}")]
    ObjectNotFound { id: String },

    /// Stored bytes are not a valid zlib stream.
    #[error("Corrupt compressed stream: {reason}")]
    CorruptStream { reason: String },

    /// Decompressed bytes do not match `<kind> <size>\0<payload>`.
    #[error("Malformed object: {reason}")]
    MalformedObject { reason: String },

    /// Object kind cannot be framed.
    #[error("Invalid object kind: {kind:?}")]
    InvalidKind { kind: String },

    /// Repository directory is missing or incomplete.
    #[error("Invalid repository at {path}: {reason}")]
    InvalidRepository { path: PathBuf, reason: String },
}

impl Error {
    /// Create an InvalidObjectId error.
    pub fn invalid_object_id(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidObjectId {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create an ObjectNotFound error.
    pub fn object_not_found(id: impl Into<String>) -> Self {
        Error::ObjectNotFound { id: id.into() }
    }

    /// Create a CorruptStream error.
    pub fn corrupt_stream(reason: impl Into<String>) -> Self {
        Error::CorruptStream {
            reason: reason.into(),
        }
    }

    /// Create a MalformedObject error.
    pub fn malformed_object(reason: impl Into<String>) -> Self {
        Error::MalformedObject {
            reason: reason.into(),
        }
    }

    /// Create an InvalidKind error.
    pub fn invalid_kind(kind: impl Into<String>) -> Self {
        Error::InvalidKind { kind: kind.into() }
    }

    /// Create an InvalidRepository error.
    pub fn invalid_repository(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::InvalidRepository {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for the expected "unknown id" failure, as opposed to hard failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ObjectNotFound { .. })
    }
}

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::Io { source: err.error }
    }
}
