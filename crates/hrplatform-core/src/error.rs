//! Error types for resource loading and storage.
//!
//! Callers recover from both: a load failure leaves the data set empty, a
//! storage failure is logged and treated as a no-op.

use thiserror::Error;

/// Errors that can occur while fetching or decoding a JSON resource.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The resource does not exist at the configured location.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} while fetching {resource}")]
    Http { resource: String, status: u16 },

    /// Reading the resource failed at the transport level.
    #[error("failed to read {resource}: {message}")]
    Io { resource: String, message: String },

    /// The resource was fetched but is not valid JSON for its schema.
    #[error("failed to parse {resource}: {source}")]
    Parse {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Name of the resource this error refers to.
    pub fn resource(&self) -> &str {
        match self {
            LoadError::NotFound(r) => r,
            LoadError::Http { resource, .. }
            | LoadError::Io { resource, .. }
            | LoadError::Parse { resource, .. } => resource,
        }
    }
}

/// Errors raised by a key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend refused the write (disk full, read-only location, quota).
    #[error("storage write failed for key '{key}': {message}")]
    Write { key: String, message: String },

    /// The backend could not be read.
    #[error("storage read failed for key '{key}': {message}")]
    Read { key: String, message: String },

    /// A stored value could not be (de)serialized.
    #[error("stored value for key '{key}' is malformed: {message}")]
    Malformed { key: String, message: String },
}

/// Invalid quiz session transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("no quiz is in progress")]
    NotStarted,

    #[error("the current question has already been answered")]
    AlreadyAnswered,

    #[error("the current question has not been answered yet")]
    NotAnswered,

    #[error("option {choice} does not exist (question has {available} options)")]
    InvalidChoice { choice: usize, available: usize },
}
