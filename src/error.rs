//! Unified error type for the editor core.
//!
//! Compiler diagnostics are not errors here: a build that fails to compile is a
//! successful `BuildResult::CompileError` value.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Error)]
pub enum EditorError {
    /// Rejected locally before any backend call.
    #[error("{0}")]
    UserInput(#[from] UserInputError),

    /// The backend request itself failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Failed to decode backend payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserInputError {
    #[error("Select a file first.")]
    NoFileSelected,

    #[error("File name must not be empty")]
    EmptyFileName,

    #[error("Unknown mro path '{0}'")]
    UnknownMroPath(String),

    #[error("Buffer '{0}' is read-only")]
    ReadOnly(String),

    #[error("No pipeline tab at index {0}")]
    NoSuchTab(usize),

    #[error("No pipeline named '{0}' in the current build")]
    UnknownPipeline(String),
}

/// Opaque failure reported by a backend collaborator (HTTP status, I/O, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Backend request '{request}' failed: {message}")]
pub struct TransportError {
    pub request: &'static str,
    pub message: String,
}

impl TransportError {
    pub fn new(request: &'static str, message: impl Into<String>) -> Self {
        TransportError {
            request,
            message: message.into(),
        }
    }
}
