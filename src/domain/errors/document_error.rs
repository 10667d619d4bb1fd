//! Document persistence error types.

use thiserror::Error;

/// Document store error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum DocumentError {
    #[error("failed to read document {id}: {message}")]
    ReadFailed { id: String, message: String },

    #[error("failed to write document {id}: {message}")]
    WriteFailed { id: String, message: String },

    #[error("stored document {id} is corrupt: {message}")]
    Corrupt { id: String, message: String },
}

impl DocumentError {
    /// Creates read failure.
    #[must_use]
    pub fn read_failed(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReadFailed {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Creates write failure.
    #[must_use]
    pub fn write_failed(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WriteFailed {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Creates corrupt record error.
    #[must_use]
    pub fn corrupt(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            id: id.into(),
            message: message.into(),
        }
    }
}
