use std::{io, path::PathBuf};

use thiserror::Error;

use crate::types::ElementType;

/// Reader error types
#[derive(Error, Debug)]
pub enum EclError {
    /// Path does not exist, or no array carries the requested name
    #[error("not found: {0}")]
    NotFound(String),

    /// Path exists but cannot be opened for reading
    #[error("cannot read {}: {source}", .path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Structural violation of the record layout
    #[error("invalid format: {0}")]
    Format(String),

    /// Integer index outside the catalog
    #[error("index {index} out of range ({count} arrays)")]
    Range { index: usize, count: usize },

    /// Typed accessor used on an array of another type
    #[error("array {name} is {actual}, not {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: ElementType,
    },

    /// Handle was closed before the call
    #[error("file handle is closed")]
    Closed,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl EclError {
    #[inline]
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        EclError::Format(msg.into())
    }
}

/// Result type alias for reader operations
pub type Result<T> = std::result::Result<T, EclError>;
