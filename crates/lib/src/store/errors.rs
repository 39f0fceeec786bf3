//! Error types for store operations.
//!
//! This module defines structured error types for path-addressed access to
//! the document tree, providing detailed context for missing paths, bounds
//! violations, and stale handles.

use thiserror::Error;

/// Structured error types for store operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// The path (or a key along it) does not resolve to a value
    #[error("path not found: {path}")]
    NotFound { path: String },

    /// A list index was outside the current bounds
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The root of the tree must always be a map
    #[error("root value must be a map, found {actual}")]
    InvalidRootType { actual: String },

    /// A handle's path no longer resolves because an ancestor was removed
    /// or replaced
    #[error("stale handle: {path} no longer resolves")]
    StaleReference { path: String },

    /// Operation attempted after the dictionary was closed
    #[error("dictionary is closed")]
    Closed,
}

impl StoreError {
    /// Check if this error indicates a missing path or key
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Check if this error indicates a list bounds violation
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, StoreError::IndexOutOfRange { .. })
    }

    /// Check if this error indicates a stale handle
    pub fn is_stale(&self) -> bool {
        matches!(self, StoreError::StaleReference { .. })
    }

    /// Check if this error indicates an operation on a closed dictionary
    pub fn is_closed(&self) -> bool {
        matches!(self, StoreError::Closed)
    }

    /// Get the path if this is a path-related error
    pub fn path(&self) -> Option<&str> {
        match self {
            StoreError::NotFound { path } | StoreError::StaleReference { path } => Some(path),
            _ => None,
        }
    }
}

// Conversion from StoreError to the main Error type
impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
