//! Error types for dictionary-level operations.

use thiserror::Error;

/// Structured error types for the dictionary facade.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DictError {
    /// save/load was called without an explicit path and the dictionary has
    /// no configured backing file
    #[error("no backing file path configured")]
    NoPathConfigured,
}

impl DictError {
    /// Check if this error indicates a missing backing path
    pub fn is_no_path(&self) -> bool {
        matches!(self, DictError::NoPathConfigured)
    }
}

// Conversion from DictError to the main Error type
impl From<DictError> for crate::Error {
    fn from(err: DictError) -> Self {
        crate::Error::Dict(err)
    }
}
