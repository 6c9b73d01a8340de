//! Error types for container chain operations.

use thiserror::Error;

/// Errors raised by operations on a container's entry chain.
///
/// These are local failures surfaced to the caller of the operation that
/// detected them; a failed call leaves the chain invariants intact.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ChainError {
    /// Lookup or removal of a map key that has no entry.
    #[error("Key not found: {key}")]
    KeyNotFound {
        /// The key that had no entry
        key: String,
    },

    /// Pop from a list with zero entries.
    #[error("Container is empty")]
    EmptyContainer,
}

impl ChainError {
    /// Check if this error indicates a missing key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChainError::KeyNotFound { .. })
    }
}

// Conversion from ChainError to the main Error type
impl From<ChainError> for crate::Error {
    fn from(err: ChainError) -> Self {
        crate::Error::Chain(err)
    }
}
