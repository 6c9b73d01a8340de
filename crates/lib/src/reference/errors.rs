//! Error types for the reference layer.

use thiserror::Error;

/// Errors raised by operations on references and typed views.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// The reference's path no longer resolves: an ancestor entry was
    /// deleted, its container was cleared, or an ancestor was overwritten
    /// with a different shape. The caller must re-derive a fresh reference
    /// from an ancestor still known to be live.
    #[error("Reference at {address} no longer resolves to a live node")]
    InvalidReference {
        /// Dot-joined address of the dead reference
        address: String,
    },

    /// The node at the address is not the shape the operation requires
    /// (e.g. a map operation on a primitive).
    #[error("Type mismatch at {address}: expected {expected}, found {actual}")]
    TypeMismatch {
        /// Dot-joined address of the node
        address: String,
        /// The shape the operation required
        expected: &'static str,
        /// The shape actually found
        actual: &'static str,
    },
}

impl ReferenceError {
    /// Check if this error indicates a stale reference.
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, ReferenceError::InvalidReference { .. })
    }

    /// Check if this error is a shape/type mismatch.
    pub fn is_type_error(&self) -> bool {
        matches!(self, ReferenceError::TypeMismatch { .. })
    }
}

// Conversion from ReferenceError to the main Error type
impl From<ReferenceError> for crate::Error {
    fn from(err: ReferenceError) -> Self {
        crate::Error::Reference(err)
    }
}
