//! Error types for backend storage operations.
//!
//! This module defines structured error types for the key-value backends,
//! providing better error context and type safety compared to string-based
//! errors.

use thiserror::Error;

/// Errors that can occur inside a storage backend.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// File I/O error while loading or persisting the store.
    #[error("File I/O error")]
    FileIo {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Serialization of the persisted store document failed.
    #[error("Serialization failed")]
    SerializationFailed {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization of the persisted store document failed.
    #[error("Deserialization failed")]
    DeserializationFailed {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// The persisted store document is structurally invalid.
    #[error("Persisted store is corrupt: {reason}")]
    CorruptStore {
        /// Description of the corruption detected
        reason: String,
    },

    /// A lock guarding backend state was poisoned by a panicking writer.
    #[error("Backend lock poisoned during {operation}")]
    LockPoisoned {
        /// The operation that observed the poisoned lock
        operation: &'static str,
    },
}

impl BackendError {
    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, BackendError::FileIo { .. })
    }

    /// Check if this error is related to (de)serialization of the persisted
    /// store document.
    pub fn is_serialization_error(&self) -> bool {
        matches!(
            self,
            BackendError::SerializationFailed { .. } | BackendError::DeserializationFailed { .. }
        )
    }

    /// Check if this error indicates corrupted persisted state.
    pub fn is_corruption_error(&self) -> bool {
        matches!(self, BackendError::CorruptStore { .. })
    }
}

// Conversion from BackendError to the main Error type
impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
