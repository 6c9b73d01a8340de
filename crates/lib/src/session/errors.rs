//! Error types for session open and lifecycle.

use thiserror::Error;

/// Errors raised while opening or using a session.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SessionError {
    /// The store's format identity is not one this build can read: the
    /// format name differs, the major version differs, or the minor version
    /// exceeds what this build understands. Fatal to session open.
    #[error(
        "Store format {found_name} v{found_major}.{found_minor} is not supported \
         (this build reads {expected_name} v{expected_major} with minor <= {expected_minor})"
    )]
    VersionMismatch {
        /// Format name found in the store
        found_name: String,
        /// Major version found in the store
        found_major: i64,
        /// Minor version found in the store
        found_minor: i64,
        /// Format name this build writes and reads
        expected_name: String,
        /// Major version this build supports
        expected_major: i64,
        /// Highest minor version this build understands
        expected_minor: i64,
    },

    /// Readonly open against a store with no version metadata. Fatal to
    /// session open; nothing was written.
    #[error("Store is not initialized and the session is readonly")]
    NotInitialized,

    /// A mutating operation was attempted on a readonly session. Reported
    /// before any store access occurs.
    #[error("Cannot {operation}: session is readonly")]
    ReadOnly {
        /// The operation that was refused
        operation: String,
    },
}

impl SessionError {
    /// Check if this error is a format/version incompatibility.
    pub fn is_version_mismatch(&self) -> bool {
        matches!(self, SessionError::VersionMismatch { .. })
    }

    /// Check if this error is a readonly violation.
    pub fn is_read_only(&self) -> bool {
        matches!(self, SessionError::ReadOnly { .. })
    }
}

// Conversion from SessionError to the main Error type
impl From<SessionError> for crate::Error {
    fn from(err: SessionError) -> Self {
        crate::Error::Session(err)
    }
}
