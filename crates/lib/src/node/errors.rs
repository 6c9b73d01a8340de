//! Error types for node resolution.

use thiserror::Error;

/// Errors raised while classifying or decoding stored payloads.
///
/// A shape mismatch signals store corruption or a format this build does not
/// understand. It is fatal to the operation that detected it and is never
/// retried internally.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NodeError {
    /// The payload at an address is neither a valid primitive encoding nor a
    /// recognized container marker, or required container metadata is absent
    /// or malformed.
    #[error("Unrecognized payload at {address}: {reason}")]
    ShapeMismatch {
        /// Dot-joined address of the offending payload
        address: String,
        /// Description of what was found
        reason: String,
    },
}

impl NodeError {
    /// Check if this error indicates corrupted or unintelligible store data.
    pub fn is_corruption_error(&self) -> bool {
        matches!(self, NodeError::ShapeMismatch { .. })
    }
}

// Conversion from NodeError to the main Error type
impl From<NodeError> for crate::Error {
    fn from(err: NodeError) -> Self {
        crate::Error::Node(err)
    }
}
