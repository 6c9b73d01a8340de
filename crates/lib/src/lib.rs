//!
//! jotdb: JSON-style data over a flat key-value store.
//!
//! jotdb maps an arbitrary JSON-style value (primitive, ordered map, or
//! ordered list) onto a flat, unordered key-value store so that any sub-part
//! of the value can be read or mutated in isolation, without loading or
//! rewriting the whole structure.
//!
//! ## Core Concepts
//!
//! * **Addresses (`address::Address`)**: Ordered string-segment paths
//!   identifying every node; an address encodes to a store key by joining
//!   its UTF-8 segments with a `0xFF` separator.
//! * **Backends (`backend::Backend`)**: A pluggable storage layer - any
//!   byte-string key-value store with get/put/delete. The bundled
//!   `backend::InMemory` persists itself to a JSON file.
//! * **Containers**: Maps and lists are doubly-linked chains of entries
//!   living at addresses derived from the container's base address, so
//!   insertion order survives process restarts and each operation touches a
//!   bounded number of store keys.
//! * **References (`reference::Reference`)**: Lazy `(Session, Address)`
//!   handles. Indexing yields child references without copying; operations
//!   re-resolve against the store every time, and a reference whose ancestor
//!   died fails with `InvalidReference` on next use.
//! * **Sessions (`session::Session`)**: The open handle to a store. Runs the
//!   format version gate at open, exposes the root reference, enforces
//!   readonly mode, and flushes the backend on close or drop.
//!
//! ## Example
//!
//! ```
//! use jotdb::{backend::InMemory, Session, Value};
//!
//! # fn main() -> jotdb::Result<()> {
//! let session = Session::open(Box::new(InMemory::new()))?;
//! let root = session.root().as_map()?;
//! root.set("name", "Alice")?;
//! root.set("scores", Value::from(vec![10i64, 20]))?;
//!
//! let scores = root.get("scores")?.as_list()?;
//! scores.append(30i64)?;
//! assert_eq!(scores.len()?, 3);
//!
//! assert_eq!(
//!     session.export()?,
//!     Value::from_json(&serde_json::json!({"name": "Alice", "scores": [10, 20, 30]}))
//! );
//! session.close()
//! # }
//! ```

pub mod address;
pub mod backend;
pub mod chain;
pub mod constants;
pub mod node;
pub mod reference;
pub mod session;
pub mod value;

// Re-export the main types for easier access.
pub use address::Address;
pub use reference::{Cell, ListRef, MapRef, Node, Reference};
pub use session::Session;
pub use value::{Scalar, Value};

/// Result type used throughout the jotdb library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the jotdb library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured storage errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured session and version-gate errors from the session module
    #[error(transparent)]
    Session(session::SessionError),

    /// Structured container chain errors from the chain module
    #[error(transparent)]
    Chain(chain::ChainError),

    /// Structured node resolution errors from the node module
    #[error(transparent)]
    Node(node::NodeError),

    /// Structured reference errors from the reference module
    #[error(transparent)]
    Reference(reference::ReferenceError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
            Error::Backend(_) => "backend",
            Error::Session(_) => "session",
            Error::Chain(_) => "chain",
            Error::Node(_) => "node",
            Error::Reference(_) => "reference",
        }
    }

    /// Check if this error indicates a missing map key.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Chain(chain_err) => chain_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is a pop from an empty container.
    pub fn is_empty_container(&self) -> bool {
        matches!(self, Error::Chain(chain::ChainError::EmptyContainer))
    }

    /// Check if this error indicates a stale reference whose path no longer
    /// resolves.
    pub fn is_invalid_reference(&self) -> bool {
        match self {
            Error::Reference(ref_err) => ref_err.is_invalid_reference(),
            _ => false,
        }
    }

    /// Check if this error is a readonly violation.
    pub fn is_read_only(&self) -> bool {
        match self {
            Error::Session(session_err) => session_err.is_read_only(),
            _ => false,
        }
    }

    /// Check if this error is a format/version incompatibility.
    pub fn is_version_mismatch(&self) -> bool {
        match self {
            Error::Session(session_err) => session_err.is_version_mismatch(),
            _ => false,
        }
    }

    /// Check if this error is a readonly open of an uninitialized store.
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Error::Session(session::SessionError::NotInitialized))
    }

    /// Check if this error indicates corrupted or unintelligible store data.
    pub fn is_corruption(&self) -> bool {
        match self {
            Error::Node(node_err) => node_err.is_corruption_error(),
            Error::Backend(backend_err) => backend_err.is_corruption_error(),
            _ => false,
        }
    }

    /// Check if this error is a shape/type mismatch at a reference.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Reference(ref_err) => ref_err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::Backend(backend_err) => backend_err.is_io_error(),
            _ => false,
        }
    }
}
