//! Storage backends for jotdb.
//!
//! This module provides the [`Backend`] trait and the bundled [`InMemory`]
//! implementation.
//!
//! The `Backend` trait is the capability interface the rest of the library is
//! written against: an unordered byte-string-to-byte-string key-value store
//! supporting point reads, writes, and deletes. Enumeration of keys is
//! deliberately not part of the interface; everything the container engine
//! does is reachable from known addresses. A [`Session`](crate::Session) is
//! constructed with an explicit backend instance rather than selecting one
//! through ambient global state.
//!
//! jotdb performs no cross-process locking. At most one mutating session per
//! store at a time is assumed; coordinating concurrent processes (e.g. with
//! an advisory file lock around the session lifetime) is the embedding
//! application's responsibility.

use std::any::Any;

use crate::Result;

mod errors;
mod in_memory;

pub use errors::BackendError;
pub use in_memory::InMemory;

/// Capability interface for the flat key-value store backing a session.
///
/// Implementations must provide read-your-writes consistency within one
/// process: a `get` issued after a `put` returns the written bytes. Every
/// mutation is expected to be durable per call or buffered until [`flush`]
/// (the bundled [`InMemory`] backend buffers and persists on flush when bound
/// to a file).
///
/// All backends must be `Send` and `Sync` to allow sharing across threads,
/// and implement `Any` to allow for downcasting if needed.
///
/// [`flush`]: Backend::flush
pub trait Backend: Send + Sync + Any {
    /// Retrieves the value stored at `key`, or `None` if the key is absent.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Stores `value` at `key`, overwriting any previous value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Removes `key`. Removing an absent key is a no-op.
    fn delete(&self, key: &[u8]) -> Result<()>;

    /// Returns true if `key` currently holds a value.
    ///
    /// Default implementation reads the value; backends with a cheaper
    /// existence probe should override this.
    fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Makes buffered writes durable. Called by
    /// [`Session::close`](crate::Session::close) and on session drop.
    fn flush(&self) -> Result<()>;

    /// Returns a reference to the backend instance as a dynamic `Any` type.
    ///
    /// This allows for downcasting to a concrete backend implementation if
    /// necessary, enabling access to implementation-specific methods.
    fn as_any(&self) -> &dyn Any;
}
