//! Sessions: the open handle to a store.
//!
//! A [`Session`] owns a [`Backend`], validates the store's format identity
//! once at open (the version gate), exposes the root [`Reference`], and
//! enforces read-only mode before any mutating store access. Sessions are
//! cheap-to-clone handles; [`Reference`]s derived from a session keep its
//! backend alive.
//!
//! There is no batched write-back: every container operation is durable
//! against the backend as it happens. [`Session::close`] (and drop, as a
//! fallback on every exit path) flushes backends that buffer, such as a
//! file-bound [`InMemory`](crate::backend::InMemory).
//!
//! jotdb assumes at most one mutating session per store at a time;
//! coordinating that across processes (e.g. an advisory file lock held for
//! the session's lifetime) belongs to the embedding application.

use std::sync::Arc;

use crate::address::Address;
use crate::backend::Backend;
use crate::constants::{
    FORMAT_NAME, FORMAT_NAME_KEY, FORMAT_VERSION_MAJOR, FORMAT_VERSION_MAJOR_KEY,
    FORMAT_VERSION_MINOR, FORMAT_VERSION_MINOR_KEY, META,
};
use crate::node::{self, NodeError, Shape};
use crate::reference::Reference;
use crate::value::{Scalar, Value};
use crate::Result;

mod errors;

pub use errors::SessionError;

/// Outcome of the version gate for a store that did not fail it.
#[derive(Debug, PartialEq, Eq)]
enum GateState {
    /// No format identity present; the store is empty of jotdb data.
    Uninitialized,
    /// Identity present and compatible.
    Ready,
}

/// Internal state for a session. `Session` itself is a cheap-to-clone handle
/// wrapping this in an `Arc`.
struct SessionInner {
    backend: Box<dyn Backend>,
    readonly: bool,
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        // Fallback flush so buffered backends persist on every exit path,
        // including early returns and panics unwinding through the caller.
        if !self.readonly
            && let Err(e) = self.backend.flush()
        {
            tracing::warn!("failed to flush backend on session drop: {e}");
        }
    }
}

/// An open handle to a store: version-gated, mode-aware, and the root of all
/// [`Reference`]s.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// Opens `backend` for reading and writing.
    ///
    /// If the store carries no format identity it is initialized with an
    /// empty map at the root. A store written by an incompatible build fails
    /// with [`SessionError::VersionMismatch`] and no reference is exposed.
    pub fn open(backend: Box<dyn Backend>) -> Result<Self> {
        let session = Self::wrap(backend, false);
        match session.gate()? {
            GateState::Ready => {}
            GateState::Uninitialized => {
                tracing::debug!("initializing empty store with an empty map root");
                session.write_format_identity()?;
                node::write(&session, &Address::root(), &Value::empty_map())?;
            }
        }
        Ok(session)
    }

    /// Opens `backend` readonly.
    ///
    /// Fails with [`SessionError::NotInitialized`] if the store has no
    /// format identity; a readonly open never writes.
    pub fn open_readonly(backend: Box<dyn Backend>) -> Result<Self> {
        let session = Self::wrap(backend, true);
        match session.gate()? {
            GateState::Ready => Ok(session),
            GateState::Uninitialized => Err(SessionError::NotInitialized.into()),
        }
    }

    /// Opens `backend` for writing and replaces the root with `root`.
    ///
    /// On an uninitialized store this writes the format identity and the
    /// given root. On an already-initialized (and version-compatible) store
    /// the previous root content is deep-destroyed first, the identity is
    /// rewritten at this build's version, and the new root takes its place.
    pub fn init(backend: Box<dyn Backend>, root: impl Into<Value>) -> Result<Self> {
        let root = root.into();
        let session = Self::wrap(backend, false);
        session.gate()?;
        session.write_format_identity()?;
        node::write(&session, &Address::root(), &root)?;
        tracing::debug!(root_type = root.type_name(), "store initialized");
        Ok(session)
    }

    /// Returns a [`Reference`] to the root node (the empty address).
    pub fn root(&self) -> Reference {
        Reference::new(self.clone(), Address::root())
    }

    /// Materializes the whole store into a plain [`Value`]. Equivalent to
    /// `self.root().materialize()`.
    pub fn export(&self) -> Result<Value> {
        self.root().materialize()
    }

    /// Returns true if the session was opened readonly.
    pub fn is_readonly(&self) -> bool {
        self.inner.readonly
    }

    /// Flushes the backend and releases the session handle.
    ///
    /// The store itself needs no commit step - every operation was already
    /// applied - but buffered backends persist here. Dropping the session
    /// has the same effect; `close` exists to surface flush errors instead
    /// of logging them.
    pub fn close(self) -> Result<()> {
        if !self.inner.readonly {
            self.inner.backend.flush()?;
        }
        Ok(())
    }

    pub(crate) fn backend(&self) -> &dyn Backend {
        self.inner.backend.as_ref()
    }

    /// Fails with [`SessionError::ReadOnly`] before any store access when
    /// the session is readonly.
    pub(crate) fn ensure_writable(&self, operation: &str) -> Result<()> {
        if self.inner.readonly {
            return Err(SessionError::ReadOnly {
                operation: operation.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn wrap(backend: Box<dyn Backend>, readonly: bool) -> Self {
        Self {
            inner: Arc::new(SessionInner { backend, readonly }),
        }
    }

    /// Runs the version gate: validates the format identity records at the
    /// three reserved addresses.
    fn gate(&self) -> Result<GateState> {
        let name = match node::read(self, &format_name_addr())? {
            None => return Ok(GateState::Uninitialized),
            Some(Shape::Primitive(Scalar::Text(name))) => name,
            Some(other) => {
                return Err(NodeError::ShapeMismatch {
                    address: format_name_addr().to_string(),
                    reason: format!("expected a format name string, found {other:?}"),
                }
                .into());
            }
        };

        // Read versions leniently when the name already disqualifies the
        // store; strictly when it is supposed to be ours.
        let ours = name == FORMAT_NAME;
        let major = read_version(self, &format_version_addr(FORMAT_VERSION_MAJOR_KEY), ours)?;
        let minor = read_version(self, &format_version_addr(FORMAT_VERSION_MINOR_KEY), ours)?;

        if !ours || major != FORMAT_VERSION_MAJOR || minor > FORMAT_VERSION_MINOR {
            tracing::warn!(
                found_name = %name,
                found_major = major,
                found_minor = minor,
                "rejecting store with unsupported format identity"
            );
            return Err(SessionError::VersionMismatch {
                found_name: name,
                found_major: major,
                found_minor: minor,
                expected_name: FORMAT_NAME.to_string(),
                expected_major: FORMAT_VERSION_MAJOR,
                expected_minor: FORMAT_VERSION_MINOR,
            }
            .into());
        }
        Ok(GateState::Ready)
    }

    /// Writes this build's format identity at the reserved addresses.
    fn write_format_identity(&self) -> Result<()> {
        node::put(
            self,
            &format_name_addr(),
            &Shape::Primitive(Scalar::Text(FORMAT_NAME.to_string())),
        )?;
        node::put(
            self,
            &format_version_addr(FORMAT_VERSION_MAJOR_KEY),
            &Shape::Primitive(Scalar::Int(FORMAT_VERSION_MAJOR)),
        )?;
        node::put(
            self,
            &format_version_addr(FORMAT_VERSION_MINOR_KEY),
            &Shape::Primitive(Scalar::Int(FORMAT_VERSION_MINOR)),
        )
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("readonly", &self.inner.readonly)
            .finish_non_exhaustive()
    }
}

fn format_name_addr() -> Address {
    Address::from_segments([META, FORMAT_NAME_KEY])
}

fn format_version_addr(key: &str) -> Address {
    Address::from_segments([META, key])
}

/// Reads one of the integer version records. With `strict`, absence or a
/// non-integer payload is corruption; otherwise it reads as zero (the store
/// already failed the name check and the value is only reported back).
fn read_version(session: &Session, address: &Address, strict: bool) -> Result<i64> {
    match node::read(session, address)? {
        Some(Shape::Primitive(Scalar::Int(n))) => Ok(n),
        None if !strict => Ok(0),
        other if !strict => {
            tracing::debug!(%address, ?other, "ignoring malformed version record in foreign store");
            Ok(0)
        }
        None => Err(NodeError::ShapeMismatch {
            address: address.to_string(),
            reason: "version record is absent".to_string(),
        }
        .into()),
        Some(other) => Err(NodeError::ShapeMismatch {
            address: address.to_string(),
            reason: format!("expected an integer version, found {other:?}"),
        }
        .into()),
    }
}
