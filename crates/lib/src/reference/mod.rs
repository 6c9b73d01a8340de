//! References: lazy handles into the store.
//!
//! A [`Reference`] is a `(Session, Address)` pair and nothing more. It
//! caches no resolved state; every operation re-resolves against the store,
//! so a reference always observes the store as it is now, not as it was when
//! the reference was derived.
//!
//! Indexing into a map or list yields a *new* reference at the child address
//! without copying any data. When an ancestor of a reference stops being a
//! live entry (deleted, cleared, or overwritten with a different shape), the
//! reference becomes invalid; this is discovered lazily, and the next
//! operation on it fails with
//! [`InvalidReference`](ReferenceError::InvalidReference). No back-pointers
//! or listener registries are maintained.
//!
//! [`Reference::node`] resolves the stored shape into a closed three-case
//! [`Node`]: a primitive [`Scalar`], a [`MapRef`] view, or a [`ListRef`]
//! view.

use crate::address::Address;
use crate::node::{self, Shape};
use crate::session::Session;
use crate::value::{Scalar, Value};
use crate::Result;

mod errors;
mod list;
mod map;

pub use errors::ReferenceError;
pub use list::{Cell, Cells, Items, ListRef};
pub use map::{Entries, Keys, MapRef};

/// The resolved node behind a reference: a closed variant over the three
/// shapes a payload can take.
#[derive(Debug, Clone)]
pub enum Node {
    /// A primitive value, returned directly.
    Primitive(Scalar),
    /// A map; operate on it through the [`MapRef`] view.
    Map(MapRef),
    /// A list; operate on it through the [`ListRef`] view.
    List(ListRef),
}

/// A lazy handle to the node at an address.
#[derive(Clone)]
pub struct Reference {
    session: Session,
    address: Address,
}

impl Reference {
    pub(crate) fn new(session: Session, address: Address) -> Self {
        Self { session, address }
    }

    /// The address this reference is bound to.
    pub fn address(&self) -> &Address {
        &self.address
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    /// Returns true if the reference still resolves to a live node.
    ///
    /// `false` means any other operation on this reference would fail with
    /// [`InvalidReference`](ReferenceError::InvalidReference) right now;
    /// with a concurrent writer, that can change between the two calls.
    pub fn is_live(&self) -> Result<bool> {
        Ok(node::read(&self.session, &self.address)?.is_some())
    }

    /// Reads and classifies the payload, failing if the reference is dead.
    pub(crate) fn shape(&self) -> Result<Shape> {
        node::read(&self.session, &self.address)?.ok_or_else(|| {
            ReferenceError::InvalidReference {
                address: self.address.to_string(),
            }
            .into()
        })
    }

    /// Resolves the node at this address.
    pub fn node(&self) -> Result<Node> {
        Ok(match self.shape()? {
            Shape::Primitive(scalar) => Node::Primitive(scalar),
            Shape::Map => Node::Map(MapRef::new(self.clone())),
            Shape::List => Node::List(ListRef::new(self.clone())),
        })
    }

    /// Resolves the node, requiring a primitive.
    pub fn scalar(&self) -> Result<Scalar> {
        match self.node()? {
            Node::Primitive(scalar) => Ok(scalar),
            Node::Map(_) => Err(self.type_mismatch("primitive", "map")),
            Node::List(_) => Err(self.type_mismatch("primitive", "list")),
        }
    }

    /// Resolves the node, requiring a map.
    pub fn as_map(&self) -> Result<MapRef> {
        match self.node()? {
            Node::Map(map) => Ok(map),
            Node::Primitive(scalar) => Err(self.type_mismatch("map", scalar.type_name())),
            Node::List(_) => Err(self.type_mismatch("map", "list")),
        }
    }

    /// Resolves the node, requiring a list.
    pub fn as_list(&self) -> Result<ListRef> {
        match self.node()? {
            Node::List(list) => Ok(list),
            Node::Primitive(scalar) => Err(self.type_mismatch("list", scalar.type_name())),
            Node::Map(_) => Err(self.type_mismatch("list", "map")),
        }
    }

    /// Overwrites the node at this address with `value`.
    ///
    /// If the new value's shape differs from the old one, the old node is
    /// deep-destroyed first; references derived under this address become
    /// invalid unless the new value happens to recreate their entries.
    pub fn set(&self, value: impl Into<Value>) -> Result<()> {
        self.session.ensure_writable("set")?;
        // Resolve first: writing through a dead reference would orphan the
        // data, since no parent chain lists this address.
        self.shape()?;
        node::write(&self.session, &self.address, &value.into())
    }

    /// Recursively resolves this reference into a plain nested [`Value`],
    /// detaching the data from the store. Maps preserve insertion order,
    /// lists preserve chain order.
    pub fn materialize(&self) -> Result<Value> {
        self.shape()?;
        node::collect(&self.session, &self.address)
    }

    /// Structural equality with another reference, computed via
    /// materialization (map key order is ignored, list order matters).
    pub fn same_content(&self, other: &Reference) -> Result<bool> {
        Ok(self.materialize()?.structural_eq(&other.materialize()?))
    }

    /// Structural equality with a plain value.
    pub fn matches(&self, value: &Value) -> Result<bool> {
        Ok(self.materialize()?.structural_eq(value))
    }

    fn type_mismatch(&self, expected: &'static str, actual: &'static str) -> crate::Error {
        ReferenceError::TypeMismatch {
            address: self.address.to_string(),
            expected,
            actual,
        }
        .into()
    }
}

impl std::fmt::Debug for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reference")
            .field("address", &self.address.to_string())
            .finish_non_exhaustive()
    }
}
