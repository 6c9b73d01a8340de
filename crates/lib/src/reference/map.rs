//! Map views over references.

use crate::chain::{self, ChainError, ChainKeys};
use crate::node::{self, Shape};
use crate::value::Value;
use crate::Result;

use super::{Reference, ReferenceError};

/// A view of the map node behind a [`Reference`].
///
/// The view caches nothing: every operation re-resolves the underlying node
/// and fails with [`InvalidReference`](ReferenceError::InvalidReference) if
/// the map has died, or with a type mismatch if the address now holds a
/// different shape.
///
/// Keys are caller-supplied strings; iteration order is insertion order,
/// persisted in the entry chain and stable across process reopenings.
/// Re-assigning an existing key does not change its position. Iterating a
/// map while mutating it through another handle is not detected and must be
/// avoided by the caller.
#[derive(Debug, Clone)]
pub struct MapRef {
    reference: Reference,
}

impl MapRef {
    pub(super) fn new(reference: Reference) -> Self {
        Self { reference }
    }

    /// The reference this view was resolved from.
    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    /// Re-resolves the node, requiring it to still be a live map.
    fn ensure(&self) -> Result<()> {
        match self.reference.shape()? {
            Shape::Map => Ok(()),
            Shape::List => Err(self.stale("list")),
            Shape::Primitive(scalar) => Err(self.stale(scalar.type_name())),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> Result<u64> {
        self.ensure()?;
        chain::size(self.reference.session(), self.reference.address())
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Returns true if `key` has an entry.
    pub fn contains(&self, key: &str) -> Result<bool> {
        self.ensure()?;
        chain::contains(self.reference.session(), self.reference.address(), key)
    }

    /// Returns a reference to the value entry for `key`, or `None` if the
    /// key has no entry. The data is not copied or resolved.
    pub fn try_get(&self, key: &str) -> Result<Option<Reference>> {
        self.ensure()?;
        let session = self.reference.session();
        if !chain::contains(session, self.reference.address(), key)? {
            return Ok(None);
        }
        Ok(Some(self.entry_reference(key)))
    }

    /// Returns a reference to the value entry for `key`, failing with
    /// [`KeyNotFound`](ChainError::KeyNotFound) if absent.
    pub fn get(&self, key: &str) -> Result<Reference> {
        self.try_get(key)?.ok_or_else(|| {
            ChainError::KeyNotFound {
                key: key.to_string(),
            }
            .into()
        })
    }

    /// Assigns `value` to `key` and returns a reference to the entry.
    ///
    /// A new key is appended to the chain; an existing key keeps its
    /// position and has its old value node replaced (deep-destroying it
    /// first if the shape changes).
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<Reference> {
        self.reference.session().ensure_writable("set map entry")?;
        self.ensure()?;
        let session = self.reference.session();
        let base = self.reference.address();
        chain::insert(session, base, key)?;
        node::write(session, &chain::entry_value_addr(base, key), &value.into())?;
        Ok(self.entry_reference(key))
    }

    /// Removes `key` and deep-destroys its value node, failing with
    /// [`KeyNotFound`](ChainError::KeyNotFound) if absent.
    pub fn remove(&self, key: &str) -> Result<()> {
        self.reference
            .session()
            .ensure_writable("remove map entry")?;
        self.ensure()?;
        chain::remove(self.reference.session(), self.reference.address(), key)
    }

    /// Removes every entry.
    pub fn clear(&self) -> Result<()> {
        self.reference.session().ensure_writable("clear map")?;
        self.ensure()?;
        chain::clear(self.reference.session(), self.reference.address())
    }

    /// Iterates the keys in insertion order. Lazy and restartable; do not
    /// mutate the map while iterating.
    pub fn keys(&self) -> Result<Keys> {
        self.ensure()?;
        Ok(Keys {
            inner: chain::keys(self.reference.session(), self.reference.address()),
        })
    }

    /// Iterates `(key, entry reference)` pairs in insertion order.
    pub fn iter(&self) -> Result<Entries> {
        self.ensure()?;
        Ok(Entries {
            map: self.clone(),
            inner: chain::keys(self.reference.session(), self.reference.address()),
        })
    }

    /// Materializes the whole map into a plain [`Value::Map`].
    pub fn materialize(&self) -> Result<Value> {
        self.reference.materialize()
    }

    fn entry_reference(&self, key: &str) -> Reference {
        Reference::new(
            self.reference.session().clone(),
            chain::entry_value_addr(self.reference.address(), key),
        )
    }

    fn stale(&self, actual: &'static str) -> crate::Error {
        ReferenceError::TypeMismatch {
            address: self.reference.address().to_string(),
            expected: "map",
            actual,
        }
        .into()
    }
}

/// Iterator over a map's keys in insertion order.
pub struct Keys {
    inner: ChainKeys,
}

impl Iterator for Keys {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Iterator over `(key, entry reference)` pairs in insertion order.
pub struct Entries {
    map: MapRef,
    inner: ChainKeys,
}

impl Iterator for Entries {
    type Item = Result<(String, Reference)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next()? {
            Ok(key) => {
                let reference = self.map.entry_reference(&key);
                Some(Ok((key, reference)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
