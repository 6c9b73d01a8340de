//! List views over references.

use crate::chain::{self, ChainError, ChainKeys};
use crate::node::{self, Shape};
use crate::value::Value;
use crate::Result;

use super::{Reference, ReferenceError};

/// A view of the list node behind a [`Reference`].
///
/// Lists share the map layout, but their entry keys are system-generated
/// random tokens that are never exposed; order is chain order, i.e.
/// append/prepend order, persisted across process reopenings. The list model
/// is chain-only: entries are reached by iteration, ends ([`append`],
/// [`prepend`], [`pop`]), value scans ([`remove`], [`contains`]), or
/// [`Cell`] handles - there is no positional indexing.
///
/// Like all views, a `ListRef` caches nothing and re-resolves on every
/// operation.
///
/// [`append`]: ListRef::append
/// [`prepend`]: ListRef::prepend
/// [`pop`]: ListRef::pop
/// [`remove`]: ListRef::remove
/// [`contains`]: ListRef::contains
#[derive(Debug, Clone)]
pub struct ListRef {
    reference: Reference,
}

impl ListRef {
    pub(super) fn new(reference: Reference) -> Self {
        Self { reference }
    }

    /// The reference this view was resolved from.
    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    /// Re-resolves the node, requiring it to still be a live list.
    fn ensure(&self) -> Result<()> {
        match self.reference.shape()? {
            Shape::List => Ok(()),
            Shape::Map => Err(self.stale("map")),
            Shape::Primitive(scalar) => Err(self.stale(scalar.type_name())),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> Result<u64> {
        self.ensure()?;
        chain::size(self.reference.session(), self.reference.address())
    }

    /// Returns true if the list has no entries.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Appends `value` at the tail and returns a reference to the new entry.
    pub fn append(&self, value: impl Into<Value>) -> Result<Reference> {
        self.reference.session().ensure_writable("append to list")?;
        self.ensure()?;
        let session = self.reference.session();
        let base = self.reference.address();
        let key = chain::push_back(session, base)?;
        node::write(session, &chain::entry_value_addr(base, &key), &value.into())?;
        Ok(self.entry_reference(&key))
    }

    /// Prepends `value` at the head and returns a reference to the new entry.
    pub fn prepend(&self, value: impl Into<Value>) -> Result<Reference> {
        self.reference
            .session()
            .ensure_writable("prepend to list")?;
        self.ensure()?;
        let session = self.reference.session();
        let base = self.reference.address();
        let key = chain::push_front(session, base)?;
        node::write(session, &chain::entry_value_addr(base, &key), &value.into())?;
        Ok(self.entry_reference(&key))
    }

    /// Removes the tail entry and returns its materialized value, failing
    /// with [`EmptyContainer`](ChainError::EmptyContainer) on an empty list.
    pub fn pop(&self) -> Result<Value> {
        self.reference.session().ensure_writable("pop from list")?;
        self.ensure()?;
        let session = self.reference.session();
        let base = self.reference.address();
        let key = chain::tail(session, base)?.ok_or(ChainError::EmptyContainer)?;
        let value = node::collect(session, &chain::entry_value_addr(base, &key))?;
        chain::remove(session, base, &key)?;
        Ok(value)
    }

    /// Removes every entry whose materialized value structurally equals
    /// `value`. Returns how many entries were removed (possibly zero).
    pub fn remove(&self, value: &Value) -> Result<usize> {
        self.reference
            .session()
            .ensure_writable("remove from list")?;
        self.ensure()?;
        let session = self.reference.session();
        let base = self.reference.address();

        // Collect the keys up front; removing while walking the chain would
        // use links the removal just rewrote.
        let keys: Vec<String> = chain::keys(session, base).collect::<Result<_>>()?;
        let mut removed = 0;
        for key in keys {
            let entry = node::collect(session, &chain::entry_value_addr(base, &key))?;
            if entry.structural_eq(value) {
                chain::remove(session, base, &key)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Returns true if some entry structurally equals `value`.
    pub fn contains(&self, value: &Value) -> Result<bool> {
        self.ensure()?;
        for entry in self.iter()? {
            if entry?.matches(value)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Removes every entry.
    pub fn clear(&self) -> Result<()> {
        self.reference.session().ensure_writable("clear list")?;
        self.ensure()?;
        chain::clear(self.reference.session(), self.reference.address())
    }

    /// Iterates references to the entries in chain order. Lazy and
    /// restartable; do not mutate the list while iterating.
    pub fn iter(&self) -> Result<Items> {
        self.ensure()?;
        Ok(Items {
            list: self.clone(),
            inner: chain::keys(self.reference.session(), self.reference.address()),
        })
    }

    /// Iterates [`Cell`] handles in chain order, for in-place mutation
    /// while walking: a cell can rewrite its entry's value or splice the
    /// entry out of the chain.
    ///
    /// Unlike [`iter`](ListRef::iter), the keys are snapshotted up front so
    /// removing the current cell does not derail the walk.
    pub fn cells(&self) -> Result<Cells> {
        self.ensure()?;
        let keys: Vec<String> = chain::keys(self.reference.session(), self.reference.address())
            .collect::<Result<_>>()?;
        Ok(Cells {
            list: self.clone(),
            keys: keys.into_iter(),
        })
    }

    /// Materializes the whole list into a plain [`Value::List`].
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
            expected: "list",
            actual,
        }
        .into()
    }
}

/// Iterator over references to a list's entries in chain order.
pub struct Items {
    list: ListRef,
    inner: ChainKeys,
}

impl Iterator for Items {
    type Item = Result<Reference>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next()? {
            Ok(key) => Some(Ok(self.list.entry_reference(&key))),
            Err(e) => Some(Err(e)),
        }
    }
}

/// A handle to one list entry, used for in-place mutation during iteration.
///
/// A cell stays bound to its entry, not its position: entries added or
/// removed elsewhere in the list do not disturb it. Using a cell after its
/// entry has been removed fails with
/// [`InvalidReference`](ReferenceError::InvalidReference).
#[derive(Debug, Clone)]
pub struct Cell {
    list: ListRef,
    key: String,
}

impl Cell {
    /// A reference to the entry's value node.
    pub fn reference(&self) -> Reference {
        self.list.entry_reference(&self.key)
    }

    /// Materializes the entry's current value.
    pub fn value(&self) -> Result<Value> {
        self.reference().materialize()
    }

    /// Overwrites the entry's value in place; the entry keeps its position.
    pub fn put(&self, value: impl Into<Value>) -> Result<()> {
        self.reference().set(value)
    }

    /// Splices the entry out of the list and deep-destroys its value.
    pub fn remove(self) -> Result<()> {
        let session = self.list.reference.session();
        session.ensure_writable("remove list cell")?;
        let base = self.list.reference.address();
        if !chain::contains(session, base, &self.key)? {
            return Err(ReferenceError::InvalidReference {
                address: chain::entry_value_addr(base, &self.key).to_string(),
            }
            .into());
        }
        chain::remove(session, base, &self.key)
    }
}

/// Iterator over [`Cell`] handles in chain order, backed by a key snapshot
/// taken when [`ListRef::cells`] was called.
pub struct Cells {
    list: ListRef,
    keys: std::vec::IntoIter<String>,
}

impl Iterator for Cells {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        Some(Cell {
            list: self.list.clone(),
            key: self.keys.next()?,
        })
    }
}
