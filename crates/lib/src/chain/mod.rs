//! The container engine: ordered maps and lists as doubly-linked chains.
//!
//! A container at base address `addr` is laid out in the flat keyspace as:
//!
//! | Address | Content |
//! |---|---|
//! | `addr` | `{}` if Map, `[]` if List |
//! | `addr + ["m","size"]` | integer entry count |
//! | `addr + ["n"]` / `addr + ["p"]` | head / tail key, or null |
//! | `addr + ["k",key,"v"]` | entry value (recursively, any node) |
//! | `addr + ["k",key,"p"]` / `addr + ["k",key,"n"]` | neighbor keys, or null |
//!
//! Entries form a single doubly-linked chain; map iteration order is
//! insertion order and list order is append/prepend order, both persisted in
//! the chain rather than reconstructed. Every operation here translates to a
//! bounded number of store reads and writes, independent of container size,
//! except `clear`, `destroy_container`, and full iteration.
//!
//! Operations are synchronous and run to completion; the chain satisfies its
//! invariants (symmetric links, size equal to chain length, each live key
//! exactly once) after every completed call. Mutating a container while an
//! iterator over it is live is not detected and must be avoided by the
//! caller.

use rand::RngCore;

use crate::address::Address;
use crate::constants::{KEYS, META, NEXT, PREV, SIZE, VALUE};
use crate::node::{self, NodeError, Shape};
use crate::session::Session;
use crate::value::Scalar;
use crate::Result;

mod errors;


pub use errors::ChainError;

/// Number of random bytes in a generated list-entry key (hex-encoded to
/// twice this many characters).
const GENERATED_KEY_BYTES: usize = 8;

// --- Address layout -------------------------------------------------------

/// Address of the entry value for `key`: `base + ["k", key, "v"]`.
pub(crate) fn entry_value_addr(base: &Address, key: &str) -> Address {
    base.child(KEYS).child(key).child(VALUE)
}

fn entry_prev_addr(base: &Address, key: &str) -> Address {
    base.child(KEYS).child(key).child(PREV)
}

fn entry_next_addr(base: &Address, key: &str) -> Address {
    base.child(KEYS).child(key).child(NEXT)
}

fn head_addr(base: &Address) -> Address {
    base.child(NEXT)
}

fn tail_addr(base: &Address) -> Address {
    base.child(PREV)
}

fn size_addr(base: &Address) -> Address {
    base.child(META).child(SIZE)
}

// --- Link and size payloads ----------------------------------------------

/// Reads a chain link: a key string, or null at a boundary.
///
/// Links are required by the layout wherever they are read; an absent or
/// non-string payload is corruption.
fn read_link(session: &Session, address: &Address) -> Result<Option<String>> {
    match node::read_required(session, address)? {
        Shape::Primitive(Scalar::Text(key)) => Ok(Some(key)),
        Shape::Primitive(Scalar::Null) => Ok(None),
        other => Err(NodeError::ShapeMismatch {
            address: address.to_string(),
            reason: format!("expected a chain link, found {other:?}"),
        }
        .into()),
    }
}

fn write_link(session: &Session, address: &Address, link: Option<&str>) -> Result<()> {
    let scalar = match link {
        Some(key) => Scalar::Text(key.to_string()),
        None => Scalar::Null,
    };
    node::put(session, address, &Shape::Primitive(scalar))
}

fn write_size(session: &Session, base: &Address, size: u64) -> Result<()> {
    node::put(
        session,
        &size_addr(base),
        &Shape::Primitive(Scalar::Int(size as i64)),
    )
}

/// Entry count of the container at `base`. Absent metadata reads as zero,
/// which only a container created before its first write exhibits.
pub(crate) fn size(session: &Session, base: &Address) -> Result<u64> {
    let address = size_addr(base);
    match node::read(session, &address)? {
        None => Ok(0),
        Some(Shape::Primitive(Scalar::Int(n))) if n >= 0 => Ok(n as u64),
        Some(other) => Err(NodeError::ShapeMismatch {
            address: address.to_string(),
            reason: format!("expected a non-negative entry count, found {other:?}"),
        }
        .into()),
    }
}

fn bump_size(session: &Session, base: &Address, delta: i64) -> Result<()> {
    let current = size(session, base)? as i64;
    write_size(session, base, current.saturating_add(delta).max(0) as u64)
}

// --- Chain reads ----------------------------------------------------------

/// First key in the chain, or `None` if the container is empty.
pub(crate) fn head(session: &Session, base: &Address) -> Result<Option<String>> {
    read_link(session, &head_addr(base))
}

/// Last key in the chain, or `None` if the container is empty.
pub(crate) fn tail(session: &Session, base: &Address) -> Result<Option<String>> {
    read_link(session, &tail_addr(base))
}

/// Successor of `key` in the chain.
pub(crate) fn entry_next(session: &Session, base: &Address, key: &str) -> Result<Option<String>> {
    read_link(session, &entry_next_addr(base, key))
}

/// Returns true if `key` has a live entry (its value payload is present).
pub(crate) fn contains(session: &Session, base: &Address, key: &str) -> Result<bool> {
    session
        .backend()
        .contains(&entry_value_addr(base, key).encode())
}

/// Returns true if `key` is linked into the chain. Distinct from
/// [`contains`] only in the crash window between linking a key and writing
/// its first value payload.
fn linked(session: &Session, base: &Address, key: &str) -> Result<bool> {
    session
        .backend()
        .contains(&entry_prev_addr(base, key).encode())
}

// --- Chain mutation -------------------------------------------------------

/// Writes the empty-chain metadata for a freshly created container:
/// null head and tail, size zero.
pub(crate) fn init_container(session: &Session, base: &Address) -> Result<()> {
    write_link(session, &head_addr(base), None)?;
    write_link(session, &tail_addr(base), None)?;
    write_size(session, base, 0)
}

/// Links `key` at the tail of the chain if it is not already present.
///
/// Returns true if the key was newly linked; false if it already had an
/// entry, in which case the chain is untouched and the key keeps its
/// position. Either way the entry's value lives at
/// [`entry_value_addr`]`(base, key)`, which the caller writes next.
pub(crate) fn insert(session: &Session, base: &Address, key: &str) -> Result<bool> {
    if linked(session, base, key)? {
        return Ok(false);
    }
    link_at_tail(session, base, key)?;
    Ok(true)
}

fn link_at_tail(session: &Session, base: &Address, key: &str) -> Result<()> {
    let old_tail = tail(session, base)?;
    write_link(session, &entry_prev_addr(base, key), old_tail.as_deref())?;
    write_link(session, &entry_next_addr(base, key), None)?;
    match &old_tail {
        Some(previous) => write_link(session, &entry_next_addr(base, previous), Some(key))?,
        None => write_link(session, &head_addr(base), Some(key))?,
    }
    write_link(session, &tail_addr(base), Some(key))?;
    bump_size(session, base, 1)
}

fn link_at_head(session: &Session, base: &Address, key: &str) -> Result<()> {
    let old_head = head(session, base)?;
    write_link(session, &entry_next_addr(base, key), old_head.as_deref())?;
    write_link(session, &entry_prev_addr(base, key), None)?;
    match &old_head {
        Some(next) => write_link(session, &entry_prev_addr(base, next), Some(key))?,
        None => write_link(session, &tail_addr(base), Some(key))?,
    }
    write_link(session, &head_addr(base), Some(key))?;
    bump_size(session, base, 1)
}

/// Unlinks `key` from the chain and deep-destroys its value node.
///
/// The splice is completed (neighbors relinked, head/tail and size updated)
/// before the value is destroyed, so the chain invariants hold even if
/// destruction of a large subtree fails partway.
pub(crate) fn remove(session: &Session, base: &Address, key: &str) -> Result<()> {
    if !contains(session, base, key)? {
        return Err(ChainError::KeyNotFound {
            key: key.to_string(),
        }
        .into());
    }

    let prev = read_link(session, &entry_prev_addr(base, key))?;
    let next = read_link(session, &entry_next_addr(base, key))?;

    match &prev {
        Some(p) => write_link(session, &entry_next_addr(base, p), next.as_deref())?,
        None => write_link(session, &head_addr(base), next.as_deref())?,
    }
    match &next {
        Some(n) => write_link(session, &entry_prev_addr(base, n), prev.as_deref())?,
        None => write_link(session, &tail_addr(base), prev.as_deref())?,
    }
    bump_size(session, base, -1)?;

    session.backend().delete(&entry_prev_addr(base, key).encode())?;
    session.backend().delete(&entry_next_addr(base, key).encode())?;
    node::destroy(session, &entry_value_addr(base, key))
}

/// Removes every live entry, resetting the chain to empty.
///
/// The next pointer is captured before each entry is destroyed, so the walk
/// never reads a link it just invalidated.
pub(crate) fn clear(session: &Session, base: &Address) -> Result<()> {
    let mut cursor = head(session, base)?;
    while let Some(key) = cursor {
        cursor = entry_next(session, base, &key)?;
        session.backend().delete(&entry_prev_addr(base, &key).encode())?;
        session.backend().delete(&entry_next_addr(base, &key).encode())?;
        node::destroy(session, &entry_value_addr(base, &key))?;
    }
    init_container(session, base)
}

/// Removes every entry *and* the chain metadata itself. Used when the
/// container node is being destroyed or overwritten rather than emptied.
pub(crate) fn destroy_container(session: &Session, base: &Address) -> Result<()> {
    let mut cursor = head(session, base)?;
    while let Some(key) = cursor {
        cursor = entry_next(session, base, &key)?;
        session.backend().delete(&entry_prev_addr(base, &key).encode())?;
        session.backend().delete(&entry_next_addr(base, &key).encode())?;
        node::destroy(session, &entry_value_addr(base, &key))?;
    }
    session.backend().delete(&head_addr(base).encode())?;
    session.backend().delete(&tail_addr(base).encode())?;
    session.backend().delete(&size_addr(base).encode())
}

// --- Generated keys -------------------------------------------------------

/// Generates a key guaranteed not to collide with any currently-live key in
/// the container: a random hex token, re-drawn on the (negligible-probability)
/// collision.
fn generate_key(session: &Session, base: &Address) -> Result<String> {
    loop {
        let mut bytes = [0u8; GENERATED_KEY_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let key = hex::encode(bytes);
        if !linked(session, base, &key)? {
            return Ok(key);
        }
        tracing::debug!(%base, "generated list key collided, retrying");
    }
}

/// Links a fresh generated key at the tail. Returns the key; the caller
/// writes the entry's value next.
pub(crate) fn push_back(session: &Session, base: &Address) -> Result<String> {
    let key = generate_key(session, base)?;
    link_at_tail(session, base, &key)?;
    Ok(key)
}

/// Links a fresh generated key at the head. Returns the key; the caller
/// writes the entry's value next.
pub(crate) fn push_front(session: &Session, base: &Address) -> Result<String> {
    let key = generate_key(session, base)?;
    link_at_head(session, base, &key)?;
    Ok(key)
}

// --- Iteration ------------------------------------------------------------

/// Lazy head-to-tail traversal of a container's live keys.
///
/// Restartable: a fresh call to [`keys`] re-reads from the head. Not safe
/// against concurrent mutation of the same container; that is a caller
/// precondition, not something this iterator detects.
pub(crate) struct ChainKeys {
    session: Session,
    base: Address,
    state: KeysState,
}

enum KeysState {
    Start,
    At(String),
    Done,
}

impl Iterator for ChainKeys {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let link = match &self.state {
            KeysState::Start => head(&self.session, &self.base),
            KeysState::At(key) => entry_next(&self.session, &self.base, key),
            KeysState::Done => return None,
        };
        match link {
            Ok(Some(key)) => {
                self.state = KeysState::At(key.clone());
                Some(Ok(key))
            }
            Ok(None) => {
                self.state = KeysState::Done;
                None
            }
            Err(e) => {
                self.state = KeysState::Done;
                Some(Err(e))
            }
        }
    }
}

/// Iterates the live keys of the container at `base` in chain order.
pub(crate) fn keys(session: &Session, base: &Address) -> ChainKeys {
    ChainKeys {
        session: session.clone(),
        base: base.clone(),
        state: KeysState::Start,
    }
}
