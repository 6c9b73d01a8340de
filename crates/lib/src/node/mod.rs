//! Node resolution: classifying and rewriting the value at an address.
//!
//! Every address with a payload holds exactly one of three things:
//!
//! * the empty-map marker `{}` - the node is a Map, its entries live at
//!   derived addresses;
//! * the empty-list marker `[]` - the node is a List, same layout as Map;
//! * any other canonical JSON scalar - the node is that Primitive.
//!
//! The marker check applies to non-empty containers too: a container's own
//! address holds its shape marker for as long as the container exists, while
//! the entry count lives in separate metadata. Anything that decodes as none
//! of the above is a [`ShapeMismatch`](NodeError::ShapeMismatch).
//!
//! Writing a value whose shape differs from what an address previously held
//! deep-destroys the old node first, so no descendant address is left
//! orphaned in the flat keyspace.

use crate::address::Address;
use crate::chain;
use crate::session::Session;
use crate::value::{Scalar, Value};
use crate::{Error, Result};

mod errors;

pub use errors::NodeError;

/// The decoded shape of a stored payload.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Shape {
    /// A primitive value, stored inline.
    Primitive(Scalar),
    /// The empty-map marker; entries live at derived addresses.
    Map,
    /// The empty-list marker; entries live at derived addresses.
    List,
}

/// Encodes a shape as its canonical JSON payload.
pub(crate) fn encode(shape: &Shape) -> Result<Vec<u8>> {
    match shape {
        Shape::Map => Ok(b"{}".to_vec()),
        Shape::List => Ok(b"[]".to_vec()),
        Shape::Primitive(scalar) => serde_json::to_vec(&scalar.to_json()).map_err(Error::Serialize),
    }
}

/// Decodes a stored payload into a shape.
///
/// `{}` and `[]` are the container markers; any other valid JSON scalar is a
/// primitive. Non-empty JSON objects/arrays never appear in a well-formed
/// store and are rejected as corruption.
pub(crate) fn decode(bytes: &[u8], address: &Address) -> Result<Shape> {
    let mismatch = |reason: String| NodeError::ShapeMismatch {
        address: address.to_string(),
        reason,
    };

    let json: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| mismatch(format!("payload is not canonical JSON: {e}")))?;

    match json {
        serde_json::Value::Object(map) if map.is_empty() => Ok(Shape::Map),
        serde_json::Value::Array(items) if items.is_empty() => Ok(Shape::List),
        serde_json::Value::Object(_) | serde_json::Value::Array(_) => Err(mismatch(
            "non-empty container payload; container content belongs at derived addresses"
                .to_string(),
        )
        .into()),
        serde_json::Value::Null => Ok(Shape::Primitive(Scalar::Null)),
        serde_json::Value::Bool(b) => Ok(Shape::Primitive(Scalar::Bool(b))),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(Shape::Primitive(Scalar::Int(i))),
            None => n
                .as_f64()
                .map(|f| Shape::Primitive(Scalar::Float(f)))
                .ok_or_else(|| mismatch(format!("unrepresentable number {n}")).into()),
        },
        serde_json::Value::String(s) => Ok(Shape::Primitive(Scalar::Text(s))),
    }
}

/// Reads and classifies the payload at `address`, or `None` if absent.
pub(crate) fn read(session: &Session, address: &Address) -> Result<Option<Shape>> {
    match session.backend().get(&address.encode())? {
        Some(bytes) => Ok(Some(decode(&bytes, address)?)),
        None => Ok(None),
    }
}

/// Reads the payload at `address`, treating absence as corruption.
///
/// Used where the layout guarantees presence (container metadata, linked
/// entries).
pub(crate) fn read_required(session: &Session, address: &Address) -> Result<Shape> {
    read(session, address)?.ok_or_else(|| {
        NodeError::ShapeMismatch {
            address: address.to_string(),
            reason: "expected payload is absent".to_string(),
        }
        .into()
    })
}

/// Writes the raw payload for `shape` at `address`.
pub(crate) fn put(session: &Session, address: &Address, shape: &Shape) -> Result<()> {
    session.backend().put(&address.encode(), &encode(shape)?)
}

/// Writes `value` at `address`, replacing whatever node was there.
///
/// If the address previously held a container, its entries and metadata are
/// destroyed first; overwriting with a different shape therefore never
/// orphans descendant addresses. Containers are written marker-first, then
/// populated entry by entry through the container engine.
pub(crate) fn write(session: &Session, address: &Address, value: &Value) -> Result<()> {
    if let Some(previous) = read(session, address)? {
        destroy_contents(session, address, &previous)?;
    }

    match value {
        Value::Map(entries) => {
            put(session, address, &Shape::Map)?;
            chain::init_container(session, address)?;
            for (key, entry_value) in entries {
                chain::insert(session, address, key)?;
                write(session, &chain::entry_value_addr(address, key), entry_value)?;
            }
        }
        Value::List(items) => {
            put(session, address, &Shape::List)?;
            chain::init_container(session, address)?;
            for item in items {
                let key = chain::push_back(session, address)?;
                write(session, &chain::entry_value_addr(address, &key), item)?;
            }
        }
        Value::Null => put(session, address, &Shape::Primitive(Scalar::Null))?,
        Value::Bool(b) => put(session, address, &Shape::Primitive(Scalar::Bool(*b)))?,
        Value::Int(n) => put(session, address, &Shape::Primitive(Scalar::Int(*n)))?,
        Value::Float(f) => put(session, address, &Shape::Primitive(Scalar::Float(*f)))?,
        Value::Text(s) => put(session, address, &Shape::Primitive(Scalar::Text(s.clone())))?,
    }
    Ok(())
}

/// Removes the node at `address` and, recursively, everything stored under
/// it. A no-op if the address is already absent.
pub(crate) fn destroy(session: &Session, address: &Address) -> Result<()> {
    if let Some(shape) = read(session, address)? {
        destroy_contents(session, address, &shape)?;
        session.backend().delete(&address.encode())?;
    }
    Ok(())
}

/// Removes everything stored *under* `address` (entries and container
/// metadata), leaving the payload at `address` itself in place for the
/// caller to overwrite or delete.
fn destroy_contents(session: &Session, address: &Address, shape: &Shape) -> Result<()> {
    match shape {
        Shape::Primitive(_) => Ok(()),
        Shape::Map | Shape::List => {
            tracing::trace!(%address, "destroying container contents");
            chain::destroy_container(session, address)
        }
    }
}

/// Recursively materializes the node at `address` into a plain [`Value`].
///
/// Maps preserve chain (insertion) order; lists preserve chain order.
pub(crate) fn collect(session: &Session, address: &Address) -> Result<Value> {
    match read_required(session, address)? {
        Shape::Primitive(scalar) => Ok(scalar.into()),
        Shape::Map => {
            let mut entries = Vec::new();
            let mut cursor = chain::head(session, address)?;
            while let Some(key) = cursor {
                let value = collect(session, &chain::entry_value_addr(address, &key))?;
                cursor = chain::entry_next(session, address, &key)?;
                entries.push((key, value));
            }
            Ok(Value::Map(entries))
        }
        Shape::List => {
            let mut items = Vec::new();
            let mut cursor = chain::head(session, address)?;
            while let Some(key) = cursor {
                items.push(collect(session, &chain::entry_value_addr(address, &key))?);
                cursor = chain::entry_next(session, address, &key)?;
            }
            Ok(Value::List(items))
        }
    }
}
