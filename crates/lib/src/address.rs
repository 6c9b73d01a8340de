//! Addresses for locating nodes in the flat keyspace.
//!
//! An [`Address`] is an ordered sequence of Unicode string segments. The empty
//! sequence denotes the root of the store. Addresses are pure values: deriving
//! a child address never touches the store.
//!
//! # Store key encoding
//!
//! An address encodes to a store key by UTF-8 encoding each segment and
//! joining the results with a single `0xFF` byte. `0xFF` never occurs in
//! valid UTF-8, so the encoding is unambiguous; the root encodes to the empty
//! byte string.
//!
//! ```
//! use jotdb::Address;
//!
//! let addr = Address::root().child("map").child("k");
//! assert_eq!(addr.encode(), b"map\xffk".to_vec());
//! assert_eq!(Address::root().encode(), Vec::<u8>::new());
//! ```

use std::fmt;

/// Byte separating segments in an encoded store key.
///
/// Never produced by UTF-8 encoding, which keeps segment boundaries
/// unambiguous regardless of segment content.
pub const KEY_SEPARATOR: u8 = 0xFF;

/// An ordered sequence of string segments identifying a node in the store.
///
/// Two addresses are equal iff their segment sequences are equal. Addresses
/// are cheap to clone relative to the store round-trips they key, and every
/// derivation (`child`, `push`) is purely structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Address {
    segments: Vec<String>,
}

impl Address {
    /// Returns the root address (the empty segment sequence).
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds an address from an ordered list of segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns a new address with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment.into());
        Self { segments }
    }

    /// Appends a segment in place.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// Returns the segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns true if this is the root address.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the address has no segments (same as [`is_root`](Self::is_root)).
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Encodes the address as a store key.
    ///
    /// Segments are UTF-8 encoded and joined with [`KEY_SEPARATOR`]; the root
    /// encodes to an empty byte string.
    pub fn encode(&self) -> Vec<u8> {
        let mut key = Vec::with_capacity(
            self.segments.iter().map(String::len).sum::<usize>() + self.segments.len(),
        );
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                key.push(KEY_SEPARATOR);
            }
            key.extend_from_slice(segment.as_bytes());
        }
        key
    }
}

impl fmt::Display for Address {
    /// Dot-joined rendering for diagnostics. Not the store key encoding.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "<root>");
        }
        write!(f, "{}", self.segments.join("."))
    }
}

impl<S: Into<String>> FromIterator<S> for Address {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_segments(iter)
    }
}
