//! Constants used throughout the jotdb library.
//!
//! This module provides central definitions for the reserved address segments
//! of the on-store layout and for the format identity written by the version
//! gate at initialization.

/// Reserved segment holding container metadata (and, at the root, the format
/// identity records).
pub const META: &str = "m";

/// Reserved segment under which container entries live: `addr + [KEYS, key, ...]`.
pub const KEYS: &str = "k";

/// Reserved segment holding an entry's value: `addr + [KEYS, key, VALUE]`.
pub const VALUE: &str = "v";

/// Reserved segment for the head pointer of a chain (`addr + [NEXT]`) and for
/// an entry's successor (`addr + [KEYS, key, NEXT]`).
pub const NEXT: &str = "n";

/// Reserved segment for the tail pointer of a chain (`addr + [PREV]`) and for
/// an entry's predecessor (`addr + [KEYS, key, PREV]`).
pub const PREV: &str = "p";

/// Reserved segment holding a container's entry count: `addr + [META, SIZE]`.
pub const SIZE: &str = "size";

/// Format name written at `["m", "format-name"]` when a store is initialized.
pub const FORMAT_NAME: &str = "jotdb";

/// Reserved segment for the format name record.
pub const FORMAT_NAME_KEY: &str = "format-name";

/// Reserved segment for the compatibility-breaking version record.
pub const FORMAT_VERSION_MAJOR_KEY: &str = "format-version-major";

/// Reserved segment for the backward-compatible version record.
pub const FORMAT_VERSION_MINOR_KEY: &str = "format-version-minor";

/// Highest compatibility-breaking format version this build understands.
pub const FORMAT_VERSION_MAJOR: i64 = 1;

/// Highest backward-compatible format version this build understands.
/// A store written with a smaller minor version is accepted; a larger one is
/// rejected at session open.
pub const FORMAT_VERSION_MINOR: i64 = 0;
