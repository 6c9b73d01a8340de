use std::any::Any;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::backend::{Backend, BackendError};

/// A simple in-memory backend using a `HashMap` for storage.
///
/// This backend is suitable for testing, development, or scenarios where the
/// whole store comfortably fits in memory. It provides persistence by
/// serializing the map to a JSON document: either explicitly via
/// [`save_to_file`](InMemory::save_to_file) / [`load_from_file`](InMemory::load_from_file),
/// or automatically on [`flush`](Backend::flush) when the backend is bound to
/// a file path.
///
/// Store keys contain the `0xFF` address separator and are not valid UTF-8,
/// so keys and values are hex-encoded inside the persisted document.
#[derive(Debug, Default)]
pub struct InMemory {
    /// Raw key-value entries, guarded for shared access between a session and
    /// its outstanding references.
    entries: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
    /// File the backend persists to on flush, if bound.
    path: Option<PathBuf>,
}

/// Serializable form of [`InMemory`] for persistence.
#[derive(Serialize, Deserialize)]
struct SerializableStore {
    /// hex(key) -> hex(value)
    entries: HashMap<String, String>,
}

impl InMemory {
    /// Creates a new, empty backend with no bound file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty backend that will persist to `path` on flush.
    ///
    /// The file is not created until the first flush.
    pub fn bound_to_file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Loads backend state from a JSON file written by
    /// [`save_to_file`](Self::save_to_file), binding the backend to that path
    /// so later flushes persist back to it.
    ///
    /// If the file does not exist, a new empty backend bound to `path` is
    /// returned.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::bound_to_file(path));
        }

        let json =
            fs::read_to_string(path).map_err(|source| BackendError::FileIo { source })?;
        let store: SerializableStore = serde_json::from_str(&json)
            .map_err(|source| BackendError::DeserializationFailed { source })?;

        let mut entries = HashMap::with_capacity(store.entries.len());
        for (key, value) in store.entries {
            let key = hex::decode(&key).map_err(|e| BackendError::CorruptStore {
                reason: format!("bad hex key {key:?}: {e}"),
            })?;
            let value = hex::decode(&value).map_err(|e| BackendError::CorruptStore {
                reason: format!("bad hex value: {e}"),
            })?;
            entries.insert(key, value);
        }

        Ok(Self {
            entries: RwLock::new(entries),
            path: Some(path.to_path_buf()),
        })
    }

    /// Saves the entire backend state to `path` as JSON, regardless of any
    /// bound file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let entries = self
            .entries
            .read()
            .map_err(|_| BackendError::LockPoisoned { operation: "save" })?;
        let store = SerializableStore {
            entries: entries
                .iter()
                .map(|(k, v)| (hex::encode(k), hex::encode(v)))
                .collect(),
        };
        let json = serde_json::to_string_pretty(&store)
            .map_err(|source| BackendError::SerializationFailed { source })?;
        fs::write(path, json).map_err(|source| BackendError::FileIo { source })?;
        Ok(())
    }

    /// Number of keys currently stored. Test and diagnostic aid.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Returns true if the backend holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A stable byte-for-byte snapshot of the store contents, sorted by key.
    /// Test aid for asserting that an operation left the store untouched.
    pub fn snapshot(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut pairs: Vec<_> = self
            .entries
            .read()
            .map(|e| e.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        pairs.sort();
        pairs
    }
}

impl Backend for InMemory {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| BackendError::LockPoisoned { operation: "get" })?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| BackendError::LockPoisoned { operation: "put" })?;
        entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| BackendError::LockPoisoned { operation: "delete" })?;
        entries.remove(key);
        Ok(())
    }

    fn contains(&self, key: &[u8]) -> Result<bool> {
        let entries = self
            .entries
            .read()
            .map_err(|_| BackendError::LockPoisoned {
                operation: "contains",
            })?;
        Ok(entries.contains_key(key))
    }

    fn flush(&self) -> Result<()> {
        match &self.path {
            Some(path) => self.save_to_file(path),
            None => Ok(()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
