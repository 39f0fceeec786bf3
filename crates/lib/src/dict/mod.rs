//! The dictionary facade: the top-level object exposed to callers.
//!
//! [`JsonDict`] is a thread-safe, JSON-compatible tree that behaves like a
//! mutable map. Root-level operations are the map-view handle operations
//! with an empty path; nested containers come back as live handles that
//! write through to the shared tree. `save`/`load` persist to and restore
//! from JSON text on disk.

mod errors;

pub use errors::DictError;

use std::io::Write;
use std::path::{Path as StdPath, PathBuf as StdPathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::{
    Result,
    handle::{Entries, Keys, MapHandle, Node, Values},
    json::{self, WriteOptions},
    path::Path,
    store::{RootStore, StoreError},
    value::Value,
};

/// A thread-safe dictionary of JSON-compatible values.
///
/// All access, from any clone of the dictionary and from any nested handle,
/// is serialized through one reentrant lock, so readers never observe a
/// half-applied mutation. Cloning is cheap and produces another view of the
/// same shared tree.
///
/// # Examples
///
/// ```
/// use jsondict::{JsonDict, Value};
///
/// let data = JsonDict::new();
/// data.set("config", Value::empty_map())?;
///
/// // Retrieval yields a live handle, not a copy
/// let config = data.get("config")?.unwrap().into_map().unwrap();
/// config.set("debug", true)?;
///
/// // The mutation is visible from the root
/// assert_eq!(
///     data.get_or("config", Value::Null)?,
///     Value::Map([("debug".to_string(), Value::Bool(true))].into_iter().collect()),
/// );
/// # Ok::<(), jsondict::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonDict {
    store: Arc<RootStore>,
    root: MapHandle,
    backing: Option<StdPathBuf>,
}

impl JsonDict {
    /// Creates an empty dictionary with no backing file.
    pub fn new() -> Self {
        let store = Arc::new(RootStore::new());
        let root = MapHandle::new(Arc::clone(&store), Path::new());
        Self {
            store,
            root,
            backing: None,
        }
    }

    /// Creates a dictionary backed by `path`.
    ///
    /// If the file exists its contents are loaded immediately; otherwise the
    /// dictionary starts empty and the path is used by later
    /// [`save`](JsonDict::save)/[`load`](JsonDict::load) calls.
    pub fn open(path: impl Into<StdPathBuf>) -> Result<Self> {
        let path = path.into();
        let mut dict = Self::new();
        if path.exists() {
            dict.load_from(&path)?;
        }
        dict.backing = Some(path);
        Ok(dict)
    }

    /// Returns the configured backing file path, if any.
    pub fn backing_path(&self) -> Option<&StdPath> {
        self.backing.as_deref()
    }

    /// Returns the root map handle (the whole dictionary as a map view).
    pub fn root(&self) -> &MapHandle {
        &self.root
    }

    // ---- Mapping surface (root-level map-view operations) ----

    /// Gets the value under `key`; containers come back as live handles.
    pub fn get(&self, key: impl AsRef<str>) -> Result<Option<Node>> {
        self.root.get(key)
    }

    /// Gets a deep copy of the value under `key`, or `default` if absent.
    pub fn get_or(&self, key: impl AsRef<str>, default: impl Into<Value>) -> Result<Value> {
        self.root.get_or(key, default)
    }

    /// Sets `key` to `value`.
    pub fn set(&self, key: impl AsRef<str>, value: impl Into<Value>) -> Result<()> {
        self.root.set(key, value)
    }

    /// Removes `key`, returning its value; fails with `NotFound` if absent.
    pub fn remove(&self, key: impl AsRef<str>) -> Result<Value> {
        self.root.remove(key)
    }

    /// Returns true if the dictionary contains `key`.
    pub fn contains_key(&self, key: impl AsRef<str>) -> Result<bool> {
        self.root.contains_key(key)
    }

    /// Returns the number of top-level keys.
    pub fn len(&self) -> Result<usize> {
        self.root.len()
    }

    /// Returns true if the dictionary has no keys.
    pub fn is_empty(&self) -> Result<bool> {
        self.root.is_empty()
    }

    /// Returns a snapshot iterator over the top-level keys.
    pub fn keys(&self) -> Result<Keys> {
        self.root.keys()
    }

    /// Returns a snapshot iterator over deep copies of the top-level values.
    pub fn values(&self) -> Result<Values> {
        self.root.values()
    }

    /// Returns a snapshot iterator over top-level `(key, value)` pairs.
    pub fn entries(&self) -> Result<Entries> {
        self.root.entries()
    }

    /// Removes every key.
    pub fn clear(&self) -> Result<()> {
        self.root.clear()
    }

    /// Sets every pair from `entries` under one lock acquisition.
    pub fn update<K, V>(&self, entries: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.root.update(entries)
    }

    /// Gets the value under `key`, inserting `default` first if absent.
    pub fn get_or_insert(&self, key: impl AsRef<str>, default: impl Into<Value>) -> Result<Node> {
        self.root.get_or_insert(key, default)
    }

    // ---- Persistence ----

    /// Returns a deep, independent copy of the whole tree.
    pub fn snapshot(&self) -> Result<Value> {
        self.store.snapshot()
    }

    /// Serializes a snapshot of the tree to JSON text.
    pub fn to_json_string(&self, options: &WriteOptions) -> Result<String> {
        let snapshot = self.store.snapshot()?;
        json::to_json_string(&snapshot, options)
    }

    /// Saves to the configured backing path with default options.
    ///
    /// Fails with [`DictError::NoPathConfigured`] if the dictionary was not
    /// opened with a path.
    pub fn save(&self) -> Result<()> {
        self.save_with(None, &WriteOptions::default())
    }

    /// Saves to `path` with default options.
    pub fn save_to(&self, path: impl AsRef<StdPath>) -> Result<()> {
        self.save_with(Some(path.as_ref()), &WriteOptions::default())
    }

    /// Saves to `path` (or the configured backing path) with `options`.
    ///
    /// The snapshot is taken under the lock; serialization and file I/O
    /// happen after it is released. The file is written to a temporary
    /// sibling and renamed into place, so a failed write never truncates an
    /// existing file.
    pub fn save_with(&self, path: Option<&StdPath>, options: &WriteOptions) -> Result<()> {
        let target = path
            .or(self.backing.as_deref())
            .ok_or(DictError::NoPathConfigured)?;
        let snapshot = self.store.snapshot()?;
        let text = json::to_json_string(&snapshot, options)?;

        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                std::fs::create_dir_all(parent)?;
                parent
            }
            _ => StdPath::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(text.as_bytes())?;
        tmp.persist(target).map_err(|err| crate::Error::Io(err.error))?;
        debug!(path = %target.display(), bytes = text.len(), "saved dictionary");
        Ok(())
    }

    /// Reloads the tree from the configured backing path.
    pub fn load(&self) -> Result<()> {
        let path = self
            .backing
            .as_deref()
            .ok_or(DictError::NoPathConfigured)?
            .to_path_buf();
        self.load_from(path)
    }

    /// Replaces the tree with the contents of the JSON file at `path`.
    ///
    /// The file is read and parsed before the lock is taken; the swap itself
    /// is atomic. On any failure (I/O, malformed JSON, non-map root) the
    /// previous tree is left untouched.
    pub fn load_from(&self, path: impl AsRef<StdPath>) -> Result<()> {
        let path = path.as_ref();
        if self.store.is_closed() {
            return Err(StoreError::Closed.into());
        }
        let text = std::fs::read_to_string(path)?;
        let value = json::from_json_str(&text)?;
        self.store.replace_root(value)?;
        debug!(path = %path.display(), "loaded dictionary");
        Ok(())
    }

    // ---- Lifecycle ----

    /// Marks the dictionary closed; every later operation (including through
    /// previously retrieved handles) fails with `Closed`. Idempotent.
    ///
    /// No resource beyond the in-process lock is held, so this exists for
    /// scoped-use call sites rather than for cleanup.
    pub fn close(&self) {
        self.store.close();
    }

    /// Returns true once [`close`](JsonDict::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.store.is_closed()
    }
}

impl Default for JsonDict {
    fn default() -> Self {
        Self::new()
    }
}
