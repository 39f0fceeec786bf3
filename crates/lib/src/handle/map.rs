//! Map-view handle over a location in the document tree.

use std::sync::Arc;

use crate::{
    Result,
    handle::Node,
    path::Path,
    store::{RootStore, StoreError},
    value::{Map, Value},
};

/// A live handle to a map inside the tree.
///
/// The handle stores no data; it re-resolves its path through the
/// [`RootStore`] on every operation, so mutations through it are visible
/// from the root and from every other handle to the same location. If the
/// path stops resolving to a map, operations fail with
/// [`StoreError::StaleReference`].
#[derive(Debug, Clone)]
pub struct MapHandle {
    store: Arc<RootStore>,
    path: Path,
}

impl MapHandle {
    pub(crate) fn new(store: Arc<RootStore>, path: Path) -> Self {
        Self { store, path }
    }

    /// Returns the path of this handle relative to the root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn stale(&self) -> crate::Error {
        StoreError::StaleReference {
            path: self.path.to_string(),
        }
        .into()
    }

    /// Runs `f` against the map at this handle's path, translating a missing
    /// or non-map target into `StaleReference`.
    fn with_map<R>(&self, f: impl FnOnce(&Map) -> R) -> Result<R> {
        match self.store.with_value(&self.path, |value| value.as_map().map(f)) {
            Ok(Some(result)) => Ok(result),
            Ok(None) => Err(self.stale()),
            Err(crate::Error::Store(StoreError::NotFound { .. })) => Err(self.stale()),
            Err(err) => Err(err),
        }
    }

    /// Gets the value under `key`.
    ///
    /// Scalars come back as copies; nested containers come back as live
    /// handles with this handle's path extended by `key`. Returns `Ok(None)`
    /// if the key is absent.
    pub fn get(&self, key: impl AsRef<str>) -> Result<Option<Node>> {
        let _guard = self.store.lock()?;
        self.with_map(|_| ())?;
        let child = self.path.child(key.as_ref());
        match self
            .store
            .with_value(&child, |value| Node::from_borrowed(&self.store, child.clone(), value))
        {
            Ok(node) => Ok(Some(node)),
            Err(crate::Error::Store(StoreError::NotFound { .. })) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Gets a deep copy of the value under `key`, or `default` if absent.
    pub fn get_or(&self, key: impl AsRef<str>, default: impl Into<Value>) -> Result<Value> {
        let _guard = self.store.lock()?;
        self.with_map(|_| ())?;
        let child = self.path.child(key.as_ref());
        match self.store.with_value(&child, Value::clone) {
            Ok(value) => Ok(value),
            Err(crate::Error::Store(StoreError::NotFound { .. })) => Ok(default.into()),
            Err(err) => Err(err),
        }
    }

    /// Sets `key` to `value`.
    ///
    /// A new key is appended to the map's insertion order; an existing key
    /// keeps its position.
    pub fn set(&self, key: impl AsRef<str>, value: impl Into<Value>) -> Result<()> {
        let _guard = self.store.lock()?;
        self.with_map(|_| ())?;
        self.store
            .assign(&self.path.child(key.as_ref()), value.into())
    }

    /// Removes `key`, returning its value.
    ///
    /// Fails with [`StoreError::NotFound`] if the key is absent. Remaining
    /// keys keep their insertion order.
    pub fn remove(&self, key: impl AsRef<str>) -> Result<Value> {
        let _guard = self.store.lock()?;
        self.with_map(|_| ())?;
        self.store.remove(&self.path.child(key.as_ref()))
    }

    /// Returns true if the map contains `key`.
    pub fn contains_key(&self, key: impl AsRef<str>) -> Result<bool> {
        let key = key.as_ref().to_string();
        self.with_map(|entries| entries.contains_key(&key))
    }

    /// Returns the number of keys.
    pub fn len(&self) -> Result<usize> {
        self.with_map(|entries| entries.len())
    }

    /// Returns true if the map has no keys.
    pub fn is_empty(&self) -> Result<bool> {
        self.with_map(|entries| entries.is_empty())
    }

    /// Returns an iterator over the keys, in insertion order, snapshotted at
    /// call time. Later mutation of the tree does not affect it.
    pub fn keys(&self) -> Result<Keys> {
        let keys = self.with_map(|entries| entries.keys().cloned().collect::<Vec<_>>())?;
        Ok(Keys {
            inner: keys.into_iter(),
        })
    }

    /// Returns an iterator over deep copies of the values, in insertion
    /// order, snapshotted at call time.
    pub fn values(&self) -> Result<Values> {
        let values = self.with_map(|entries| entries.values().cloned().collect::<Vec<_>>())?;
        Ok(Values {
            inner: values.into_iter(),
        })
    }

    /// Returns an iterator over `(key, value)` pairs (values deep-copied),
    /// in insertion order, snapshotted at call time.
    pub fn entries(&self) -> Result<Entries> {
        let entries = self.with_map(|entries| {
            entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Vec<_>>()
        })?;
        Ok(Entries {
            inner: entries.into_iter(),
        })
    }

    /// Removes every key by replacing the map with an empty one.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.store.lock()?;
        self.with_map(|_| ())?;
        self.store.assign(&self.path, Value::empty_map())
    }

    /// Sets every `(key, value)` pair from `entries`, atomically with
    /// respect to concurrent readers: the whole batch happens under one
    /// lock acquisition.
    pub fn update<K, V>(&self, entries: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let _guard = self.store.lock()?;
        self.with_map(|_| ())?;
        for (key, value) in entries {
            self.store.assign(&self.path.child(key.into()), value.into())?;
        }
        Ok(())
    }

    /// Gets the value under `key`, inserting `default` first if the key is
    /// absent.
    pub fn get_or_insert(&self, key: impl AsRef<str>, default: impl Into<Value>) -> Result<Node> {
        let _guard = self.store.lock()?;
        let key = key.as_ref();
        let present = self.with_map(|entries| entries.contains_key(key))?;
        let child = self.path.child(key);
        if !present {
            self.store.assign(&child, default.into())?;
        }
        self.store
            .with_value(&child, |value| Node::from_borrowed(&self.store, child.clone(), value))
    }

    /// Takes a deep snapshot of the map this handle points at.
    pub fn to_value(&self) -> Result<Value> {
        self.with_map(|entries| Value::Map(entries.clone()))
    }
}

/// Snapshot iterator over map keys.
#[derive(Debug, Clone)]
pub struct Keys {
    inner: std::vec::IntoIter<String>,
}

impl Iterator for Keys {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Keys {}

/// Snapshot iterator over deep copies of map values.
#[derive(Debug, Clone)]
pub struct Values {
    inner: std::vec::IntoIter<Value>,
}

impl Iterator for Values {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Values {}

/// Snapshot iterator over `(key, value)` pairs.
#[derive(Debug, Clone)]
pub struct Entries {
    inner: std::vec::IntoIter<(String, Value)>,
}

impl Iterator for Entries {
    type Item = (String, Value);

    fn next(&mut self) -> Option<(String, Value)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Entries {}
