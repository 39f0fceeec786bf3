//! List-view handle over a location in the document tree.

use std::sync::Arc;

use crate::{
    Result,
    handle::Node,
    path::Path,
    store::{RootStore, StoreError},
    value::Value,
};

/// A live handle to a list inside the tree.
///
/// Like [`MapHandle`](crate::MapHandle), the handle stores no data and
/// re-resolves its path on every operation. Mutations are implemented as
/// whole-value replacement: the current list is resolved, the new list is
/// computed, and the result is assigned back at the same path, all under one
/// lock acquisition. Concurrent readers therefore never observe a
/// half-applied list edit.
///
/// Removing an element shifts later indices down; a handle (or path) built
/// against an index past the removed one now addresses a different element.
/// That is the staleness contract: index paths are positions, not element
/// identities.
#[derive(Debug, Clone)]
pub struct ListHandle {
    store: Arc<RootStore>,
    path: Path,
}

impl ListHandle {
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

    /// Runs `f` against the list at this handle's path, translating a
    /// missing or non-list target into `StaleReference`.
    fn with_list<R>(&self, f: impl FnOnce(&Vec<Value>) -> R) -> Result<R> {
        match self
            .store
            .with_value(&self.path, |value| value.as_list().map(f))
        {
            Ok(Some(result)) => Ok(result),
            Ok(None) => Err(self.stale()),
            Err(crate::Error::Store(StoreError::NotFound { .. })) => Err(self.stale()),
            Err(err) => Err(err),
        }
    }

    /// Replaces the whole list under an already-held guard.
    fn store_back(&self, items: Vec<Value>) -> Result<()> {
        self.store.assign(&self.path, Value::List(items))
    }

    /// Gets the element at `index`.
    ///
    /// Scalars come back as copies; nested containers come back as live
    /// handles with this handle's path extended by `index`.
    pub fn get(&self, index: usize) -> Result<Node> {
        let _guard = self.store.lock()?;
        let len = self.with_list(Vec::len)?;
        if index >= len {
            return Err(StoreError::IndexOutOfRange { index, len }.into());
        }
        let child = self.path.child(index);
        self.store.with_value(&child, |value| {
            Node::from_borrowed(&self.store, child.clone(), value)
        })
    }

    /// Overwrites the element at `index`.
    ///
    /// Fails with [`StoreError::IndexOutOfRange`] past the end; the list is
    /// never auto-extended.
    pub fn set(&self, index: usize, value: impl Into<Value>) -> Result<()> {
        let _guard = self.store.lock()?;
        self.with_list(|_| ())?;
        self.store.assign(&self.path.child(index), value.into())
    }

    /// Appends `value` to the end of the list.
    pub fn push(&self, value: impl Into<Value>) -> Result<()> {
        let _guard = self.store.lock()?;
        let mut items = self.with_list(Vec::clone)?;
        items.push(value.into());
        self.store_back(items)
    }

    /// Appends every value from `values`, atomically.
    pub fn extend<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Result<()> {
        let _guard = self.store.lock()?;
        let mut items = self.with_list(Vec::clone)?;
        items.extend(values.into_iter().map(Into::into));
        self.store_back(items)
    }

    /// Inserts `value` at `index`, shifting later elements up.
    ///
    /// `index` may equal the current length (append); anything past that
    /// fails with [`StoreError::IndexOutOfRange`].
    pub fn insert(&self, index: usize, value: impl Into<Value>) -> Result<()> {
        let _guard = self.store.lock()?;
        let mut items = self.with_list(Vec::clone)?;
        if index > items.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: items.len(),
            }
            .into());
        }
        items.insert(index, value.into());
        self.store_back(items)
    }

    /// Removes and returns the last element.
    pub fn pop(&self) -> Result<Value> {
        let _guard = self.store.lock()?;
        let len = self.with_list(Vec::len)?;
        if len == 0 {
            return Err(StoreError::IndexOutOfRange { index: 0, len: 0 }.into());
        }
        self.pop_at(len - 1)
    }

    /// Removes and returns the element at `index`, shifting later elements
    /// down.
    pub fn pop_at(&self, index: usize) -> Result<Value> {
        let _guard = self.store.lock()?;
        let mut items = self.with_list(Vec::clone)?;
        if index >= items.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: items.len(),
            }
            .into());
        }
        let removed = items.remove(index);
        self.store_back(items)?;
        Ok(removed)
    }

    /// Removes the first element equal to `value`.
    ///
    /// Fails with [`StoreError::NotFound`] if no element matches.
    pub fn remove_value(&self, value: &Value) -> Result<()> {
        let _guard = self.store.lock()?;
        let mut items = self.with_list(Vec::clone)?;
        let position = items.iter().position(|item| item == value).ok_or_else(|| {
            crate::Error::Store(StoreError::NotFound {
                path: self.path.to_string(),
            })
        })?;
        items.remove(position);
        self.store_back(items)
    }

    /// Removes every element by replacing the list with an empty one.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.store.lock()?;
        self.with_list(|_| ())?;
        self.store_back(Vec::new())
    }

    /// Returns the number of elements.
    pub fn len(&self) -> Result<usize> {
        self.with_list(Vec::len)
    }

    /// Returns true if the list has no elements.
    pub fn is_empty(&self) -> Result<bool> {
        self.with_list(Vec::is_empty)
    }

    /// Returns an iterator over deep copies of the elements, snapshotted at
    /// call time. Later mutation of the tree does not affect it.
    pub fn iter(&self) -> Result<ListIter> {
        let items = self.with_list(Vec::clone)?;
        Ok(ListIter {
            inner: items.into_iter(),
        })
    }

    /// Takes a deep snapshot of the list this handle points at.
    pub fn to_value(&self) -> Result<Value> {
        self.with_list(|items| Value::List(items.clone()))
    }
}

/// Snapshot iterator over deep copies of list elements.
#[derive(Debug, Clone)]
pub struct ListIter {
    inner: std::vec::IntoIter<Value>,
}

impl Iterator for ListIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ListIter {}
