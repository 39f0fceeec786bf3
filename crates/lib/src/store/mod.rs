//! The lock-guarded owner of the document tree.
//!
//! [`RootStore`] owns the root [`Value`] (always a map) and the single
//! reentrant lock that serializes all reads and writes. Every operation on
//! the dictionary, at any nesting depth, goes through the path-addressed
//! primitives here: [`resolve`](RootStore::resolve),
//! [`assign`](RootStore::assign), [`remove`](RootStore::remove),
//! [`snapshot`](RootStore::snapshot) and
//! [`replace_root`](RootStore::replace_root).
//!
//! The lock is reentrant so that compound operations (for example a list
//! append, which resolves the current list and then assigns the new one) can
//! hold the guard across several primitive calls from the same thread
//! without deadlocking. Lock hold times are O(path depth) plus the size of
//! the value being copied; no I/O happens under the lock.

mod errors;

pub use errors::StoreError;

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use tracing::debug;

use crate::{
    Result,
    path::{Path, Step},
    value::Value,
};

/// Guard over the store's reentrant lock.
///
/// Holding the guard pins the tree: no other thread can observe or apply a
/// mutation until it is dropped. Primitives re-acquire the lock reentrantly,
/// so a holder may call them freely.
pub(crate) type StoreGuard<'a> = ReentrantMutexGuard<'a, RefCell<Value>>;

/// Owner of the root value and its lock.
///
/// The root is always a [`Value::Map`]; operations that would replace it
/// with anything else fail with [`StoreError::InvalidRootType`]. All state
/// is process-local: dropping the store drops the tree.
#[derive(Debug)]
pub struct RootStore {
    root: ReentrantMutex<RefCell<Value>>,
    closed: AtomicBool,
}

impl RootStore {
    /// Creates a store with an empty root map.
    pub fn new() -> Self {
        Self {
            root: ReentrantMutex::new(RefCell::new(Value::empty_map())),
            closed: AtomicBool::new(false),
        }
    }

    /// Acquires the lock, failing if the store has been closed.
    pub(crate) fn lock(&self) -> Result<StoreGuard<'_>> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed.into());
        }
        Ok(self.root.lock())
    }

    /// Resolves `path` and returns a deep copy of the value there.
    ///
    /// Fails with [`StoreError::NotFound`] if any step addresses a missing
    /// key or index, or tries to step into a scalar.
    pub fn resolve(&self, path: &Path) -> Result<Value> {
        let guard = self.lock()?;
        let root = guard.borrow();
        descend(&root, path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    /// Runs `f` against a borrow of the value at `path`, without copying it.
    ///
    /// Same resolution rules as [`resolve`](RootStore::resolve); the borrow
    /// (and the lock) lasts only for the duration of `f`.
    pub(crate) fn with_value<R>(&self, path: &Path, f: impl FnOnce(&Value) -> R) -> Result<R> {
        let guard = self.lock()?;
        let root = guard.borrow();
        let value = descend(&root, path).ok_or_else(|| not_found(path))?;
        Ok(f(value))
    }

    /// Inserts or overwrites the value at `path`.
    ///
    /// The parent of `path` must already exist. Inserting a new map key
    /// appends it to the parent's insertion order; overwriting an existing
    /// key keeps its position. Assigning a list index at or past the current
    /// length fails with [`StoreError::IndexOutOfRange`]; there is no
    /// auto-extension. An empty `path` replaces the root itself, which must
    /// remain a map.
    ///
    /// On failure the tree is left exactly as it was.
    pub fn assign(&self, path: &Path, value: Value) -> Result<()> {
        let guard = self.lock()?;
        let Some((parent, step)) = path.split_last() else {
            return self.swap_root(&guard, value);
        };
        let mut root = guard.borrow_mut();
        let container = descend_mut(&mut root, &parent).ok_or_else(|| not_found(&parent))?;
        match (container, step) {
            (Value::Map(entries), Step::Key(key)) => {
                entries.insert(key.clone(), value);
                Ok(())
            }
            (Value::List(items), Step::Index(index)) => {
                if *index >= items.len() {
                    return Err(StoreError::IndexOutOfRange {
                        index: *index,
                        len: items.len(),
                    }
                    .into());
                }
                items[*index] = value;
                Ok(())
            }
            _ => Err(not_found(path)),
        }
    }

    /// Removes and returns the value at `path`.
    ///
    /// Fails with [`StoreError::NotFound`] if the path does not resolve.
    /// Removing a list index shifts later elements down by one; handles
    /// addressing those elements now point at their successors (the
    /// staleness contract, accepted rather than corrected).
    pub fn remove(&self, path: &Path) -> Result<Value> {
        let guard = self.lock()?;
        let (parent, step) = path.split_last().ok_or_else(|| not_found(path))?;
        let mut root = guard.borrow_mut();
        let container = descend_mut(&mut root, &parent).ok_or_else(|| not_found(&parent))?;
        match (container, step) {
            (Value::Map(entries), Step::Key(key)) => {
                // shift_remove keeps the insertion order of remaining keys
                entries.shift_remove(key).ok_or_else(|| not_found(path))
            }
            (Value::List(items), Step::Index(index)) => {
                if *index >= items.len() {
                    return Err(not_found(path));
                }
                Ok(items.remove(*index))
            }
            _ => Err(not_found(path)),
        }
    }

    /// Returns a deep, independent copy of the root map, taken atomically.
    pub fn snapshot(&self) -> Result<Value> {
        let guard = self.lock()?;
        let root = guard.borrow();
        Ok(root.clone())
    }

    /// Atomically swaps the entire root value.
    ///
    /// `value` must be a map or the call fails with
    /// [`StoreError::InvalidRootType`] and the previous tree is kept.
    pub fn replace_root(&self, value: Value) -> Result<()> {
        let guard = self.lock()?;
        self.swap_root(&guard, value)
    }

    fn swap_root(&self, guard: &StoreGuard<'_>, value: Value) -> Result<()> {
        if !matches!(value, Value::Map(_)) {
            return Err(StoreError::InvalidRootType {
                actual: value.type_name().to_string(),
            }
            .into());
        }
        *guard.borrow_mut() = value;
        debug!("root value replaced");
        Ok(())
    }

    /// Marks the store closed; every subsequent operation fails with
    /// [`StoreError::Closed`]. Idempotent.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!("store closed");
        }
    }

    /// Returns true once [`close`](RootStore::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Default for RootStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(path: &Path) -> crate::Error {
    StoreError::NotFound {
        path: path.to_string(),
    }
    .into()
}

/// Follows `path` through `current`, read-only.
fn descend<'a>(mut current: &'a Value, path: &Path) -> Option<&'a Value> {
    for step in path.iter() {
        current = match (current, step) {
            (Value::Map(entries), Step::Key(key)) => entries.get(key)?,
            (Value::List(items), Step::Index(index)) => items.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Follows `path` through `current`, yielding a mutable reference.
fn descend_mut<'a>(mut current: &'a mut Value, path: &Path) -> Option<&'a mut Value> {
    for step in path.iter() {
        current = match (current, step) {
            (Value::Map(entries), Step::Key(key)) => entries.get_mut(key)?,
            (Value::List(items), Step::Index(index)) => items.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(current)
}
