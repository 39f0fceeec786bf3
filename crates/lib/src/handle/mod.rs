//! Live handles into the document tree.
//!
//! Retrieving a nested map or list from a [`JsonDict`](crate::JsonDict) does
//! not copy it. Instead the caller gets a [`MapHandle`] or [`ListHandle`]: a
//! non-owning view made of a shared reference to the
//! [`RootStore`](crate::store::RootStore) plus the [`Path`] from the root to
//! the target. Every operation re-resolves that path under the store's lock,
//! so a mutation through any handle is immediately visible through the root
//! and through every other handle addressing the same location.
//!
//! Handles can go stale: if an ancestor of the path is removed or replaced,
//! operations fail with [`StoreError::StaleReference`](crate::store::StoreError)
//! instead of silently acting on an unrelated node.

mod list;
mod map;

pub use list::{ListHandle, ListIter};
pub use map::{Entries, Keys, MapHandle, Values};

use std::sync::Arc;

use crate::{path::Path, store::RootStore, value::Value};

/// The result of retrieving a value from the tree.
///
/// Scalars are returned as immutable copies; containers come back as live
/// handles. The variant is the explicit "kind" tag callers branch on.
///
/// # Examples
///
/// ```
/// use jsondict::{JsonDict, Node, Value};
///
/// let dict = JsonDict::new();
/// dict.set("count", 3)?;
/// dict.set("inner", Value::empty_map())?;
///
/// match dict.get("count")?.unwrap() {
///     Node::Int(n) => assert_eq!(n, 3),
///     other => panic!("unexpected {}", other.type_name()),
/// }
/// let inner = dict.get("inner")?.unwrap().into_map().unwrap();
/// inner.set("nested", true)?;
/// # Ok::<(), jsondict::Error>(())
/// ```
#[derive(Debug, Clone)]
pub enum Node {
    /// Copied null scalar
    Null,
    /// Copied boolean scalar
    Bool(bool),
    /// Copied integer scalar
    Int(i64),
    /// Copied float scalar
    Float(f64),
    /// Copied text scalar
    Text(String),
    /// Live handle to a nested map
    Map(MapHandle),
    /// Live handle to a nested list
    List(ListHandle),
}

impl Node {
    /// Builds a `Node` for the value at `path`, copying scalars and wrapping
    /// containers in handles.
    pub(crate) fn from_borrowed(store: &Arc<RootStore>, path: Path, value: &Value) -> Node {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(*b),
            Value::Int(n) => Node::Int(*n),
            Value::Float(x) => Node::Float(*x),
            Value::Text(s) => Node::Text(s.clone()),
            Value::Map(_) => Node::Map(MapHandle::new(Arc::clone(store), path)),
            Value::List(_) => Node::List(ListHandle::new(Arc::clone(store), path)),
        }
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Int(_) => "int",
            Node::Float(_) => "float",
            Node::Text(_) => "text",
            Node::Map(_) => "map",
            Node::List(_) => "list",
        }
    }

    /// Returns true if this is a scalar copy rather than a live handle
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Node::Map(_) | Node::List(_))
    }

    /// Attempts to convert to a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to convert to an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Node::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to convert to a float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Node::Float(x) => Some(*x),
            Node::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Attempts to convert to a string slice
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the map handle, if this node is one
    pub fn as_map(&self) -> Option<&MapHandle> {
        match self {
            Node::Map(handle) => Some(handle),
            _ => None,
        }
    }

    /// Returns the list handle, if this node is one
    pub fn as_list(&self) -> Option<&ListHandle> {
        match self {
            Node::List(handle) => Some(handle),
            _ => None,
        }
    }

    /// Consumes the node, returning the map handle if it is one
    pub fn into_map(self) -> Option<MapHandle> {
        match self {
            Node::Map(handle) => Some(handle),
            _ => None,
        }
    }

    /// Consumes the node, returning the list handle if it is one
    pub fn into_list(self) -> Option<ListHandle> {
        match self {
            Node::List(handle) => Some(handle),
            _ => None,
        }
    }

    /// Materializes the node as a plain [`Value`].
    ///
    /// Scalars convert directly; handles take a deep snapshot of their
    /// current target (and can therefore fail if the handle is stale).
    pub fn to_value(&self) -> crate::Result<Value> {
        match self {
            Node::Null => Ok(Value::Null),
            Node::Bool(b) => Ok(Value::Bool(*b)),
            Node::Int(n) => Ok(Value::Int(*n)),
            Node::Float(x) => Ok(Value::Float(*x)),
            Node::Text(s) => Ok(Value::Text(s.clone())),
            Node::Map(handle) => handle.to_value(),
            Node::List(handle) => handle.to_value(),
        }
    }
}
