//!
//! jsondict: a thread-safe, dictionary-like tree of JSON-compatible values.
//!
//! ## Core Concepts
//!
//! * **Values (`value::Value`)**: The JSON-compatible data model. Maps keep
//!   their insertion order; lists keep positional order.
//! * **Paths (`path::Path`)**: A sequence of map keys and list indices
//!   addressing one location inside the tree.
//! * **Store (`store::RootStore`)**: The shared tree behind one reentrant
//!   lock. Every read and write from every handle goes through it.
//! * **Handles (`handle::MapHandle`, `handle::ListHandle`)**: Live views over
//!   a location in the tree. Handles store no data; they re-resolve their
//!   path on each operation, so mutations write through to the shared tree
//!   and are visible from the root and from every other handle.
//! * **Dictionary (`dict::JsonDict`)**: The top-level facade. Behaves like a
//!   mutable map at the root and persists to and from JSON text on disk.
//!
//! ## Quick start
//!
//! ```
//! use jsondict::{JsonDict, Value};
//!
//! let dict = JsonDict::new();
//! dict.set("users", Value::empty_list())?;
//! let users = dict.get("users")?.unwrap().into_list().unwrap();
//! users.push("alice")?;
//! assert_eq!(dict.get_or("users", Value::Null)?, Value::List(vec![Value::Text("alice".into())]));
//! # Ok::<(), jsondict::Error>(())
//! ```

pub mod dict;
pub mod handle;
pub mod json;
pub mod path;
pub mod store;
pub mod value;

pub use dict::{DictError, JsonDict};
pub use handle::{Entries, Keys, ListHandle, ListIter, MapHandle, Node, Values};
pub use json::{WriteOptions, from_json_str, to_json_string};
pub use path::{Path, Step};
pub use store::{RootStore, StoreError};
pub use value::{Map, Value};

/// Result type used throughout the jsondict library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the jsondict library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structured tree access errors from the store module
    #[error(transparent)]
    Store(StoreError),

    /// Structured dictionary errors from the dict module
    #[error(transparent)]
    Dict(DictError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::Store(_) => "store",
            Error::Dict(_) => "dict",
        }
    }

    /// Check if this error indicates a path or key was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates a list index past the end.
    pub fn is_out_of_range(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_out_of_range(),
            _ => false,
        }
    }

    /// Check if this error indicates a handle whose target no longer exists
    /// or changed kind.
    pub fn is_stale(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_stale(),
            _ => false,
        }
    }

    /// Check if this error indicates an operation on a closed dictionary.
    pub fn is_closed(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_closed(),
            _ => false,
        }
    }

    /// Check if this error came from parsing malformed JSON text.
    pub fn is_malformed_json(&self) -> bool {
        matches!(self, Error::Json(_))
    }

    /// Check if this error indicates a save/load with no configured path.
    pub fn is_no_path(&self) -> bool {
        match self {
            Error::Dict(dict_err) => dict_err.is_no_path(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}
