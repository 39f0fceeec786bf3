//! Path types for addressing locations inside the document tree.
//!
//! A [`Path`] is an ordered sequence of [`Step`]s (map keys or list indices)
//! describing a location by traversal from the root. Paths identify a
//! location, not a cached pointer: they are only meaningful relative to the
//! store that produced them, and they can go stale when an ancestor is
//! removed or replaced.

use std::fmt;

/// One traversal step: a map key or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Key into a map
    Key(String),
    /// Index into a list
    Index(usize),
}

impl Step {
    /// Returns the map key, if this step is one.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Step::Key(key) => Some(key),
            Step::Index(_) => None,
        }
    }

    /// Returns the list index, if this step is one.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Step::Index(index) => Some(*index),
            Step::Key(_) => None,
        }
    }
}

impl From<&str> for Step {
    fn from(key: &str) -> Self {
        Step::Key(key.to_string())
    }
}

impl From<String> for Step {
    fn from(key: String) -> Self {
        Step::Key(key)
    }
}

impl From<usize> for Step {
    fn from(index: usize) -> Self {
        Step::Index(index)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Key(key) => write!(f, "{key}"),
            Step::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// An ordered sequence of steps locating a value relative to the root.
///
/// The empty path addresses the root map itself.
///
/// # Examples
///
/// ```
/// use jsondict::Path;
///
/// let path = Path::new().push("users").push(0usize).push("name");
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.to_string(), "users[0].name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    steps: Vec<Step>,
}

impl Path {
    /// Creates a new empty path (addressing the root).
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Adds a step to the end of this path.
    pub fn push(mut self, step: impl Into<Step>) -> Self {
        self.steps.push(step.into());
        self
    }

    /// Returns a new path with `step` appended, leaving this path intact.
    pub fn child(&self, step: impl Into<Step>) -> Self {
        self.clone().push(step)
    }

    /// Returns the parent path and final step, or `None` if this is the root.
    pub fn split_last(&self) -> Option<(Path, &Step)> {
        let (last, parent) = self.steps.split_last()?;
        Some((
            Path {
                steps: parent.to_vec(),
            },
            last,
        ))
    }

    /// Returns the parent path, or `None` if this is the root.
    pub fn parent(&self) -> Option<Path> {
        self.split_last().map(|(parent, _)| parent)
    }

    /// Returns the last step, or `None` if the path is empty.
    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Returns the number of steps in the path.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the path has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns an iterator over the steps.
    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }
}

impl<S: Into<Step>> FromIterator<S> for Path {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Path {
            steps: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "(root)");
        }
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                Step::Key(key) if i > 0 => write!(f, ".{key}")?,
                _ => write!(f, "{step}")?,
            }
        }
        Ok(())
    }
}
