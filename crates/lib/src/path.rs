//! Path types and raw path resolution.
//!
//! Fields and their properties are addressed with slash-delimited paths such
//! as `definitions/parameter` or `schema/type`. This module provides the owned
//! [`FieldPath`] type plus the raw resolvers that walk a path through nested
//! [`Value`]s.
//!
//! # Reserved Segments
//!
//! - `#` - stays at the root of the current traversal
//! - `..` / `.` - parent / current field (field references only)
//! - `:child` - the live child of a lazy link (field references only)
//!
//! # Usage
//!
//! ```rust
//! use fieldtree::{FieldPath, Value, path::resolve_raw_path};
//!
//! let props: Value = serde_json::from_str(r#"{"schema": {"type": "string"}}"#)?;
//! let path: FieldPath = "#/schema//type".parse()?;
//! assert_eq!(path.as_str(), "#/schema/type");
//!
//! let segments: Vec<&str> = path.components().collect();
//! assert_eq!(resolve_raw_path(&props, &segments)?, &Value::from("string"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{convert::Infallible, fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

use crate::{
    Value,
    constants::{ROOT_SEGMENT, SEGMENT_SEPARATOR},
};

/// Error type for path resolution failures.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A path with no components was given where one is required
    #[error("Empty path: {context}")]
    Empty { context: String },

    /// An intermediate or terminal segment does not exist
    #[error("Missing segment '{segment}' in path '{path}'")]
    MissingSegment { segment: String, path: String },

    /// A segment tried to step into a leaf value
    #[error("Cannot step into {found} value at segment '{segment}' in path '{path}'")]
    NotAContainer {
        segment: String,
        path: String,
        found: &'static str,
    },
}

impl PathError {
    /// Check if this error is caused by an absent segment
    pub fn is_missing_segment(&self) -> bool {
        matches!(self, PathError::MissingSegment { .. })
    }

    /// Check if this error is caused by stepping into a leaf value
    pub fn is_not_a_container(&self) -> bool {
        matches!(self, PathError::NotAContainer { .. })
    }

    /// Get the offending segment, if the error is tied to one
    pub fn segment(&self) -> Option<&str> {
        match self {
            PathError::MissingSegment { segment, .. }
            | PathError::NotAContainer { segment, .. } => Some(segment),
            PathError::Empty { .. } => None,
        }
    }
}

// Conversion from PathError to the main Error type
impl From<PathError> for crate::Error {
    fn from(err: PathError) -> Self {
        crate::Error::Path(err)
    }
}

/// Normalizes a path string by dropping empty segments.
///
/// ```rust
/// # use fieldtree::path::normalize_path;
/// assert_eq!(normalize_path(""), "");
/// assert_eq!(normalize_path("/a//b/"), "a/b");
/// assert_eq!(normalize_path("#/a"), "#/a");
/// ```
pub fn normalize_path(input: &str) -> String {
    input
        .split(SEGMENT_SEPARATOR)
        .filter(|component| !component.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// An owned, normalized slash-delimited path.
///
/// Construction never fails; empty segments are dropped.
///
/// ```rust
/// # use fieldtree::FieldPath;
/// let path = FieldPath::new().push("definitions").push("parameter/schema");
/// assert_eq!(path.as_str(), "definitions/parameter/schema");
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.last(), Some("schema"));
/// assert_eq!(path.parent().unwrap().as_str(), "definitions/parameter");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct FieldPath {
    inner: String,
}

impl FieldPath {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Self {
            inner: String::new(),
        }
    }

    /// Creates a path by normalizing the input string.
    pub fn normalize(path: &str) -> Self {
        Self {
            inner: normalize_path(path),
        }
    }

    /// Appends one or more segments to the end of this path.
    pub fn push(mut self, path: impl AsRef<str>) -> Self {
        let normalized = normalize_path(path.as_ref());
        if normalized.is_empty() {
            return self;
        }

        if !self.inner.is_empty() {
            self.inner.push(SEGMENT_SEPARATOR);
        }
        self.inner.push_str(&normalized);
        self
    }

    /// Joins this path with another path.
    pub fn join(self, other: &FieldPath) -> Self {
        self.push(other.as_str())
    }

    /// Returns an iterator over the path components.
    pub fn components(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.inner
            .split(SEGMENT_SEPARATOR)
            .filter(|s| !s.is_empty())
    }

    /// Returns the number of components in the path.
    pub fn len(&self) -> usize {
        self.components().count()
    }

    /// Returns `true` if the path has no components.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` if the path starts at the root of the tree.
    pub fn is_absolute(&self) -> bool {
        self.components().next() == Some(ROOT_SEGMENT)
    }

    /// Returns the path without its last component, or `None` if empty.
    pub fn parent(&self) -> Option<FieldPath> {
        if self.inner.is_empty() {
            return None;
        }
        Some(match self.inner.rfind(SEGMENT_SEPARATOR) {
            Some(last) => FieldPath {
                inner: self.inner[..last].to_string(),
            },
            None => FieldPath::new(),
        })
    }

    /// Returns the last component of the path, or `None` if empty.
    pub fn last(&self) -> Option<&str> {
        self.components().next_back()
    }

    /// Splits the path into its leading components and its last component.
    pub fn split_last(&self) -> Option<(Vec<&str>, &str)> {
        let mut components: Vec<&str> = self.components().collect();
        let last = components.pop()?;
        Some((components, last))
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl FromStr for FieldPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FieldPath::normalize(s))
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        FieldPath::normalize(s)
    }
}

impl From<String> for FieldPath {
    fn from(s: String) -> Self {
        FieldPath::normalize(&s)
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

fn display_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/")
}

fn missing<S: AsRef<str>>(segment: &str, segments: &[S]) -> PathError {
    PathError::MissingSegment {
        segment: segment.to_string(),
        path: display_path(segments),
    }
}

fn not_a_container<S: AsRef<str>>(segment: &str, segments: &[S], found: &Value) -> PathError {
    PathError::NotAContainer {
        segment: segment.to_string(),
        path: display_path(segments),
        found: found.type_name(),
    }
}

/// Resolves `segments` against a nested value.
///
/// An empty path returns `value` unchanged. A `#` segment is consumed without
/// moving. Any other segment steps into a map key, or a list index when the
/// current value is a list. Absent keys fail immediately; there is no
/// defaulting of missing containers.
pub fn resolve_raw_path<'v, S: AsRef<str>>(
    value: &'v Value,
    segments: &[S],
) -> Result<&'v Value, PathError> {
    resolve_from(value, segments, 0)
}

fn resolve_from<'v, S: AsRef<str>>(
    value: &'v Value,
    segments: &[S],
    cursor: usize,
) -> Result<&'v Value, PathError> {
    let Some(segment) = segments.get(cursor) else {
        return Ok(value);
    };
    let segment = segment.as_ref();
    if segment == ROOT_SEGMENT {
        return resolve_from(value, segments, cursor + 1);
    }

    let next = match value {
        Value::Map(map) => map.get(segment),
        Value::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        other => return Err(not_a_container(segment, segments, other)),
    };
    let next = next.ok_or_else(|| missing(segment, segments))?;
    resolve_from(next, segments, cursor + 1)
}

/// Mutable counterpart of [`resolve_raw_path`].
pub fn resolve_raw_path_mut<'v, S: AsRef<str>>(
    value: &'v mut Value,
    segments: &[S],
) -> Result<&'v mut Value, PathError> {
    resolve_from_mut(value, segments, 0)
}

fn resolve_from_mut<'v, S: AsRef<str>>(
    value: &'v mut Value,
    segments: &[S],
    cursor: usize,
) -> Result<&'v mut Value, PathError> {
    let Some(segment) = segments.get(cursor) else {
        return Ok(value);
    };
    let segment = segment.as_ref();
    if segment == ROOT_SEGMENT {
        return resolve_from_mut(value, segments, cursor + 1);
    }

    let next = match value {
        Value::Map(map) => map.get_mut(segment),
        Value::List(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(move |i| items.get_mut(i)),
        other => return Err(not_a_container(segment, segments, other)),
    };
    let next = next.ok_or_else(|| missing(segment, segments))?;
    resolve_from_mut(next, segments, cursor + 1)
}
