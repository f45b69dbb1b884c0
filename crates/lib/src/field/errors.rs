//! Error types for field tree operations.
//!
//! Most of these are structural: they point at a misconfigured schema (a link
//! target that does not exist, an override path that does not match the
//! cloned field) or at a caller holding on to a handle after the field it
//! named was destroyed.

use thiserror::Error;

use super::FieldId;
use crate::path::PathError;

/// Structured error types for field tree operations.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    /// The handle refers to a field that has been removed
    #[error("Stale field handle {id}: the field was removed from the tree")]
    StaleHandle { id: FieldId },

    /// A root was added to a tree that already has one
    #[error("Field tree already has a root")]
    RootExists,

    /// Two children of the same object share a key
    #[error("Duplicate key '{key}' under field '{parent}'")]
    DuplicateKey { parent: String, key: String },

    /// An object-only operation was applied to another kind of field
    #[error("Field '{field}' is not an object field")]
    NotAnObject { field: String },

    /// A link-only operation was applied to another kind of field
    #[error("Field '{field}' is not a lazy link")]
    NotALazyLink { field: String },

    /// The field is owned by a lazy link and can only be destroyed by it
    #[error("Field '{field}' is owned by a lazy link")]
    OwnedByLink { field: String },

    /// A lazy link's target does not resolve to a field
    #[error("Lazy link '{field}' target '{target}' does not resolve to a field")]
    TargetNotFound { field: String, target: String },

    /// The element path of a scoped override does not resolve inside the clone
    #[error("Override '{key}' on '{field}': element '{scope}' not found")]
    OverrideScopeNotFound {
        field: String,
        key: String,
        scope: String,
    },

    /// An override path does not match the cloned field's properties
    #[error("Override '{key}' on '{field}' failed: {source}")]
    Override {
        field: String,
        key: String,
        #[source]
        source: PathError,
    },

    /// A value of the wrong shape was assigned to a field
    #[error("Field '{field}' expected {expected}, found {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl FieldError {
    /// Check if this error was caused by a stale handle
    pub fn is_stale_handle(&self) -> bool {
        matches!(self, FieldError::StaleHandle { .. })
    }

    /// Check if this error points at a misconfigured lazy link
    pub fn is_link_configuration_error(&self) -> bool {
        matches!(
            self,
            FieldError::TargetNotFound { .. }
                | FieldError::OverrideScopeNotFound { .. }
                | FieldError::Override { .. }
        )
    }

    /// Check if this error was caused by applying an operation to the wrong kind of field
    pub fn is_kind_error(&self) -> bool {
        matches!(
            self,
            FieldError::NotAnObject { .. }
                | FieldError::NotALazyLink { .. }
                | FieldError::TypeMismatch { .. }
        )
    }

    /// Check if this error is related to tree structure
    pub fn is_structure_error(&self) -> bool {
        matches!(
            self,
            FieldError::RootExists
                | FieldError::DuplicateKey { .. }
                | FieldError::OwnedByLink { .. }
        )
    }

    /// Get the override key if this is an override failure
    pub fn override_key(&self) -> Option<&str> {
        match self {
            FieldError::OverrideScopeNotFound { key, .. } | FieldError::Override { key, .. } => {
                Some(key)
            }
            _ => None,
        }
    }
}

// Conversion from FieldError to the main Error type
impl From<FieldError> for crate::Error {
    fn from(err: FieldError) -> Self {
        crate::Error::Field(err)
    }
}
