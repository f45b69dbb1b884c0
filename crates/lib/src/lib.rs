//!
//! fieldtree: a schema-driven tree of typed input fields.
//! This library provides the field tree used to edit structured documents, with lazy links
//! that materialize clones of other fields only while they are displayed.
//!
//! ## Core Concepts
//!
//! * **Fields (`field::FieldNode`)**: A node with a key, declarative properties and a kind:
//!   an input leaf, an object with keyed children, or a lazy link.
//! * **Field Trees (`field::FieldTree`)**: The arena owning every field. Fields are addressed
//!   with generational `FieldId` handles, so handles to destroyed fields are detected.
//! * **Lazy Links (`field::LazyLinkField`)**: A field that stands in for a clone of its
//!   `target`. The clone is created when the link is displayed and destroyed when it is
//!   hidden, with its value buffered in between.
//! * **Overrides (`overrides::Overrides`)**: Ordered property edits applied to each clone.
//! * **Values (`value::Value`)**: The dynamic value model for field values and properties.
//! * **Schemas (`schema::FieldSchema`)**: JSON descriptions a tree can be built from.

pub mod constants;
pub mod field;
pub mod overrides;
pub mod path;
pub mod schema;
pub mod validation;
pub mod value;

pub use field::{
    FieldError, FieldId, FieldKind, FieldNode, FieldTree, InputField, InputType, LazyLinkArgs,
    LazyLinkField, LinkState, ObjectField, RefreshReport,
};
pub use overrides::{Override, OverrideKey, Overrides};
pub use path::{FieldPath, PathError};
pub use schema::{FieldSchema, KindSchema};
pub use validation::{FieldIssue, IssueKind, Validation, ValidationErrors};
pub use value::Value;

/// Result type used throughout the fieldtree library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the fieldtree library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured field tree errors from the field module
    #[error(transparent)]
    Field(field::FieldError),

    /// Structured path resolution errors from the path module
    #[error(transparent)]
    Path(path::PathError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Field(_) => "field",
            Error::Path(_) => "path",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error was caused by a handle to a removed field.
    pub fn is_stale_handle(&self) -> bool {
        match self {
            Error::Field(field_err) => field_err.is_stale_handle(),
            _ => false,
        }
    }

    /// Check if this error points at a misconfigured lazy link target or override.
    pub fn is_link_configuration_error(&self) -> bool {
        match self {
            Error::Field(field_err) => field_err.is_link_configuration_error(),
            _ => false,
        }
    }

    /// Check if this error was caused by an operation on the wrong kind of field.
    pub fn is_kind_error(&self) -> bool {
        match self {
            Error::Field(field_err) => field_err.is_kind_error(),
            _ => false,
        }
    }

    /// Check if this error is related to tree structure.
    pub fn is_structure_error(&self) -> bool {
        match self {
            Error::Field(field_err) => field_err.is_structure_error(),
            _ => false,
        }
    }

    /// Check if this error is path-related.
    pub fn is_path_error(&self) -> bool {
        match self {
            Error::Path(_) => true,
            Error::Field(FieldError::Override { .. }) => true,
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// Check if this error came from parsing or writing JSON.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }
}
