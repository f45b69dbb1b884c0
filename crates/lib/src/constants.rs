//! Constants used throughout the fieldtree library.
//!
//! This module provides central definitions for reserved path segments and the
//! property names that the field base interprets.

/// Path segment addressing the root of the current traversal.
pub const ROOT_SEGMENT: &str = "#";

/// Path segment addressing the parent of the current field.
pub const PARENT_SEGMENT: &str = "..";

/// Path segment addressing the current field.
pub const SELF_SEGMENT: &str = ".";

/// Path segment stepping into a lazy link's materialized child.
pub const CHILD_SEGMENT: &str = ":child";

/// Separator between path segments.
pub const SEGMENT_SEPARATOR: char = '/';

/// Separator between the element path and the property path of a scoped override key.
pub const SCOPE_SEPARATOR: char = ';';

/// Target used by lazy links that were configured without one.
pub const DEFAULT_TARGET: &str = "#";

/// Property marking a field as required during validation.
pub const PROP_REQUIRED: &str = "required";

/// Property hiding a field from display.
pub const PROP_HIDDEN: &str = "hidden";

/// Property restricting an input to a fixed set of values.
pub const PROP_ENUM: &str = "enum";

/// Property allowing an object field to be collapsed.
pub const PROP_COLLAPSIBLE: &str = "collapsible";

/// Property replacing the derived display key of a field.
pub const PROP_I18N: &str = "i18n";
