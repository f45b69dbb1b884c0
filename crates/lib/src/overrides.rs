//! Declarative overrides applied to a lazy link's cloned field.
//!
//! An override pairs a key with either a value (set the property) or `null`
//! (delete the property). Keys come in two forms:
//!
//! - `"a/b/c"` addresses `props.a.b.c` on the cloned field itself.
//! - `"element;a/b/c"` first resolves `element` as a field reference from the
//!   cloned field, then addresses `props.a.b.c` on that field.
//!
//! Overrides are applied in insertion order, so later entries win when paths
//! overlap.
//!
//! ```
//! use fieldtree::Overrides;
//!
//! let overrides: Overrides = serde_json::from_str(
//!     r#"{"required": true, "name;hidden": true, "description": null}"#,
//! )?;
//! let keys: Vec<_> = overrides.iter().map(|o| o.key().as_str()).collect();
//! assert_eq!(keys, ["required", "name;hidden", "description"]);
//! assert!(overrides.iter().last().unwrap().is_delete());
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::{fmt, str::FromStr};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};
use tracing::trace;

use crate::{
    FieldPath, Result, Value,
    constants::SCOPE_SEPARATOR,
    field::{FieldError, FieldId, FieldTree},
    path::{PathError, resolve_raw_path_mut},
};

/// A parsed override key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverrideKey {
    raw: String,
    scope: Option<FieldPath>,
    property: FieldPath,
}

impl OverrideKey {
    /// Parses a key of the form `a/b/c` or `element;a/b/c`.
    ///
    /// # Errors
    /// Returns [`PathError::Empty`] if the property path has no components.
    pub fn parse(raw: &str) -> std::result::Result<Self, PathError> {
        let (scope, property) = match raw.split_once(SCOPE_SEPARATOR) {
            Some((scope, property)) => (Some(FieldPath::normalize(scope)), property),
            None => (None, raw),
        };
        let property = FieldPath::normalize(property);
        if property.is_empty() {
            return Err(PathError::Empty {
                context: format!("override '{raw}' has no property path"),
            });
        }
        Ok(Self {
            raw: raw.to_string(),
            scope,
            property,
        })
    }

    /// The key as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The element path, for scoped keys
    pub fn scope(&self) -> Option<&FieldPath> {
        self.scope.as_ref()
    }

    /// The property path inside the override root's props
    pub fn property(&self) -> &FieldPath {
        &self.property
    }
}

impl FromStr for OverrideKey {
    type Err = PathError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        OverrideKey::parse(s)
    }
}

impl fmt::Display for OverrideKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A single override: set a property to a value, or delete it.
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    key: OverrideKey,
    value: Option<Value>,
}

impl Override {
    /// The parsed key
    pub fn key(&self) -> &OverrideKey {
        &self.key
    }

    /// The value to set, `None` for deletions
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Returns true if this override deletes its property
    pub fn is_delete(&self) -> bool {
        self.value.is_none()
    }
}

/// An ordered list of overrides.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overrides {
    entries: Vec<Override>,
}

impl Overrides {
    /// Creates an empty override list
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an override. `None` deletes the property.
    pub fn insert(
        &mut self,
        key: &str,
        value: Option<Value>,
    ) -> std::result::Result<(), PathError> {
        self.entries.push(Override {
            key: OverrideKey::parse(key)?,
            value,
        });
        Ok(())
    }

    /// Builder method to append a set override
    pub fn with(
        mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> std::result::Result<Self, PathError> {
        self.insert(key, Some(value.into()))?;
        Ok(self)
    }

    /// Builder method to append a delete override
    pub fn without(mut self, key: &str) -> std::result::Result<Self, PathError> {
        self.insert(key, None)?;
        Ok(self)
    }

    /// Iterates over the overrides in application order
    pub fn iter(&self) -> impl Iterator<Item = &Override> {
        self.entries.iter()
    }

    /// Number of overrides
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no overrides
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Overrides {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(entry.key.as_str(), &entry.value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Overrides {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OverridesVisitor;

        impl<'de> Visitor<'de> for OverridesVisitor {
            type Value = Overrides;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of override paths to values or null")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Overrides, A::Error> {
                let mut overrides = Overrides::new();
                while let Some((key, value)) = access.next_entry::<String, Option<Value>>()? {
                    overrides
                        .insert(&key, value)
                        .map_err(serde::de::Error::custom)?;
                }
                Ok(overrides)
            }
        }

        deserializer.deserialize_map(OverridesVisitor)
    }
}

/// Sets or deletes `terminal` inside the container found at `parents`.
fn apply_raw(
    props: &mut Value,
    parents: &[&str],
    terminal: &str,
    value: Option<&Value>,
) -> std::result::Result<(), PathError> {
    let full_path = || {
        let mut segments = parents.to_vec();
        segments.push(terminal);
        segments.join("/")
    };

    match resolve_raw_path_mut(props, parents)? {
        Value::Map(map) => {
            match value {
                Some(value) => {
                    map.insert(terminal.to_string(), value.clone());
                }
                None => {
                    map.remove(terminal);
                }
            }
            Ok(())
        }
        Value::List(items) => {
            let index = terminal
                .parse::<usize>()
                .ok()
                .filter(|index| *index < items.len())
                .ok_or_else(|| PathError::MissingSegment {
                    segment: terminal.to_string(),
                    path: full_path(),
                })?;
            match value {
                Some(value) => items[index] = value.clone(),
                None => {
                    items.remove(index);
                }
            }
            Ok(())
        }
        other => Err(PathError::NotAContainer {
            segment: terminal.to_string(),
            path: full_path(),
            found: other.type_name(),
        }),
    }
}

impl FieldTree {
    /// Applies every override to the subtree rooted at `root`, in order.
    ///
    /// Application stops at the first failure; earlier overrides stay applied.
    /// Fields outside the subtree are only touched if a scoped key reaches
    /// them through an explicit reference.
    pub fn apply_overrides(&mut self, root: FieldId, overrides: &Overrides) -> Result<()> {
        for entry in overrides.iter() {
            self.apply_override(root, entry)?;
        }
        Ok(())
    }

    fn apply_override(&mut self, root: FieldId, entry: &Override) -> Result<()> {
        let key = entry.key();
        let target = match key.scope() {
            Some(scope) => self.resolve_ref(root, scope.as_str())?.ok_or_else(|| {
                FieldError::OverrideScopeNotFound {
                    field: self.describe(root),
                    key: key.to_string(),
                    scope: scope.to_string(),
                }
            })?,
            None => root,
        };

        let Some((parents, terminal)) = key.property().split_last() else {
            return Err(PathError::Empty {
                context: format!("override '{key}' has no property path"),
            }
            .into());
        };

        let result = apply_raw(
            self.node_mut(target)?.props_mut(),
            &parents,
            terminal,
            entry.value(),
        );
        if let Err(source) = result {
            return Err(FieldError::Override {
                field: self.describe(target),
                key: key.to_string(),
                source,
            }
            .into());
        }

        trace!(
            field = %target,
            key = %key,
            delete = entry.is_delete(),
            "Applied override"
        );
        Ok(())
    }
}
