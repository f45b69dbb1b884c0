//! Validation of field values.
//!
//! [`FieldTree::revalidate`] walks a field and everything below it, returning
//! a [`Validation`] tree that mirrors the field tree and collecting a flat
//! list of [`FieldIssue`]s in a [`ValidationErrors`] sink. Validation never
//! fails on bad data; the `Result` only carries handle errors.
//!
//! A lazy link validates its child while the child exists. Without a child
//! there is nothing to check and the link's child result is
//! [`Validation::passed`].

use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use thiserror::Error;

use crate::{
    FieldPath, Result, Value,
    constants::{PROP_ENUM, PROP_REQUIRED},
    field::{FieldId, FieldKind, FieldTree},
};

/// Why a field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum IssueKind {
    /// A required field has no value
    #[error("value is required")]
    Required,

    /// An input holds a value of the wrong type
    #[error("expected {expected}, found {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// An input holds a value outside its `enum` property
    #[error("value is not one of the allowed values")]
    NotAllowed,
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    /// Path of the failing field from the root
    pub path: FieldPath,
    /// Display key of the failing field
    pub i18n: String,
    /// What went wrong
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}: {}", self.i18n, self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

/// Sink collecting the issues found by a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    issues: Vec<FieldIssue>,
}

impl ValidationErrors {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an issue
    pub fn push(&mut self, issue: FieldIssue) {
        self.issues.push(issue);
    }

    /// Iterates over the issues in the order they were found
    pub fn iter(&self) -> impl Iterator<Item = &FieldIssue> {
        self.issues.iter()
    }

    /// Issues reported for the field at `path`
    pub fn for_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a FieldIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.path.as_str() == path)
    }

    /// Number of issues
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns true if no issues were recorded
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldIssue;
    type IntoIter = std::vec::IntoIter<FieldIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

/// Result of validating one field, mirroring the field tree below it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validation {
    /// Whether the field's own value passed
    pub valid: bool,
    /// Whether everything below the field passed, when the kind has children
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children_valid: Option<bool>,
    /// Result of a lazy link's child
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child: Option<Box<Validation>>,
    /// Results of an object's displayed children, by key
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, Validation>,
}

impl Validation {
    /// The result of a field with nothing to complain about
    pub fn passed() -> Self {
        Self {
            valid: true,
            children_valid: None,
            child: None,
            children: BTreeMap::new(),
        }
    }

    /// The result of a field whose own value failed
    pub fn failed() -> Self {
        Self {
            valid: false,
            ..Self::passed()
        }
    }

    /// The explicit `children_valid` flag, falling back to `valid`
    pub fn children_valid(&self) -> bool {
        self.children_valid.unwrap_or(self.valid)
    }

    /// Returns true if the field and everything below it passed
    pub fn is_fully_valid(&self) -> bool {
        self.valid && self.children_valid()
    }

    /// Result of an object child by key
    pub fn get(&self, key: &str) -> Option<&Validation> {
        self.children.get(key)
    }
}

impl FieldTree {
    /// Validates a field and everything below it.
    ///
    /// Issues are appended to `errors`. Objects skip hidden children. A lazy
    /// link reports its child's result, or [`Validation::passed`] when it has
    /// no child, and takes `children_valid` from that result.
    pub fn revalidate(&self, id: FieldId, errors: &mut ValidationErrors) -> Result<Validation> {
        let mut result = self.base_revalidate(id, errors)?;

        match self.node(id)?.kind() {
            FieldKind::Input(_) => {}
            FieldKind::Object(object) => {
                let mut all_valid = true;
                for child in object.children() {
                    if !self.base_should_display(*child)? {
                        continue;
                    }
                    let child_result = self.revalidate(*child, errors)?;
                    all_valid &= child_result.is_fully_valid();
                    result
                        .children
                        .insert(self.key(*child)?.to_string(), child_result);
                }
                result.children_valid = Some(all_valid);
            }
            FieldKind::LazyLink(link) => {
                let child_result = match link.child() {
                    Some(child) => self.revalidate(child, errors)?,
                    None => Validation::passed(),
                };
                result.children_valid = Some(child_result.children_valid());
                result.child = Some(Box::new(child_result));
            }
        }
        Ok(result)
    }

    /// Validates a field and returns the collected issues alongside the result
    pub fn validate(&self, id: FieldId) -> Result<(Validation, ValidationErrors)> {
        let mut errors = ValidationErrors::new();
        let result = self.revalidate(id, &mut errors)?;
        Ok((result, errors))
    }

    /// Rules shared by every kind, plus the type and `enum` checks of inputs.
    fn base_revalidate(&self, id: FieldId, errors: &mut ValidationErrors) -> Result<Validation> {
        let node = self.node(id)?;
        let mut issues = Vec::new();

        if node.prop_flag(PROP_REQUIRED) && self.is_empty(id)? {
            issues.push(IssueKind::Required);
        }

        if let FieldKind::Input(input) = node.kind()
            && let Some(value) = input.value().filter(|value| !value.is_null())
        {
            let input_type = input.input_type();
            if !input_type.accepts(value) {
                issues.push(IssueKind::TypeMismatch {
                    expected: input_type.name(),
                    actual: value.type_name(),
                });
            } else if let Some(allowed) = node.prop(PROP_ENUM).and_then(Value::as_list)
                && !allowed.contains(value)
            {
                issues.push(IssueKind::NotAllowed);
            }
        }

        if issues.is_empty() {
            return Ok(Validation::passed());
        }

        let path = self.path_of(id)?;
        let i18n = self.i18n_path(id)?;
        for kind in issues {
            errors.push(FieldIssue {
                path: path.clone(),
                i18n: i18n.clone(),
                kind,
            });
        }
        Ok(Validation::failed())
    }
}
