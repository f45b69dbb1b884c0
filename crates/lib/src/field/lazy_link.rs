//! Lazy links: fields that stand in for a clone of another field.
//!
//! A lazy link names a `target` field and a list of [`Overrides`]. While the
//! link is displayed it owns a *child*: a clone of the target with the
//! overrides applied. While it is hidden the child does not exist and values
//! assigned to the link are buffered in a cache.
//!
//! ```text
//!            should_display() == true
//!   Absent ─────────────────────────────▶ Active
//!   (cached value)   clone + overrides    (child is authoritative)
//!          ◀─────────────────────────────
//!            should_display() == false
//!            value captured into cache
//! ```
//!
//! Value, emptiness, validation and path operations on the link are proxied
//! to the child when it exists and answered from the cache otherwise.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{FieldError, FieldId, FieldKind, FieldTree};
use crate::{Overrides, Result, Value, constants::DEFAULT_TARGET};

fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}

/// Construction-time arguments of a lazy link.
///
/// ```
/// # use fieldtree::LazyLinkArgs;
/// let args: LazyLinkArgs = serde_json::from_str("{}")?;
/// assert_eq!(args.target, "#");
/// assert!(args.overrides.is_empty());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LazyLinkArgs {
    /// Reference to the field to clone
    #[serde(default = "default_target")]
    pub target: String,
    /// Overrides applied to every clone
    #[serde(default, skip_serializing_if = "Overrides::is_empty")]
    pub overrides: Overrides,
}

impl Default for LazyLinkArgs {
    fn default() -> Self {
        Self {
            target: default_target(),
            overrides: Overrides::new(),
        }
    }
}

/// Whether a lazy link currently owns a materialized child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No child; the cached value is authoritative
    Absent,
    /// A child exists and is authoritative
    Active,
}

/// State of a lazy link field.
#[derive(Debug, Clone)]
pub struct LazyLinkField {
    target: String,
    overrides: Overrides,
    child: Option<FieldId>,
    cached_value: Option<Value>,
}

impl LazyLinkField {
    /// Creates a link to `target` with no overrides
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            overrides: Overrides::new(),
            child: None,
            cached_value: None,
        }
    }

    /// Creates a link from its construction arguments
    pub fn from_args(args: LazyLinkArgs) -> Self {
        Self::new(args.target).with_overrides(args.overrides)
    }

    /// Builder method to set the overrides
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Builder method to seed the cached value
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.cached_value = Some(value.into());
        self
    }

    /// The reference to the field this link clones
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The overrides applied to each clone
    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    /// Handle of the materialized child
    pub fn child(&self) -> Option<FieldId> {
        self.child
    }

    /// The buffered value while no child exists
    pub fn cached_value(&self) -> Option<&Value> {
        self.cached_value.as_ref()
    }

    /// Current state of the link
    pub fn state(&self) -> LinkState {
        match self.child {
            Some(_) => LinkState::Active,
            None => LinkState::Absent,
        }
    }

    pub(crate) fn set_cached_value(&mut self, value: Option<Value>) {
        self.cached_value = value;
    }

    pub(crate) fn detached(self) -> Self {
        Self {
            child: None,
            ..self
        }
    }
}

impl FieldTree {
    /// Resolves a lazy link's target to the field it clones.
    ///
    /// The default `#` target means "no explicit target" and never resolves.
    pub fn resolve_target(&self, id: FieldId) -> Result<Option<FieldId>> {
        let target = self.link(id)?.target.as_str();
        if target == DEFAULT_TARGET {
            return Ok(None);
        }
        self.resolve_ref(id, target)
    }

    /// State of a lazy link
    pub fn link_state(&self, id: FieldId) -> Result<LinkState> {
        Ok(self.link(id)?.state())
    }

    /// Materializes a lazy link's child.
    ///
    /// Clones the target with the link as parent, applies the overrides and
    /// moves the cached value into the clone. An existing child is deleted
    /// first. On failure the clone is discarded and the link stays
    /// [`LinkState::Absent`] with its cached value intact.
    pub fn create_child(&mut self, id: FieldId) -> Result<FieldId> {
        if self.link(id)?.child.is_some() {
            self.delete_child(id)?;
        }

        let (target, overrides) = {
            let link = self.link(id)?;
            (link.target.clone(), link.overrides.clone())
        };
        let template = self
            .resolve_target(id)?
            .ok_or_else(|| FieldError::TargetNotFound {
                field: self.describe(id),
                target,
            })?;

        let child = self.clone_subtree(template, Some(id))?;
        if let Err(err) = self.configure_child(id, child, &overrides) {
            self.free_subtree(child)?;
            return Err(err);
        }

        let link = self.link_mut(id)?;
        link.child = Some(child);
        link.cached_value = None;

        debug!(
            link = %self.describe(id),
            child = %child,
            overrides = overrides.len(),
            "Created lazy link child"
        );
        Ok(child)
    }

    /// Applies the overrides to a detached clone, then pushes the cached value into it.
    fn configure_child(
        &mut self,
        id: FieldId,
        child: FieldId,
        overrides: &Overrides,
    ) -> Result<()> {
        self.apply_overrides(child, overrides)?;
        if let Some(value) = self.link(id)?.cached_value.clone() {
            self.set_value(child, value)?;
        }
        Ok(())
    }

    /// Destroys a lazy link's child, capturing its value into the cache.
    ///
    /// Returns `false` if the link had no child.
    pub fn delete_child(&mut self, id: FieldId) -> Result<bool> {
        let Some(child) = self.link(id)?.child else {
            return Ok(false);
        };
        let value = self.get_value(child)?;
        self.free_subtree(child)?;

        let link = self.link_mut(id)?;
        link.child = None;
        link.cached_value = value;

        debug!(link = %self.describe(id), child = %child, "Deleted lazy link child");
        Ok(true)
    }

    pub(crate) fn is_lazy_link(&self, id: FieldId) -> Result<bool> {
        Ok(matches!(self.node(id)?.kind, FieldKind::LazyLink(_)))
    }
}
