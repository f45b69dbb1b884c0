//! Visibility polling.
//!
//! The host decides what to render by calling [`FieldTree::should_display`]
//! on fields, parents before children. For lazy links that call is also what
//! creates and destroys the materialized child, so [`FieldTree::refresh`]
//! runs the whole polling cycle in one pass.

use serde::Serialize;
use tracing::debug;

use super::{FieldId, FieldKind, FieldTree, LinkState};
use crate::{
    Result,
    constants::{PROP_COLLAPSIBLE, PROP_HIDDEN},
};

/// Outcome of a [`FieldTree::refresh`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    /// Fields whose visibility was polled
    pub visited: usize,
    /// Lazy link children created during the pass
    pub created: usize,
    /// Lazy link children destroyed during the pass
    pub destroyed: usize,
}

impl FieldTree {
    /// Display rule shared by every kind: a truthy `hidden` prop hides the field.
    pub fn base_should_display(&self, id: FieldId) -> Result<bool> {
        Ok(!self.node(id)?.prop_flag(PROP_HIDDEN))
    }

    /// Polls whether a field should be displayed.
    ///
    /// For a lazy link this also drives the state machine. A displayed link
    /// without a child creates one, unless its parent is a collapsed
    /// collapsible object. A hidden link with a child deletes it. Collapsing
    /// the parent alone never deletes an existing child. Polling again in the
    /// same state changes nothing.
    ///
    /// # Errors
    /// Creating a child fails when the target does not resolve or an
    /// override cannot be applied; the link is left without a child.
    pub fn should_display(&mut self, id: FieldId) -> Result<bool> {
        let displayed = self.base_should_display(id)?;
        let FieldKind::LazyLink(link) = &self.node(id)?.kind else {
            return Ok(displayed);
        };

        let has_child = link.child().is_some();
        match (displayed, has_child) {
            (true, false) if !self.parent_collapsed(id)? => {
                self.create_child(id)?;
            }
            (false, true) => {
                self.delete_child(id)?;
            }
            _ => {}
        }
        Ok(displayed)
    }

    /// Returns true if the field is an object with a truthy `collapsible` prop
    pub fn is_collapsible(&self, id: FieldId) -> Result<bool> {
        let node = self.node(id)?;
        Ok(node.as_object().is_some() && node.prop_flag(PROP_COLLAPSIBLE))
    }

    /// Returns true if the field is a collapsed object
    pub fn is_collapsed(&self, id: FieldId) -> Result<bool> {
        Ok(self
            .node(id)?
            .as_object()
            .is_some_and(|object| object.is_collapsed()))
    }

    /// Collapses or expands an object field.
    ///
    /// Lazy links below a collapsed collapsible object are not materialized
    /// at the next poll. Children that already exist are kept.
    pub fn set_collapsed(&mut self, id: FieldId, collapsed: bool) -> Result<()> {
        self.object_mut(id)?.set_collapsed(collapsed);
        Ok(())
    }

    fn parent_collapsed(&self, id: FieldId) -> Result<bool> {
        match self.node(id)?.parent {
            Some(parent) => Ok(self.is_collapsible(parent)? && self.is_collapsed(parent)?),
            None => Ok(false),
        }
    }

    /// Polls every field from the root down, parents before children.
    ///
    /// Only displayed fields are descended into. A lazy link is descended
    /// into after it has been polled, so a freshly created child is polled
    /// in the same pass.
    pub fn refresh(&mut self) -> Result<RefreshReport> {
        match self.root {
            Some(root) => self.refresh_from(root),
            None => Ok(RefreshReport::default()),
        }
    }

    /// Runs a [`FieldTree::refresh`] pass over the subtree rooted at `id`
    pub fn refresh_from(&mut self, id: FieldId) -> Result<RefreshReport> {
        let mut report = RefreshReport::default();
        self.refresh_into(id, &mut report)?;
        debug!(
            from = %id,
            visited = report.visited,
            created = report.created,
            destroyed = report.destroyed,
            "Refreshed field visibility"
        );
        Ok(report)
    }

    fn refresh_into(&mut self, id: FieldId, report: &mut RefreshReport) -> Result<()> {
        let before = self.node(id)?.as_lazy_link().map(|link| link.state());
        let displayed = self.should_display(id)?;
        let after = self.node(id)?.as_lazy_link().map(|link| link.state());

        report.visited += 1;
        match (before, after) {
            (Some(LinkState::Absent), Some(LinkState::Active)) => report.created += 1,
            (Some(LinkState::Active), Some(LinkState::Absent)) => report.destroyed += 1,
            _ => {}
        }

        if displayed {
            for child in self.child_ids(id)? {
                self.refresh_into(child, report)?;
            }
        }
        Ok(())
    }
}
