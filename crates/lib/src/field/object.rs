//! Object fields: ordered, keyed children.

use super::FieldId;

/// State of an object field.
///
/// The `collapsed` flag only affects display when the field carries a truthy
/// `collapsible` property.
#[derive(Debug, Clone, Default)]
pub struct ObjectField {
    children: Vec<FieldId>,
    collapsed: bool,
}

impl ObjectField {
    /// Creates an expanded object with no children
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to start collapsed
    pub fn collapsed(mut self) -> Self {
        self.collapsed = true;
        self
    }

    /// Handles of the children, in insertion order
    pub fn children(&self) -> &[FieldId] {
        &self.children
    }

    /// Returns true if the object is collapsed
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub(crate) fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    pub(crate) fn push_child(&mut self, id: FieldId) {
        self.children.push(id);
    }

    pub(crate) fn remove_child(&mut self, id: FieldId) {
        self.children.retain(|child| *child != id);
    }

    pub(crate) fn detached(self) -> Self {
        Self {
            children: Vec::new(),
            collapsed: self.collapsed,
        }
    }
}
