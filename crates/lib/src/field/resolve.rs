//! Reference and path resolution across the field tree.

use super::{FieldId, FieldTree};
use crate::{
    FieldPath, Result, Value,
    constants::{CHILD_SEGMENT, PARENT_SEGMENT, PROP_I18N, ROOT_SEGMENT, SELF_SEGMENT},
};

impl FieldTree {
    /// Top-most ancestor of a field
    pub fn root_of(&self, id: FieldId) -> Result<FieldId> {
        let mut current = id;
        while let Some(parent) = self.node(current)?.parent {
            current = parent;
        }
        Ok(current)
    }

    /// Resolves a reference relative to `from`.
    ///
    /// A leading `#` jumps to the root of the tree, `.` stays, `..` moves to
    /// the parent, `:child` enters a lazy link's live child and any other
    /// segment selects the object child with that key. Returns `None` as soon
    /// as a step has nowhere to go.
    ///
    /// ```
    /// # use fieldtree::{FieldNode, FieldTree, InputField, InputType, ObjectField};
    /// let mut tree = FieldTree::new();
    /// let root = tree.add_root(FieldNode::new("root", ObjectField::new()))?;
    /// let defs = tree.add_child(root, FieldNode::new("definitions", ObjectField::new()))?;
    /// let name = tree.add_child(defs, FieldNode::new("name", InputField::new(InputType::Text)))?;
    ///
    /// assert_eq!(tree.resolve_ref(name, "#/definitions")?, Some(defs));
    /// assert_eq!(tree.resolve_ref(name, "../name")?, Some(name));
    /// assert_eq!(tree.resolve_ref(root, "definitions/missing")?, None);
    /// # Ok::<(), fieldtree::Error>(())
    /// ```
    pub fn resolve_ref(&self, from: FieldId, reference: &str) -> Result<Option<FieldId>> {
        let path = FieldPath::normalize(reference);
        let mut current = from;
        for (position, segment) in path.components().enumerate() {
            let next = match segment {
                ROOT_SEGMENT if position == 0 => Some(self.root_of(current)?),
                ROOT_SEGMENT | SELF_SEGMENT => Some(current),
                PARENT_SEGMENT => self.node(current)?.parent,
                CHILD_SEGMENT => self
                    .node(current)?
                    .as_lazy_link()
                    .and_then(|link| link.child()),
                key => self.find_child(current, key)?,
            };
            match next {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Resolves a sequence of child keys below `from`.
    ///
    /// An empty sequence resolves to `from`. When the keys do not name object
    /// children and `from` is a lazy link with a live child, a leading
    /// `:child` segment continues resolution inside the child.
    pub fn resolve_path<S: AsRef<str>>(
        &self,
        from: FieldId,
        segments: &[S],
    ) -> Result<Option<FieldId>> {
        if let Some(found) = self.base_resolve_path(from, segments)? {
            return Ok(Some(found));
        }

        let child = self
            .node(from)?
            .as_lazy_link()
            .and_then(|link| link.child());
        match (child, segments.split_first()) {
            (Some(child), Some((head, rest))) if head.as_ref() == CHILD_SEGMENT => {
                self.resolve_path(child, rest)
            }
            _ => Ok(None),
        }
    }

    /// Resolves a slash-delimited path with [`FieldTree::resolve_path`]
    pub fn resolve_path_str(&self, from: FieldId, path: &str) -> Result<Option<FieldId>> {
        let path = FieldPath::normalize(path);
        let segments: Vec<&str> = path.components().collect();
        self.resolve_path(from, &segments)
    }

    fn base_resolve_path<S: AsRef<str>>(
        &self,
        from: FieldId,
        segments: &[S],
    ) -> Result<Option<FieldId>> {
        let Some((head, rest)) = segments.split_first() else {
            return Ok(Some(from));
        };
        match self.find_child(from, head.as_ref())? {
            Some(child) => self.resolve_path(child, rest),
            None => Ok(None),
        }
    }

    /// Display key of a field.
    ///
    /// An `i18n` text property wins. Otherwise the key is derived from the
    /// parent's display key and the field's own key. A lazy link borrows the
    /// display key of its target, or of its parent when the target does not
    /// resolve, and its materialized child shares the link's key.
    pub fn i18n_path(&self, id: FieldId) -> Result<String> {
        self.i18n_path_following(id, &mut Vec::new())
    }

    fn i18n_path_following(&self, id: FieldId, followed: &mut Vec<FieldId>) -> Result<String> {
        let node = self.node(id)?;
        if let Some(key) = node.prop(PROP_I18N).and_then(Value::as_text) {
            return Ok(key.to_string());
        }

        if node.as_lazy_link().is_some() && !followed.contains(&id) {
            followed.push(id);
            if let Some(target) = self.resolve_target(id)? {
                return self.i18n_path_following(target, followed);
            }
            return match node.parent {
                Some(parent) => self.i18n_path_following(parent, followed),
                None => Ok(node.key.clone()),
            };
        }

        match node.parent {
            None => Ok(node.key.clone()),
            Some(parent) if self.is_lazy_link(parent)? => {
                self.i18n_path_following(parent, followed)
            }
            Some(parent) => Ok(format!(
                "{}.{}",
                self.i18n_path_following(parent, followed)?,
                node.key
            )),
        }
    }
}
