//! The field tree.
//!
//! A [`FieldTree`] is an arena of [`FieldNode`]s addressed by [`FieldId`]
//! handles. Each node has a key that is unique among its siblings, a
//! non-owning handle to its parent, a map of declarative properties, and a
//! [`FieldKind`] carrying the kind-specific state.
//!
//! # Field Kinds
//!
//! - [`InputField`] - a leaf holding a single value
//! - [`ObjectField`] - an ordered set of keyed children
//! - [`LazyLinkField`] - a stand-in for another field, materialized as a
//!   clone only while the link is displayed
//!
//! Every operation (`get_value`, `set_value`, `is_empty`, `revalidate`,
//! `should_display`, `resolve_ref`, `resolve_path`, `i18n_path`) accepts a
//! handle of any kind, so a lazy link can stand anywhere a field is expected.
//!
//! # Handles
//!
//! Handles carry a generation. Removing a field bumps the generation of its
//! slot, so a handle kept across a lazy link's destroy/recreate cycle is
//! rejected with [`FieldError::StaleHandle`] instead of silently addressing a
//! different field. Re-resolve through the tree instead of caching handles.
//!
//! ```
//! use fieldtree::{FieldNode, FieldTree, InputField, InputType, ObjectField};
//!
//! let mut tree = FieldTree::new();
//! let root = tree.add_root(FieldNode::new("root", ObjectField::new()))?;
//! let name = tree.add_child(root, FieldNode::new("name", InputField::new(InputType::Text)))?;
//!
//! tree.set_value(name, "X-Rate-Limit".into())?;
//! assert_eq!(tree.resolve_path(root, &["name"])?, Some(name));
//! assert_eq!(tree.path_of(name)?.as_str(), "name");
//! # Ok::<(), fieldtree::Error>(())
//! ```

use std::fmt;

use crate::{
    FieldPath, Result, Value,
    constants::CHILD_SEGMENT,
    value::Map,
};

mod access;
pub mod errors;
mod input;
mod lazy_link;
mod object;
mod resolve;
mod visibility;

pub use errors::FieldError;
pub use input::{InputField, InputType};
pub use lazy_link::{LazyLinkArgs, LazyLinkField, LinkState};
pub use object::ObjectField;
pub use visibility::RefreshReport;

/// Handle to a field in a [`FieldTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId {
    index: u32,
    generation: u32,
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Kind-specific state of a field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// A leaf holding a single value
    Input(InputField),
    /// An ordered set of keyed children
    Object(ObjectField),
    /// A lazily materialized clone of another field
    LazyLink(LazyLinkField),
}

impl FieldKind {
    /// Returns the type tag of this kind
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Input(input) => input.input_type().name(),
            FieldKind::Object(_) => "object",
            FieldKind::LazyLink(_) => "lazy-link",
        }
    }

    /// Drops any handles held by the kind so it can be inserted as a fresh field.
    fn detached(self) -> Self {
        match self {
            FieldKind::Input(input) => FieldKind::Input(input),
            FieldKind::Object(object) => FieldKind::Object(object.detached()),
            FieldKind::LazyLink(link) => FieldKind::LazyLink(link.detached()),
        }
    }
}

impl From<InputField> for FieldKind {
    fn from(value: InputField) -> Self {
        FieldKind::Input(value)
    }
}

impl From<ObjectField> for FieldKind {
    fn from(value: ObjectField) -> Self {
        FieldKind::Object(value)
    }
}

impl From<LazyLinkField> for FieldKind {
    fn from(value: LazyLinkField) -> Self {
        FieldKind::LazyLink(value)
    }
}

/// A single field: identity, parent handle, properties and kind.
#[derive(Debug, Clone)]
pub struct FieldNode {
    key: String,
    parent: Option<FieldId>,
    props: Value,
    kind: FieldKind,
    touched: bool,
}

impl FieldNode {
    /// Creates a detached field with no properties
    pub fn new(key: impl Into<String>, kind: impl Into<FieldKind>) -> Self {
        Self {
            key: key.into(),
            parent: None,
            props: Value::map(),
            kind: kind.into(),
            touched: false,
        }
    }

    /// Builder method to replace all properties
    pub fn with_props(mut self, props: Map) -> Self {
        self.props = Value::Map(props);
        self
    }

    /// Builder method to set a single property
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_prop(key, value);
        self
    }

    /// The key of this field among its siblings
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Handle of the parent field, `None` for roots and detached fields
    pub fn parent(&self) -> Option<FieldId> {
        self.parent
    }

    /// The properties of this field, always a map
    pub fn props(&self) -> &Value {
        &self.props
    }

    /// Mutable access to the properties of this field
    pub fn props_mut(&mut self) -> &mut Value {
        if !matches!(self.props, Value::Map(_)) {
            self.props = Value::map();
        }
        &mut self.props
    }

    /// Looks up a single property
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// Returns true if the property is present and truthy
    pub fn prop_flag(&self, key: &str) -> bool {
        self.prop(key).is_some_and(|value| !value.is_falsy())
    }

    /// Sets a single property, returning the previous value
    pub fn set_prop(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.props_mut()
            .as_map_mut()
            .and_then(|map| map.insert(key.into(), value.into()))
    }

    /// Removes a single property, returning the previous value
    pub fn remove_prop(&mut self, key: &str) -> Option<Value> {
        self.props.as_map_mut().and_then(|map| map.remove(key))
    }

    /// The kind-specific state of this field
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// The type tag of this field
    pub fn field_type(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Returns true once a value has been assigned to this field
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Returns the lazy link state if this field is a lazy link
    pub fn as_lazy_link(&self) -> Option<&LazyLinkField> {
        match &self.kind {
            FieldKind::LazyLink(link) => Some(link),
            _ => None,
        }
    }

    /// Returns the object state if this field is an object
    pub fn as_object(&self) -> Option<&ObjectField> {
        match &self.kind {
            FieldKind::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the input state if this field is an input
    pub fn as_input(&self) -> Option<&InputField> {
        match &self.kind {
            FieldKind::Input(input) => Some(input),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    node: Option<FieldNode>,
}

/// An arena of fields forming a single tree.
///
/// See the [module documentation](self) for an overview.
#[derive(Debug, Clone, Default)]
pub struct FieldTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    root: Option<FieldId>,
}

impl FieldTree {
    /// Creates an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle of the root field, if one was added
    pub fn root(&self) -> Option<FieldId> {
        self.root
    }

    /// Number of live fields, including materialized lazy link children
    pub fn field_count(&self) -> usize {
        self.live
    }

    /// Returns true if the tree holds no fields
    pub fn has_no_fields(&self) -> bool {
        self.live == 0
    }

    /// Returns true if the handle refers to a live field
    pub fn contains(&self, id: FieldId) -> bool {
        self.node(id).is_ok()
    }

    /// Gets a field by handle
    pub fn node(&self, id: FieldId) -> Result<&FieldNode> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or_else(|| FieldError::StaleHandle { id }.into())
    }

    /// Gets a mutable reference to a field by handle
    pub fn node_mut(&mut self, id: FieldId) -> Result<&mut FieldNode> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or_else(|| FieldError::StaleHandle { id }.into())
    }

    pub(crate) fn kind_mut(&mut self, id: FieldId) -> Result<&mut FieldKind> {
        Ok(&mut self.node_mut(id)?.kind)
    }

    fn insert(&mut self, mut node: FieldNode, parent: Option<FieldId>) -> FieldId {
        node.parent = parent;
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                FieldId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                FieldId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Adds the root field.
    ///
    /// Any handles held by the node's kind (object children, a lazy link's
    /// child) are dropped; children are added with [`FieldTree::add_child`].
    pub fn add_root(&mut self, node: FieldNode) -> Result<FieldId> {
        if self.root.is_some() {
            return Err(FieldError::RootExists.into());
        }
        let node = FieldNode {
            kind: node.kind.detached(),
            ..node
        };
        let id = self.insert(node, None);
        self.root = Some(id);
        Ok(id)
    }

    /// Adds a field as the last child of an object field.
    pub fn add_child(&mut self, parent: FieldId, node: FieldNode) -> Result<FieldId> {
        self.ensure_unique_key(parent, &node.key)?;
        let node = FieldNode {
            kind: node.kind.detached(),
            ..node
        };
        let id = self.insert(node, Some(parent));
        self.object_mut(parent)?.push_child(id);
        Ok(id)
    }

    fn ensure_unique_key(&self, parent: FieldId, key: &str) -> Result<()> {
        let object = self.object(parent)?;
        for child in object.children() {
            if self.node(*child)?.key == key {
                return Err(FieldError::DuplicateKey {
                    parent: self.describe(parent),
                    key: key.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Removes a field and its whole subtree.
    ///
    /// Fields materialized by a lazy link are owned by it and cannot be
    /// removed directly.
    pub fn remove(&mut self, id: FieldId) -> Result<()> {
        if let Some(parent) = self.node(id)?.parent {
            if !matches!(self.node(parent)?.kind, FieldKind::Object(_)) {
                return Err(FieldError::OwnedByLink {
                    field: self.describe(id),
                }
                .into());
            }
            self.object_mut(parent)?.remove_child(id);
        } else if self.root == Some(id) {
            self.root = None;
        }
        self.free_subtree(id)
    }

    /// Releases every slot of the subtree rooted at `id`, invalidating all handles into it.
    pub(crate) fn free_subtree(&mut self, id: FieldId) -> Result<()> {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            stack.extend(self.child_ids(current)?);
            let slot = &mut self.slots[current.index as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index);
            self.live -= 1;
        }
        Ok(())
    }

    /// Handles of every field directly below `id`, including a lazy link's live child.
    pub(crate) fn child_ids(&self, id: FieldId) -> Result<Vec<FieldId>> {
        Ok(match &self.node(id)?.kind {
            FieldKind::Input(_) => Vec::new(),
            FieldKind::Object(object) => object.children().to_vec(),
            FieldKind::LazyLink(link) => link.child().into_iter().collect(),
        })
    }

    /// Every live field of the subtree rooted at `id`, in pre-order.
    ///
    /// Lazy link children are included below their link.
    pub fn subtree(&self, id: FieldId) -> Result<Vec<FieldId>> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.child_ids(current)?.into_iter().rev());
        }
        Ok(order)
    }

    /// Deep-copies the subtree rooted at `source` and parents the copy to `new_parent`.
    ///
    /// The copy is not registered with `new_parent`; callers attach it.
    /// Lazy links are copied unmaterialized, carrying their source's current
    /// value as their cached value.
    pub(crate) fn clone_subtree(
        &mut self,
        source: FieldId,
        new_parent: Option<FieldId>,
    ) -> Result<FieldId> {
        let node = self.node(source)?;
        let mut copy = FieldNode {
            key: node.key.clone(),
            parent: None,
            props: node.props.clone(),
            kind: node.kind.clone().detached(),
            touched: node.touched,
        };
        let children = match &node.kind {
            FieldKind::Object(object) => object.children().to_vec(),
            FieldKind::LazyLink(_) => {
                let value = self.get_value(source)?;
                if let FieldKind::LazyLink(link) = &mut copy.kind {
                    link.set_cached_value(value);
                }
                Vec::new()
            }
            FieldKind::Input(_) => Vec::new(),
        };

        let id = self.insert(copy, new_parent);
        for child in children {
            let child_copy = self.clone_subtree(child, Some(id))?;
            self.object_mut(id)?.push_child(child_copy);
        }
        Ok(id)
    }

    /// Copies the subtree rooted at `source` and appends it to the object `parent`.
    pub fn clone_field_into(&mut self, source: FieldId, parent: FieldId) -> Result<FieldId> {
        let key = self.node(source)?.key.clone();
        self.ensure_unique_key(parent, &key)?;
        let id = self.clone_subtree(source, Some(parent))?;
        self.object_mut(parent)?.push_child(id);
        Ok(id)
    }

    /// Handle of the parent field
    pub fn parent(&self, id: FieldId) -> Result<Option<FieldId>> {
        Ok(self.node(id)?.parent)
    }

    /// Object children of a field, empty for other kinds
    pub fn children(&self, id: FieldId) -> Result<&[FieldId]> {
        Ok(match &self.node(id)?.kind {
            FieldKind::Object(object) => object.children(),
            _ => &[],
        })
    }

    /// Finds an object child by key
    pub fn find_child(&self, id: FieldId, key: &str) -> Result<Option<FieldId>> {
        for child in self.children(id)? {
            if self.node(*child)?.key == key {
                return Ok(Some(*child));
            }
        }
        Ok(None)
    }

    /// Key of a field
    pub fn key(&self, id: FieldId) -> Result<&str> {
        Ok(&self.node(id)?.key)
    }

    /// Properties of a field
    pub fn props(&self, id: FieldId) -> Result<&Value> {
        Ok(&self.node(id)?.props)
    }

    /// Sets a single property on a field, returning the previous value
    pub fn set_prop(
        &mut self,
        id: FieldId,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        Ok(self.node_mut(id)?.set_prop(key, value))
    }

    /// Path of a field relative to the root of its tree.
    ///
    /// A lazy link's materialized child is addressed as `:child` below the
    /// link, so the result can be fed back into [`FieldTree::resolve_path`].
    pub fn path_of(&self, id: FieldId) -> Result<FieldPath> {
        let mut segments = Vec::new();
        let mut current = id;
        while let Some(parent) = self.node(current)?.parent {
            match &self.node(parent)?.kind {
                FieldKind::LazyLink(_) => segments.push(CHILD_SEGMENT),
                _ => segments.push(self.node(current)?.key.as_str()),
            }
            current = parent;
        }
        segments.reverse();
        Ok(segments
            .into_iter()
            .fold(FieldPath::new(), |path, segment| path.push(segment)))
    }

    /// Human-readable name of a field for error messages
    pub(crate) fn describe(&self, id: FieldId) -> String {
        match self.path_of(id) {
            Ok(path) if !path.is_empty() => path.to_string(),
            Ok(_) => self
                .node(id)
                .map(|node| node.key.clone())
                .unwrap_or_default(),
            Err(_) => id.to_string(),
        }
    }

    pub(crate) fn object(&self, id: FieldId) -> Result<&ObjectField> {
        match &self.node(id)?.kind {
            FieldKind::Object(object) => Ok(object),
            _ => Err(FieldError::NotAnObject {
                field: self.describe(id),
            }
            .into()),
        }
    }

    pub(crate) fn object_mut(&mut self, id: FieldId) -> Result<&mut ObjectField> {
        if !matches!(self.node(id)?.kind, FieldKind::Object(_)) {
            return Err(FieldError::NotAnObject {
                field: self.describe(id),
            }
            .into());
        }
        match self.kind_mut(id)? {
            FieldKind::Object(object) => Ok(object),
            _ => unreachable!("kind checked above"),
        }
    }

    pub(crate) fn link(&self, id: FieldId) -> Result<&LazyLinkField> {
        match &self.node(id)?.kind {
            FieldKind::LazyLink(link) => Ok(link),
            _ => Err(FieldError::NotALazyLink {
                field: self.describe(id),
            }
            .into()),
        }
    }

    pub(crate) fn link_mut(&mut self, id: FieldId) -> Result<&mut LazyLinkField> {
        if !matches!(self.node(id)?.kind, FieldKind::LazyLink(_)) {
            return Err(FieldError::NotALazyLink {
                field: self.describe(id),
            }
            .into());
        }
        match self.kind_mut(id)? {
            FieldKind::LazyLink(link) => Ok(link),
            _ => unreachable!("kind checked above"),
        }
    }
}
