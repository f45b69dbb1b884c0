//! JSON schema describing a field tree.
//!
//! A schema is a nested description of fields. Every entry has an `id` (its
//! key), a `type` and optional `props`; the remaining members depend on the
//! type:
//!
//! ```json
//! {
//!   "id": "root",
//!   "type": "object",
//!   "fields": [
//!     { "id": "title", "type": "text", "props": { "required": true } },
//!     { "id": "header", "type": "lazy-link",
//!       "target": "#/definitions/parameter",
//!       "overrides": { "in": "header", "name;hidden": true } }
//!   ]
//! }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Result, Value,
    field::{
        FieldId, FieldNode, FieldTree, InputField, InputType, LazyLinkArgs, LazyLinkField,
        ObjectField,
    },
    value::Map,
};

/// Description of a single field and, for objects, its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Key of the field among its siblings
    pub id: String,
    /// Declarative properties
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub props: Map,
    /// Kind-specific members, tagged by `type`
    #[serde(flatten)]
    pub kind: KindSchema,
}

/// Kind-specific part of a [`FieldSchema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum KindSchema {
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },
    Boolean {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },
    Object {
        #[serde(default)]
        fields: Vec<FieldSchema>,
        /// Initial collapsed state
        #[serde(default)]
        collapsed: bool,
    },
    LazyLink(LazyLinkArgs),
}

impl FieldSchema {
    /// Parses a schema from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a schema from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// The type tag this schema produces
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            KindSchema::Text { .. } => InputType::Text.name(),
            KindSchema::Number { .. } => InputType::Number.name(),
            KindSchema::Integer { .. } => InputType::Integer.name(),
            KindSchema::Boolean { .. } => InputType::Boolean.name(),
            KindSchema::Object { .. } => "object",
            KindSchema::LazyLink(_) => "lazy-link",
        }
    }

    fn to_node(&self) -> FieldNode {
        let input = |input_type: InputType, value: &Option<Value>| {
            let field = InputField::new(input_type);
            match value {
                Some(value) => field.with_value(value.clone()),
                None => field,
            }
        };

        let node = match &self.kind {
            KindSchema::Text { value } => FieldNode::new(&self.id, input(InputType::Text, value)),
            KindSchema::Number { value } => {
                FieldNode::new(&self.id, input(InputType::Number, value))
            }
            KindSchema::Integer { value } => {
                FieldNode::new(&self.id, input(InputType::Integer, value))
            }
            KindSchema::Boolean { value } => {
                FieldNode::new(&self.id, input(InputType::Boolean, value))
            }
            KindSchema::Object { collapsed, .. } => {
                let object = ObjectField::new();
                FieldNode::new(
                    &self.id,
                    if *collapsed { object.collapsed() } else { object },
                )
            }
            KindSchema::LazyLink(args) => {
                FieldNode::new(&self.id, LazyLinkField::from_args(args.clone()))
            }
        };
        node.with_props(self.props.clone())
    }

    fn fields(&self) -> &[FieldSchema] {
        match &self.kind {
            KindSchema::Object { fields, .. } => fields,
            _ => &[],
        }
    }
}

impl FieldTree {
    /// Builds a tree from a schema. Lazy links start without a child.
    pub fn from_schema(schema: &FieldSchema) -> Result<Self> {
        let mut tree = Self::new();
        let root = tree.add_root(schema.to_node())?;
        tree.add_schema_fields(root, schema)?;
        debug!(root = %schema.id, fields = tree.field_count(), "Built field tree from schema");
        Ok(tree)
    }

    /// Adds the field described by `schema`, and everything below it, to the object `parent`
    pub fn add_schema(&mut self, parent: FieldId, schema: &FieldSchema) -> Result<FieldId> {
        let id = self.add_child(parent, schema.to_node())?;
        self.add_schema_fields(id, schema)?;
        Ok(id)
    }

    fn add_schema_fields(&mut self, id: FieldId, schema: &FieldSchema) -> Result<()> {
        for field in schema.fields() {
            self.add_schema(id, field)?;
        }
        Ok(())
    }
}
