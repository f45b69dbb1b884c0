use fieldtree::{FieldId, FieldSchema, FieldTree, Value};

/// An API description with a hidden parameter template and an operation
/// that links to it twice.
///
/// `operation/header` clones `definitions/parameter`, restricts `in` to
/// `header`, hides the `required` flag and drops the description.
/// `operation/wrapped` clones `definitions/wrapper`, which itself links to
/// the parameter template.
pub const API_SCHEMA: &str = r##"{
    "id": "api",
    "type": "object",
    "fields": [
        {
            "id": "definitions",
            "type": "object",
            "props": {"hidden": true},
            "fields": [
                {
                    "id": "parameter",
                    "type": "object",
                    "props": {"description": "A request parameter", "tags": ["param"]},
                    "fields": [
                        {"id": "name", "type": "text", "props": {"required": true}},
                        {"id": "in", "type": "text", "props": {"enum": ["query", "header", "path"]}},
                        {"id": "required", "type": "boolean"}
                    ]
                },
                {
                    "id": "wrapper",
                    "type": "object",
                    "fields": [
                        {"id": "inner", "type": "lazy-link", "target": "#/definitions/parameter"}
                    ]
                }
            ]
        },
        {
            "id": "operation",
            "type": "object",
            "props": {"collapsible": true},
            "fields": [
                {"id": "summary", "type": "text"},
                {
                    "id": "header",
                    "type": "lazy-link",
                    "target": "#/definitions/parameter",
                    "overrides": {
                        "in;enum": ["header"],
                        "required;hidden": true,
                        "description": null
                    }
                },
                {"id": "wrapped", "type": "lazy-link", "target": "#/definitions/wrapper"}
            ]
        }
    ]
}"##;

/// Builds the tree described by [`API_SCHEMA`]
pub fn api_tree() -> FieldTree {
    let schema = FieldSchema::from_json_str(API_SCHEMA).expect("Failed to parse API schema");
    FieldTree::from_schema(&schema).expect("Failed to build API tree")
}

/// Resolves a path from the root, panicking if it does not resolve
pub fn field(tree: &FieldTree, path: &str) -> FieldId {
    let root = tree.root().expect("Tree has no root");
    tree.resolve_path_str(root, path)
        .expect("Failed to resolve path")
        .unwrap_or_else(|| panic!("No field at '{path}'"))
}

/// Parses a JSON literal into a [`Value`]
pub fn json(literal: &str) -> Value {
    serde_json::from_str(literal).expect("Invalid JSON literal")
}
