//! Reference, path and display key resolution tests

use fieldtree::{FieldNode, LazyLinkField, Value};

use crate::helpers::*;

// ===== REFERENCES =====

#[test]
fn test_resolve_ref_segments() {
    let tree = api_tree();
    let root = tree.root().unwrap();
    let operation = field(&tree, "operation");
    let summary = field(&tree, "operation/summary");
    let parameter = field(&tree, "definitions/parameter");

    assert_eq!(tree.resolve_ref(summary, "#").unwrap(), Some(root));
    assert_eq!(
        tree.resolve_ref(summary, "#/definitions/parameter").unwrap(),
        Some(parameter)
    );
    assert_eq!(tree.resolve_ref(summary, "..").unwrap(), Some(operation));
    assert_eq!(tree.resolve_ref(summary, "./").unwrap(), Some(summary));
    assert_eq!(tree.resolve_ref(summary, "../header/..").unwrap(), Some(operation));
    assert_eq!(tree.resolve_ref(root, "..").unwrap(), None);
    assert_eq!(tree.resolve_ref(root, "operation/missing").unwrap(), None);
    assert_eq!(tree.resolve_ref(summary, "").unwrap(), Some(summary));
}

#[test]
fn test_resolve_ref_enters_live_children_only() {
    let mut tree = api_tree();
    let header = field(&tree, "operation/header");
    assert_eq!(tree.resolve_ref(header, ":child/name").unwrap(), None);

    tree.refresh().unwrap();
    let name = field(&tree, "operation/header/:child/name");
    assert_eq!(tree.resolve_ref(header, ":child/name").unwrap(), Some(name));
    assert_eq!(
        tree.resolve_ref(name, "#/operation/header/:child/name").unwrap(),
        Some(name)
    );
}

#[test]
fn test_root_of_a_cloned_field_is_the_tree_root() {
    let mut tree = api_tree();
    tree.refresh().unwrap();
    let inner_name = field(&tree, "operation/wrapped/:child/inner/:child/name");
    assert_eq!(tree.root_of(inner_name).unwrap(), tree.root().unwrap());
}

// ===== PATHS =====

#[test]
fn test_empty_path_resolves_to_self() {
    let tree = api_tree();
    let header = field(&tree, "operation/header");
    let empty: [&str; 0] = [];
    assert_eq!(tree.resolve_path(header, &empty).unwrap(), Some(header));
}

#[test]
fn test_child_marker_delegates_to_the_child() {
    let mut tree = api_tree();
    let header = field(&tree, "operation/header");
    assert_eq!(tree.resolve_path(header, &[":child", "name"]).unwrap(), None);

    let child = tree.create_child(header).unwrap();
    let name = tree.find_child(child, "name").unwrap().unwrap();
    assert_eq!(tree.resolve_path(header, &[":child"]).unwrap(), Some(child));
    assert_eq!(
        tree.resolve_path(header, &[":child", "name"]).unwrap(),
        Some(name)
    );
    assert_eq!(tree.resolve_path(header, &["name"]).unwrap(), None);
    assert_eq!(
        tree.resolve_path(header, &[":child", "missing"]).unwrap(),
        None
    );
}

#[test]
fn test_path_of_round_trips_through_resolve_path() {
    let mut tree = api_tree();
    tree.refresh().unwrap();
    let root = tree.root().unwrap();

    for path in [
        "operation/summary",
        "operation/header/:child/in",
        "operation/wrapped/:child/inner/:child/required",
        "definitions/wrapper/inner",
    ] {
        let id = field(&tree, path);
        let found = tree.path_of(id).unwrap();
        assert_eq!(found.as_str(), path);
        let segments: Vec<_> = found.components().collect();
        assert_eq!(tree.resolve_path(root, &segments).unwrap(), Some(id));
    }
}

#[test]
fn test_stale_handles_are_rejected_everywhere() {
    let mut tree = api_tree();
    let header = field(&tree, "operation/header");
    let child = tree.create_child(header).unwrap();
    tree.delete_child(header).unwrap();

    assert!(tree.get_value(child).unwrap_err().is_stale_handle());
    assert!(tree.set_value(child, Value::Null).unwrap_err().is_stale_handle());
    assert!(tree.resolve_ref(child, "..").unwrap_err().is_stale_handle());
    assert!(tree.i18n_path(child).unwrap_err().is_stale_handle());
    assert!(tree.should_display(child).unwrap_err().is_stale_handle());
}

// ===== DISPLAY KEYS =====

#[test]
fn test_i18n_path_of_plain_fields() {
    let tree = api_tree();
    assert_eq!(tree.i18n_path(tree.root().unwrap()).unwrap(), "api");
    assert_eq!(
        tree.i18n_path(field(&tree, "operation/summary")).unwrap(),
        "api.operation.summary"
    );
}

#[test]
fn test_i18n_path_of_links_follows_the_target() {
    let mut tree = api_tree();
    let header = field(&tree, "operation/header");
    assert_eq!(tree.i18n_path(header).unwrap(), "api.definitions.parameter");

    tree.refresh().unwrap();
    let child = field(&tree, "operation/header/:child");
    let name = field(&tree, "operation/header/:child/name");
    assert_eq!(tree.i18n_path(child).unwrap(), "api.definitions.parameter");
    assert_eq!(
        tree.i18n_path(name).unwrap(),
        "api.definitions.parameter.name"
    );

    let inner_name = field(&tree, "operation/wrapped/:child/inner/:child/name");
    assert_eq!(
        tree.i18n_path(inner_name).unwrap(),
        "api.definitions.parameter.name"
    );
}

#[test]
fn test_i18n_path_of_unresolved_link_uses_the_parent() {
    let mut tree = api_tree();
    let operation = field(&tree, "operation");
    let link = tree
        .add_child(
            operation,
            FieldNode::new("dangling", LazyLinkField::new("#/nowhere")),
        )
        .unwrap();
    assert_eq!(tree.i18n_path(link).unwrap(), "api.operation");

    let untargeted = tree
        .add_child(operation, FieldNode::new("untargeted", LazyLinkField::new("#")))
        .unwrap();
    assert_eq!(tree.i18n_path(untargeted).unwrap(), "api.operation");
}

#[test]
fn test_i18n_prop_wins() {
    let mut tree = api_tree();
    let summary = field(&tree, "operation/summary");
    let header = field(&tree, "operation/header");

    tree.set_prop(summary, "i18n", "labels.summary").unwrap();
    tree.set_prop(header, "i18n", "labels.header").unwrap();
    assert_eq!(tree.i18n_path(summary).unwrap(), "labels.summary");
    assert_eq!(tree.i18n_path(header).unwrap(), "labels.header");
}

#[test]
fn test_i18n_path_survives_link_cycles() {
    let mut tree = api_tree();
    let operation = field(&tree, "operation");
    let ping = tree
        .add_child(operation, FieldNode::new("ping", LazyLinkField::new("../pong")))
        .unwrap();
    tree.add_child(operation, FieldNode::new("pong", LazyLinkField::new("../ping")))
        .unwrap();

    assert_eq!(tree.i18n_path(ping).unwrap(), "api.operation.ping");
}
