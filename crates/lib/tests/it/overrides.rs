//! Override application tests
//!
//! Overrides are exercised both through lazy link creation and directly
//! through `FieldTree::apply_overrides`.

use fieldtree::{Error, FieldError, FieldNode, LazyLinkField, Overrides, PathError, Value};

use crate::helpers::*;

#[test]
fn test_schema_overrides_shape_the_clone() {
    let mut tree = api_tree();
    let parameter = field(&tree, "definitions/parameter");
    tree.refresh().unwrap();

    let child = field(&tree, "operation/header/:child");
    let child_in = field(&tree, "operation/header/:child/in");
    let child_required = field(&tree, "operation/header/:child/required");

    assert!(tree.props(child).unwrap().get("description").is_none());
    assert_eq!(
        tree.props(child_in).unwrap().get("enum"),
        Some(&json(r#"["header"]"#))
    );
    assert!(tree.node(child_required).unwrap().prop_flag("hidden"));

    // The template keeps its own props
    let template_in = field(&tree, "definitions/parameter/in");
    assert_eq!(
        tree.props(parameter).unwrap().get("description"),
        Some(&Value::from("A request parameter"))
    );
    assert_eq!(
        tree.props(template_in).unwrap().get("enum"),
        Some(&json(r#"["query", "header", "path"]"#))
    );
}

#[test]
fn test_later_overrides_win() {
    let mut tree = api_tree();
    let parameter = field(&tree, "definitions/parameter");
    let overrides = Overrides::new()
        .with("meta", json(r#"{"label": "first", "order": 1}"#))
        .unwrap()
        .with("meta/label", "second")
        .unwrap()
        .without("meta/order")
        .unwrap();

    tree.apply_overrides(parameter, &overrides).unwrap();
    assert_eq!(
        tree.props(parameter).unwrap().get("meta"),
        Some(&json(r#"{"label": "second"}"#))
    );
}

#[test]
fn test_deleting_an_absent_key_is_a_no_op() {
    let mut tree = api_tree();
    let parameter = field(&tree, "definitions/parameter");
    let before = tree.props(parameter).unwrap().clone();

    let overrides = Overrides::new().without("nonexistent").unwrap();
    tree.apply_overrides(parameter, &overrides).unwrap();
    assert_eq!(tree.props(parameter).unwrap(), &before);
}

#[test]
fn test_list_indices_and_root_marker() {
    let mut tree = api_tree();
    let parameter = field(&tree, "definitions/parameter");
    let overrides = Overrides::new()
        .with("tags/0", "header-param")
        .unwrap()
        .with("#/description", "Rewritten")
        .unwrap();

    tree.apply_overrides(parameter, &overrides).unwrap();
    let props = tree.props(parameter).unwrap();
    assert_eq!(props.get("tags"), Some(&json(r#"["header-param"]"#)));
    assert_eq!(props.get("description"), Some(&Value::from("Rewritten")));
}

#[test]
fn test_scoped_override_reaches_nested_elements() {
    let mut tree = api_tree();
    let operation = field(&tree, "operation");
    let overrides: Overrides = serde_json::from_str(
        r#"{"inner;i18n": "labels.inner", "inner;required": true}"#,
    )
    .unwrap();
    let link = tree
        .add_child(
            operation,
            FieldNode::new(
                "scoped",
                LazyLinkField::new("#/definitions/wrapper").with_overrides(overrides),
            ),
        )
        .unwrap();

    tree.should_display(link).unwrap();
    let inner = field(&tree, "operation/scoped/:child/inner");
    assert!(tree.node(inner).unwrap().prop_flag("required"));
    assert_eq!(tree.i18n_path(inner).unwrap(), "labels.inner");

    let template_inner = field(&tree, "definitions/wrapper/inner");
    assert!(!tree.node(template_inner).unwrap().prop_flag("required"));
}

#[test]
fn test_stepping_through_a_scalar_fails() {
    let mut tree = api_tree();
    let parameter = field(&tree, "definitions/parameter");
    let overrides = Overrides::new().with("description/short", "x").unwrap();

    let err = tree.apply_overrides(parameter, &overrides).unwrap_err();
    assert!(err.is_path_error());
    match err {
        Error::Field(FieldError::Override { source, .. }) => {
            assert!(source.is_not_a_container());
            assert_eq!(source.segment(), Some("short"));
        }
        other => panic!("Expected override error, got {other:?}"),
    }
}

#[test]
fn test_failure_stops_at_the_first_bad_override() {
    let mut tree = api_tree();
    let parameter = field(&tree, "definitions/parameter");
    let overrides = Overrides::new()
        .with("first", 1)
        .unwrap()
        .with("missing/key", 2)
        .unwrap()
        .with("third", 3)
        .unwrap();

    let err = tree.apply_overrides(parameter, &overrides).unwrap_err();
    assert!(matches!(
        err,
        Error::Field(FieldError::Override {
            source: PathError::MissingSegment { .. },
            ..
        })
    ));
    let props = tree.props(parameter).unwrap();
    assert_eq!(props.get("first"), Some(&Value::from(1)));
    assert!(props.get("third").is_none());
}
