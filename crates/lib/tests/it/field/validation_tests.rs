//! Validation aggregation tests

use fieldtree::{FieldNode, IssueKind, LazyLinkField, Validation, Value};

use crate::helpers::*;

#[test]
fn test_unmaterialized_tree_is_valid() {
    let tree = api_tree();
    let (result, errors) = tree.validate(tree.root().unwrap()).unwrap();

    assert!(result.is_fully_valid());
    assert!(errors.is_empty());
    assert!(result.get("definitions").is_none());

    let header = result.get("operation").and_then(|r| r.get("header")).unwrap();
    assert_eq!(header.child.as_deref(), Some(&Validation::passed()));
    assert_eq!(header.children_valid, Some(true));
}

#[test]
fn test_child_issues_propagate_through_the_link() {
    let mut tree = api_tree();
    tree.refresh().unwrap();
    let (result, errors) = tree.validate(tree.root().unwrap()).unwrap();

    assert!(result.valid);
    assert_eq!(result.children_valid, Some(false));

    let operation = result.get("operation").unwrap();
    let header = operation.get("header").unwrap();
    assert!(header.valid);
    assert_eq!(header.children_valid, Some(false));

    let child = header.child.as_deref().unwrap();
    assert!(child.get("name").is_some_and(|name| !name.valid));
    assert!(child.get("required").is_none(), "hidden by override");

    let paths: Vec<_> = errors.iter().map(|issue| issue.path.as_str()).collect();
    assert_eq!(
        paths,
        [
            "operation/header/:child/name",
            "operation/wrapped/:child/inner/:child/name",
        ]
    );
    let issue = errors.iter().next().unwrap();
    assert_eq!(issue.kind, IssueKind::Required);
    assert_eq!(issue.i18n, "api.definitions.parameter.name");
}

#[test]
fn test_filling_required_fields_makes_the_tree_valid() {
    let mut tree = api_tree();
    tree.refresh().unwrap();
    for path in [
        "operation/header/:child/name",
        "operation/wrapped/:child/inner/:child/name",
    ] {
        let name = field(&tree, path);
        tree.set_value(name, "X-Filled".into()).unwrap();
    }

    let (result, errors) = tree.validate(tree.root().unwrap()).unwrap();
    assert!(errors.is_empty(), "unexpected issues: {errors:?}");
    assert!(result.is_fully_valid());
}

#[test]
fn test_nested_link_validity_reaches_the_outer_link() {
    let mut tree = api_tree();
    tree.refresh().unwrap();
    let wrapped = field(&tree, "operation/wrapped");
    let header_name = field(&tree, "operation/header/:child/name");
    tree.set_value(header_name, "X-Ok".into()).unwrap();

    let (result, errors) = tree.validate(wrapped).unwrap();
    assert!(result.valid);
    assert_eq!(result.children_valid, Some(false));
    assert_eq!(errors.len(), 1);

    let inner_name = field(&tree, "operation/wrapped/:child/inner/:child/name");
    tree.set_value(inner_name, "X-Inner".into()).unwrap();
    let (result, errors) = tree.validate(wrapped).unwrap();
    assert_eq!(result.children_valid, Some(true));
    assert!(errors.is_empty());
}

#[test]
fn test_overridden_enum_applies_to_the_clone() {
    let mut tree = api_tree();
    tree.refresh().unwrap();
    let header_in = field(&tree, "operation/header/:child/in");
    let inner_in = field(&tree, "operation/wrapped/:child/inner/:child/in");

    tree.set_value(header_in, "query".into()).unwrap();
    tree.set_value(inner_in, "query".into()).unwrap();

    let mut errors = fieldtree::ValidationErrors::new();
    let header = tree.revalidate(header_in, &mut errors).unwrap();
    assert!(!header.valid);
    assert_eq!(
        errors.for_path("operation/header/:child/in").next().map(|i| &i.kind),
        Some(&IssueKind::NotAllowed)
    );

    let inner = tree.revalidate(inner_in, &mut errors).unwrap();
    assert!(inner.valid);
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_type_mismatch_is_reported() {
    let mut tree = api_tree();
    tree.refresh().unwrap();
    let name = field(&tree, "operation/header/:child/name");
    tree.set_value(name, Value::from(5)).unwrap();

    let (result, errors) = tree.validate(name).unwrap();
    assert!(!result.valid);
    assert_eq!(
        errors.iter().map(|i| i.kind.clone()).collect::<Vec<_>>(),
        [IssueKind::TypeMismatch {
            expected: "text",
            actual: "int",
        }]
    );
}

#[test]
fn test_required_link_checks_its_cache_while_absent() {
    let mut tree = api_tree();
    let operation = field(&tree, "operation");
    let link = tree
        .add_child(
            operation,
            FieldNode::new("auth", LazyLinkField::new("#/definitions/parameter"))
                .with_prop("required", true),
        )
        .unwrap();

    let (result, errors) = tree.validate(link).unwrap();
    assert!(!result.valid);
    assert_eq!(result.children_valid, Some(true));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.iter().next().unwrap().path.as_str(), "operation/auth");

    tree.set_value(link, json(r#"{"name": "Authorization"}"#))
        .unwrap();
    let (result, errors) = tree.validate(link).unwrap();
    assert!(result.valid);
    assert!(errors.is_empty());
}

#[test]
fn test_validation_never_fails_for_absent_links() {
    let mut tree = api_tree();
    let operation = field(&tree, "operation");
    let link = tree
        .add_child(
            operation,
            FieldNode::new("dangling", LazyLinkField::new("#/nowhere")),
        )
        .unwrap();

    let (result, errors) = tree.validate(link).unwrap();
    assert!(result.is_fully_valid());
    assert!(errors.is_empty());
}

#[test]
fn test_hidden_fields_are_skipped() {
    let mut tree = api_tree();
    tree.refresh().unwrap();
    let header = field(&tree, "operation/header");
    tree.set_prop(header, "hidden", true).unwrap();

    let operation = field(&tree, "operation");
    let (result, errors) = tree.validate(operation).unwrap();
    assert!(result.get("header").is_none());
    assert_eq!(errors.len(), 1);
}
