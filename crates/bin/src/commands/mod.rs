//! Command implementations.

use std::{error::Error, fs};

use fieldtree::{FieldId, FieldSchema, FieldTree, RefreshReport, Value, constants::PROP_HIDDEN};
use tracing::info;

use crate::cli::TreeArgs;

pub mod inspect;
pub mod validate;
pub mod value;

/// Builds the tree described by `args` and brings it to a polled state.
///
/// `--collapse` paths are applied before the first refresh, so lazy links
/// below them are never materialized; they cannot use `:child`. The document
/// is then assigned to the root and `--hide` is applied. Hide paths may use
/// `:child` since they are resolved after the first refresh. Returns the
/// report of the final refresh.
pub fn load_tree(args: &TreeArgs) -> Result<(FieldTree, RefreshReport), Box<dyn Error>> {
    let schema = FieldSchema::from_file(&args.schema)?;
    let mut tree = FieldTree::from_schema(&schema)?;
    let root = tree.root().ok_or("schema produced an empty tree")?;

    for path in &args.collapse {
        let id = resolve(&tree, root, path)?;
        tree.set_collapsed(id, true)?;
    }
    let mut report = tree.refresh()?;

    if let Some(document) = &args.document {
        let contents = fs::read_to_string(document)?;
        let value: Value = serde_json::from_str(&contents)?;
        tree.set_value(root, value)?;
        report = tree.refresh()?;
        info!(document = %document.display(), "Applied document to root field");
    }

    if !args.hide.is_empty() {
        for path in &args.hide {
            let id = resolve(&tree, root, path)?;
            tree.set_prop(id, PROP_HIDDEN, true)?;
        }
        report = tree.refresh()?;
    }

    Ok((tree, report))
}

/// Resolves a path from `root`, failing when nothing is there
pub fn resolve(tree: &FieldTree, root: FieldId, path: &str) -> Result<FieldId, Box<dyn Error>> {
    Ok(tree
        .resolve_path_str(root, path)?
        .ok_or_else(|| format!("No field at path '{path}'"))?)
}

/// Path of a field for display, `.` for the root
pub fn display_path(tree: &FieldTree, id: FieldId) -> Result<String, Box<dyn Error>> {
    let path = tree.path_of(id)?;
    Ok(if path.is_empty() {
        ".".to_string()
    } else {
        path.to_string()
    })
}
