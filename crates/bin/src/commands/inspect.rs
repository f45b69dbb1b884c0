//! Inspect command - lists every live field with its kind, state and value.

use std::error::Error;
use std::process::ExitCode;

use fieldtree::{FieldId, FieldTree, LinkState};

use super::{display_path, load_tree};
use crate::cli::InspectArgs;
use crate::output::{OutputFormat, print_table, truncate};

const VALUE_WIDTH: usize = 40;

/// Returns true if the field and all of its ancestors are displayed
fn is_shown(tree: &FieldTree, id: FieldId) -> Result<bool, Box<dyn Error>> {
    let mut current = Some(id);
    while let Some(field) = current {
        if !tree.base_should_display(field)? {
            return Ok(false);
        }
        current = tree.parent(field)?;
    }
    Ok(true)
}

/// Run the inspect command
pub fn run(args: &InspectArgs, format: OutputFormat) -> Result<ExitCode, Box<dyn Error>> {
    let (tree, report) = load_tree(&args.tree)?;
    let root = tree.root().ok_or("schema produced an empty tree")?;

    let mut fields = Vec::new();
    for id in tree.subtree(root)? {
        let shown = is_shown(&tree, id)?;
        if args.displayed_only && !shown {
            continue;
        }
        let node = tree.node(id)?;
        let state = node.as_lazy_link().map(|link| match link.state() {
            LinkState::Absent => "absent",
            LinkState::Active => "active",
        });
        let value = match node.as_object() {
            Some(_) => None,
            None => tree.get_value(id)?,
        };
        fields.push((id, node.field_type(), state, shown, value));
    }

    match format {
        OutputFormat::Human => {
            let mut rows = Vec::with_capacity(fields.len());
            for (id, field_type, state, shown, value) in &fields {
                rows.push(vec![
                    display_path(&tree, *id)?,
                    field_type.to_string(),
                    state.unwrap_or("-").to_string(),
                    if *shown { "yes" } else { "no" }.to_string(),
                    value
                        .as_ref()
                        .map(|value| truncate(&value.to_json_string(), VALUE_WIDTH))
                        .unwrap_or_else(|| "-".to_string()),
                    tree.i18n_path(*id)?,
                ]);
            }
            print_table(&["PATH", "TYPE", "LINK", "SHOWN", "VALUE", "I18N"], &rows);
            println!();
            println!(
                "{} fields, {} link children created, {} destroyed in the last refresh",
                fields.len(),
                report.created,
                report.destroyed
            );
        }
        OutputFormat::Json => {
            let mut entries = Vec::with_capacity(fields.len());
            for (id, field_type, state, shown, value) in fields {
                entries.push(serde_json::json!({
                    "path": tree.path_of(id)?,
                    "type": field_type,
                    "link": state,
                    "shown": shown,
                    "value": value.map(serde_json::Value::from),
                    "i18n": tree.i18n_path(id)?,
                }));
            }
            let value = serde_json::json!({
                "fields": entries,
                "refresh": report,
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
