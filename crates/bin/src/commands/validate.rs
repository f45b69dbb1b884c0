//! Validate command - reports every validation issue in the tree.

use std::error::Error;
use std::process::ExitCode;

use super::load_tree;
use crate::cli::ValidateArgs;
use crate::output::{OutputFormat, print_table};

/// Run the validate command
///
/// Exits with failure when any field below the root is invalid.
pub fn run(args: &ValidateArgs, format: OutputFormat) -> Result<ExitCode, Box<dyn Error>> {
    let (tree, _) = load_tree(&args.tree)?;
    let root = tree.root().ok_or("schema produced an empty tree")?;
    let (result, errors) = tree.validate(root)?;
    let valid = result.is_fully_valid();

    match format {
        OutputFormat::Human => {
            if errors.is_empty() {
                println!("Valid: no issues found");
            } else {
                let rows: Vec<Vec<String>> = errors
                    .iter()
                    .map(|issue| {
                        vec![
                            if issue.path.is_empty() {
                                ".".to_string()
                            } else {
                                issue.path.to_string()
                            },
                            issue.i18n.clone(),
                            issue.kind.to_string(),
                        ]
                    })
                    .collect();
                print_table(&["PATH", "I18N", "ISSUE"], &rows);
                println!();
                println!("{} issue(s) found", errors.len());
            }
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "valid": valid,
                "issues": errors,
                "result": result,
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }

    Ok(if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
