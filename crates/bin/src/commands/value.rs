//! Value command - prints the value of the root or of a single field.

use std::error::Error;
use std::process::ExitCode;

use super::{load_tree, resolve};
use crate::cli::ValueArgs;
use crate::output::OutputFormat;

/// Run the value command
pub fn run(args: &ValueArgs, format: OutputFormat) -> Result<ExitCode, Box<dyn Error>> {
    let (tree, _) = load_tree(&args.tree)?;
    let root = tree.root().ok_or("schema produced an empty tree")?;
    let id = match &args.path {
        Some(path) => resolve(&tree, root, path)?,
        None => root,
    };

    let value = tree
        .get_value(id)?
        .map(serde_json::Value::from)
        .unwrap_or(serde_json::Value::Null);

    match format {
        OutputFormat::Human => println!("{}", serde_json::to_string_pretty(&value)?),
        OutputFormat::Json => println!("{}", serde_json::to_string(&value)?),
    }

    Ok(ExitCode::SUCCESS)
}
