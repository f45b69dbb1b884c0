//! CLI argument definitions for the fieldtree binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

/// Inspect and validate schema-driven field trees
#[derive(Parser, Debug)]
#[command(name = "fieldtree")]
#[command(about = "fieldtree: load a field schema, apply a document, poll lazy links")]
#[command(version)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "human", env = "FIELDTREE_FORMAT")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every live field after a refresh pass
    Inspect(InspectArgs),
    /// Validate the tree and report issues
    Validate(ValidateArgs),
    /// Print the value of the tree or of a single field
    Value(ValueArgs),
}

/// Arguments shared by every command that builds a tree
#[derive(clap::Args, Debug)]
pub struct TreeArgs {
    /// Path to the JSON schema describing the tree
    pub schema: PathBuf,

    /// JSON document assigned to the root field
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Hide the field at this path before polling (repeatable)
    #[arg(long = "hide", value_name = "PATH")]
    pub hide: Vec<String>,

    /// Collapse the object at this path before polling (repeatable)
    #[arg(long = "collapse", value_name = "PATH")]
    pub collapse: Vec<String>,
}

/// Arguments for the inspect command
#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub tree: TreeArgs,

    /// Only list fields that are currently displayed
    #[arg(long)]
    pub displayed_only: bool,
}

/// Arguments for the validate command
#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub tree: TreeArgs,
}

/// Arguments for the value command
#[derive(clap::Args, Debug)]
pub struct ValueArgs {
    #[command(flatten)]
    pub tree: TreeArgs,

    /// Path of the field to print, `:child` enters a lazy link
    #[arg(short, long)]
    pub path: Option<String>,
}
