//! CLI argument definitions for the jotdb binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// jotdb: JSON-style data over a flat key-value store
#[derive(Parser, Debug)]
#[command(name = "jotdb")]
#[command(about = "Store, inspect, and export JSON data addressable piece by piece")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create (or recreate) a store, optionally seeded from a JSON file
    Init(InitArgs),
    /// Export a store's contents as JSON
    Export(ExportArgs),
    /// Print the value at a dotted map path
    Get(GetArgs),
}

/// Arguments for the init command
#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Store file to create; an existing file is replaced
    #[arg(env = "JOTDB_PATH")]
    pub store: PathBuf,

    /// JSON file with the initial contents; defaults to an empty map
    pub json_file: Option<PathBuf>,
}

/// Arguments for the export command
#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Store file to read
    #[arg(env = "JOTDB_PATH")]
    pub store: PathBuf,

    /// Output file; defaults to stdout
    pub json_file: Option<PathBuf>,
}

/// Arguments for the get command
#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// Store file to read
    #[arg(env = "JOTDB_PATH")]
    pub store: PathBuf,

    /// Dot-separated map path, e.g. "users.alice.age"; empty for the root
    #[arg(default_value = "")]
    pub path: String,
}
