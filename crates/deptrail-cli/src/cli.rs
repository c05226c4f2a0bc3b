//! CLI argument definitions for deptrail.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "deptrail",
    version,
    about = "Walk a project's dependency graph",
    long_about = "deptrail walks the dependency graph of a project, keeps the version nearest \
                  the root for every library name, rejects circular dependencies, and reports \
                  what each library's dependencies were corrected to."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Arguments shared by every command that walks a graph.
#[derive(Args, Debug)]
pub struct WalkArgs {
    /// Root project name
    pub name: String,
    /// Target framework, e.g. ".NETFramework,Version=v4.5"
    #[arg(short, long)]
    pub framework: Option<String>,
    /// Directory containing `<name>/project.toml` projects (repeatable)
    #[arg(short = 'p', long = "search-path")]
    pub search_paths: Vec<PathBuf>,
    /// Config file to use instead of ~/.deptrail/config.toml
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a project and list the winning libraries
    Resolve {
        #[command(flatten)]
        walk: WalkArgs,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display the dependency tree
    Tree {
        #[command(flatten)]
        walk: WalkArgs,
        /// Maximum depth
        #[arg(long)]
        depth: Option<u32>,
        /// Explain why a dependency is included
        #[arg(long)]
        why: Option<String>,
        /// Show what depends on a library
        #[arg(long)]
        inverted: Option<String>,
        /// List eclipsed and unresolved dependencies
        #[arg(long)]
        eclipsed: bool,
        /// Show the corrected graph instead of the walk tree
        #[arg(long)]
        resolved: bool,
    },
}

/// Parse command-line arguments.
pub fn parse() -> Cli {
    Cli::parse()
}
