//! Command dispatch and handler modules.

mod resolve;
mod tree;

use miette::Result;

use deptrail_ops::WalkOptions;

use crate::cli::{Cli, Command, WalkArgs};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Resolve { walk, json } => resolve::exec(walk_options(walk), json),
        Command::Tree {
            walk,
            depth,
            why,
            inverted,
            eclipsed,
            resolved,
        } => tree::exec(walk_options(walk), depth, why, inverted, eclipsed, resolved),
    }
}

fn walk_options(args: WalkArgs) -> WalkOptions {
    WalkOptions {
        name: args.name,
        framework: args.framework,
        search_paths: args.search_paths,
        config_path: args.config,
        working_dir: None,
    }
}
