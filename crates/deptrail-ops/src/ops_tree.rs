//! Operation: display the dependency tree.

use deptrail_resolver::graph::ResolvedGraph;
use deptrail_util::errors::DeptrailResult;

use crate::WalkOptions;

/// Options for `deptrail tree`.
#[derive(Debug, Default)]
pub struct TreeOptions {
    /// Maximum tree depth to display.
    pub depth: Option<usize>,
    /// Explain why a dependency is included.
    pub why: Option<String>,
    /// Show who depends on this library instead of the forward tree.
    pub inverted: Option<String>,
    /// Show eclipsed and unresolved edges.
    pub eclipsed: bool,
    /// Show the corrected graph instead of the raw walk tree.
    pub resolved: bool,
}

/// Render the tree view selected by `opts`.
pub fn tree(walk: &WalkOptions, opts: &TreeOptions) -> DeptrailResult<String> {
    let walked = crate::walk_project(walk)?;

    if opts.eclipsed {
        let mut out = walked.context.report().to_string();
        if !out.ends_with('\n') {
            out.push('\n');
        }
        return Ok(out);
    }

    if opts.why.is_none() && opts.inverted.is_none() && !opts.resolved {
        return Ok(walked.context.render_tree(opts.depth).unwrap_or_default());
    }

    let mut libraries = Vec::new();
    walked.context.populate(&walked.framework, &mut libraries);
    let graph = ResolvedGraph::from_libraries(&walked.root.name, &libraries);

    if let Some(target) = &opts.why {
        let Some(path) = graph.find_path(target) else {
            return Ok(format!("Dependency '{target}' not found in the graph.\n"));
        };
        let mut out = format!("Path to {target}:\n");
        for (i, node) in path.iter().enumerate() {
            out.push_str(&format!("{}{node}\n", "  ".repeat(i)));
        }
        return Ok(out);
    }

    if let Some(target) = &opts.inverted {
        let out = graph.print_inverted_tree(target);
        if out.is_empty() {
            return Ok(format!("Dependency '{target}' not found in the graph.\n"));
        }
        return Ok(out);
    }

    Ok(graph.print_tree(opts.depth))
}
