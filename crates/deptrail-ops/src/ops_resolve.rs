//! Operation: resolve a project's dependency graph to a flat library list.

use serde::Serialize;

use deptrail_core::framework::FrameworkName;
use deptrail_core::library::{name_key, LibraryDescription};
use deptrail_resolver::report::WalkReport;
use deptrail_util::errors::{DeptrailError, DeptrailResult};

use crate::WalkOptions;

/// Result of `deptrail resolve`.
#[derive(Debug)]
pub struct ResolveOutcome {
    pub root: String,
    pub framework: FrameworkName,
    /// Winning libraries, sorted by name.
    pub libraries: Vec<LibraryDescription>,
    pub report: WalkReport,
}

/// Walk the root project and return the corrected library set.
pub fn resolve(opts: &WalkOptions) -> DeptrailResult<ResolveOutcome> {
    let walked = crate::walk_project(opts)?;

    let mut libraries = Vec::new();
    walked.context.populate(&walked.framework, &mut libraries);
    libraries.sort_by_key(|lib| name_key(&lib.identity.name));

    Ok(ResolveOutcome {
        root: walked.root.name,
        framework: walked.framework,
        libraries,
        report: walked.context.report().clone(),
    })
}

/// Human-readable listing of an outcome.
pub fn render_text(outcome: &ResolveOutcome) -> String {
    let mut out = format!(
        "Resolved {} libraries for {} ({})\n",
        outcome.libraries.len(),
        outcome.root,
        outcome.framework
    );

    for lib in &outcome.libraries {
        out.push_str(&format!("{} [{}]", lib.identity, lib.library_type));
        if !lib.resolved {
            out.push_str(" (no matching framework)");
        }
        out.push('\n');
        for dep in &lib.dependencies {
            match &dep.library {
                Some(identity) => out.push_str(&format!("  -> {identity}\n")),
                None => out.push_str(&format!("  -> {}\n", dep.range)),
            }
        }
    }

    if !outcome.report.is_empty() {
        out.push('\n');
        out.push_str(&outcome.report.to_string());
    }
    out
}

#[derive(Serialize)]
struct JsonOutcome<'a> {
    root: &'a str,
    framework: String,
    libraries: &'a [LibraryDescription],
    eclipsed: Vec<String>,
    unresolved: Vec<String>,
}

/// Machine-readable form of an outcome.
pub fn render_json(outcome: &ResolveOutcome) -> DeptrailResult<String> {
    let json = JsonOutcome {
        root: &outcome.root,
        framework: outcome.framework.to_string(),
        libraries: &outcome.libraries,
        eclipsed: outcome.report.eclipsed.iter().map(ToString::to_string).collect(),
        unresolved: outcome.report.unresolved.iter().map(ToString::to_string).collect(),
    };
    serde_json::to_string_pretty(&json).map_err(|e| {
        DeptrailError::Generic {
            message: format!("Failed to serialize resolution result: {e}"),
        }
        .into()
    })
}
