//! Operations behind the `deptrail` commands.
//!
//! Each `ops_*` module takes plain option structs and returns text ready to
//! print. Argument parsing stays in the CLI crate.

pub mod ops_resolve;
pub mod ops_tree;

use std::path::{Path, PathBuf};

use deptrail_core::config::GlobalConfig;
use deptrail_core::framework::FrameworkName;
use deptrail_core::project::Project;
use deptrail_core::PROJECT_FILE;
use deptrail_resolver::project_provider::{ProjectReferenceProvider, ProjectResolver};
use deptrail_resolver::provider::DependencyProvider;
use deptrail_resolver::walker::WalkContext;
use deptrail_util::errors::{DeptrailError, DeptrailResult};

/// Inputs shared by every operation that walks a project graph.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Name of the root project.
    pub name: String,
    /// Target framework; falls back to the configured default.
    pub framework: Option<String>,
    /// Search paths given on the command line. Tried before configured ones.
    pub search_paths: Vec<PathBuf>,
    /// Explicit config file instead of `~/.deptrail/config.toml`.
    pub config_path: Option<PathBuf>,
    /// Where to look for a default search path. Defaults to the process cwd.
    pub working_dir: Option<PathBuf>,
}

/// A finished walk together with the inputs it ran with.
pub struct Walked {
    pub root: Project,
    pub framework: FrameworkName,
    pub search_paths: Vec<PathBuf>,
    pub context: WalkContext,
}

/// Load configuration, locate the root project, and walk its graph.
pub fn walk_project(opts: &WalkOptions) -> DeptrailResult<Walked> {
    let config = match &opts.config_path {
        Some(path) => GlobalConfig::load_from(path)?,
        None => GlobalConfig::load()?,
    };

    let framework = FrameworkName::parse(
        opts.framework
            .as_deref()
            .unwrap_or_else(|| config.default_framework()),
    )?;
    let search_paths = effective_search_paths(opts, &config)?;
    tracing::debug!(
        root = %opts.name,
        framework = %framework,
        search_paths = ?search_paths,
        "starting walk"
    );

    let resolver = ProjectResolver::new(search_paths.clone());
    let provider = ProjectReferenceProvider::new(resolver.clone());
    let Some(root) = resolver.try_resolve_project(&opts.name)? else {
        let searched = provider.attempted_paths(&framework).join(", ");
        return Err(DeptrailError::Resolution {
            message: format!("project '{}' not found (searched {searched})", opts.name),
        }
        .into());
    };

    let providers: Vec<Box<dyn DependencyProvider>> = vec![Box::new(provider)];
    let mut context = WalkContext::new();
    context.walk(&providers, &root.name, &root.version, &framework)?;

    Ok(Walked {
        root,
        framework,
        search_paths,
        context,
    })
}

/// Command-line paths, then configured paths. When neither names any, the
/// directory holding the nearest enclosing project is used, else the
/// working directory itself.
fn effective_search_paths(
    opts: &WalkOptions,
    config: &GlobalConfig,
) -> DeptrailResult<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = opts
        .search_paths
        .iter()
        .chain(&config.resolve.search_paths)
        .cloned()
        .collect();
    if !paths.is_empty() {
        return Ok(paths);
    }

    let cwd = match &opts.working_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(DeptrailError::Io)?,
    };
    let default = deptrail_util::fs::find_ancestor_with(&cwd, PROJECT_FILE)
        .and_then(|project_dir| project_dir.parent().map(Path::to_path_buf))
        .unwrap_or(cwd);
    paths.push(default);
    Ok(paths)
}
