//! Provider that resolves libraries to `project.toml` projects on disk.

use std::path::PathBuf;

use miette::WrapErr;
use semver::Version;

use deptrail_core::framework::FrameworkName;
use deptrail_core::library::{
    names_match, LibraryDependency, LibraryDescription, LibraryIdentity, LibraryRange,
    LibraryType,
};
use deptrail_core::project::Project;
use deptrail_core::PROJECT_FILE;
use deptrail_util::errors::{DeptrailError, DeptrailResult};

use crate::provider::DependencyProvider;

const VERSION_35: Version = Version::new(3, 5, 0);
const VERSION_40: Version = Version::new(4, 0, 0);

/// Finds `<search-path>/<name>/project.toml` in priority order.
#[derive(Debug, Clone)]
pub struct ProjectResolver {
    search_paths: Vec<PathBuf>,
}

impl ProjectResolver {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Load the first project named `name`.
    ///
    /// A project file that exists but fails to parse, or whose package name
    /// differs from its directory name, is an error rather than a miss.
    pub fn try_resolve_project(&self, name: &str) -> DeptrailResult<Option<Project>> {
        for dir in &self.search_paths {
            let candidate = dir.join(name).join(PROJECT_FILE);
            if candidate.is_file() {
                let project = Project::from_path(&candidate)
                    .wrap_err_with(|| format!("while loading project '{name}'"))?;
                if !names_match(&project.name, name) {
                    return Err(DeptrailError::Manifest {
                        message: format!(
                            "{} declares package '{}' but lives in directory '{name}'",
                            candidate.display(),
                            project.name
                        ),
                    }
                    .into());
                }
                return Ok(Some(project));
            }
        }
        Ok(None)
    }
}

/// Describes projects found by a [`ProjectResolver`].
///
/// Version constraints are not checked: a project on the search path always
/// satisfies a request for its name.
#[derive(Debug, Clone)]
pub struct ProjectReferenceProvider {
    resolver: ProjectResolver,
}

impl ProjectReferenceProvider {
    pub fn new(resolver: ProjectResolver) -> Self {
        Self { resolver }
    }
}

impl DependencyProvider for ProjectReferenceProvider {
    fn name(&self) -> &str {
        "project"
    }

    fn get_description(
        &self,
        range: &LibraryRange,
        framework: &FrameworkName,
    ) -> DeptrailResult<Option<LibraryDescription>> {
        if range.is_framework_reference {
            return Ok(None);
        }

        let Some(project) = self.resolver.try_resolve_project(&range.name)? else {
            return Ok(None);
        };

        let target_info = project.target_framework(framework);
        let mut framework_dependencies = target_info.dependencies.clone();
        if framework.is_desktop() {
            framework_dependencies.extend(implicit_framework_references(&framework.version));
        }

        let dependencies = project
            .dependencies
            .iter()
            .cloned()
            .chain(framework_dependencies)
            .collect();

        // Declared frameworks, none of which matched.
        let unresolved = target_info.framework_name.is_none() && project.has_target_frameworks();

        let mut description = LibraryDescription::new(
            range.clone(),
            LibraryIdentity::new(project.name.clone(), Some(project.version.clone())),
            dependencies,
        );
        description.library_type = LibraryType::Project;
        description.framework = target_info.framework_name;
        description.path = project.project_dir.as_ref().map(|d| d.join(PROJECT_FILE));
        description.resolved = !unresolved;
        if project.loadable {
            description.loadable_assemblies.push(project.name.clone());
        }

        tracing::trace!(
            library = %description.identity,
            resolved = description.resolved,
            "described project"
        );
        Ok(Some(description))
    }

    fn attempted_paths(&self, _framework: &FrameworkName) -> Vec<String> {
        self.resolver
            .search_paths()
            .iter()
            .map(|p| p.join("{name}").join(PROJECT_FILE).display().to_string())
            .collect()
    }
}

fn implicit_framework_references(version: &Version) -> Vec<LibraryDependency> {
    let mut names = vec!["mscorlib", "System"];
    if *version >= VERSION_35 {
        names.push("System.Core");
        if *version >= VERSION_40 {
            names.push("Microsoft.CSharp");
        }
    }
    names
        .into_iter()
        .map(|n| LibraryDependency::new(LibraryRange::framework_reference(n)))
        .collect()
}
