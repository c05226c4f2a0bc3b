//! `project.toml` manifests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};

use deptrail_util::errors::DeptrailError;

use crate::framework::FrameworkName;
use crate::library::{LibraryDependency, LibraryRange};

/// The on-disk shape of a `project.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectManifest {
    pub package: PackageMetadata,

    #[serde(default)]
    pub dependencies: BTreeMap<String, DependencySpec>,

    #[serde(default)]
    pub frameworks: BTreeMap<String, FrameworkSection>,
}

/// `[package]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    #[serde(default = "default_loadable")]
    pub loadable: bool,
}

fn default_loadable() -> bool {
    true
}

/// A dependency entry: either a bare version requirement or a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    Version(String),
    Detailed(DetailedDependency),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailedDependency {
    #[serde(default)]
    pub version: Option<String>,
    /// Reference an assembly the target framework provides.
    #[serde(default)]
    pub framework: bool,
}

/// `[frameworks."<name>"]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameworkSection {
    #[serde(default)]
    pub dependencies: BTreeMap<String, DependencySpec>,
}

/// Dependencies that apply when building for one framework.
#[derive(Debug, Clone, Default)]
pub struct TargetFrameworkInfo {
    /// `None` when the project declares nothing for the requested framework.
    pub framework_name: Option<FrameworkName>,
    pub dependencies: Vec<LibraryDependency>,
}

/// A validated project manifest.
#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    pub version: Version,
    pub loadable: bool,
    /// Directory holding `project.toml`, when loaded from disk.
    pub project_dir: Option<PathBuf>,
    pub dependencies: Vec<LibraryDependency>,
    frameworks: Vec<TargetFrameworkInfo>,
}

impl Project {
    /// Load and validate a `project.toml` from disk.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = deptrail_util::fs::read_to_string(path).map_err(|e| DeptrailError::Manifest {
            message: format!("Failed to read {e}"),
        })?;
        let mut project = Self::from_str(&content)?;
        project.project_dir = path.parent().map(Path::to_path_buf);
        tracing::trace!(project = %project.name, path = %path.display(), "loaded project");
        Ok(project)
    }

    /// Parse a `project.toml` from a string.
    pub fn from_str(content: &str) -> miette::Result<Self> {
        let manifest: ProjectManifest =
            toml::from_str(content).map_err(|e| DeptrailError::Manifest {
                message: format!("Failed to parse project.toml: {e}"),
            })?;
        Self::from_manifest(manifest).map_err(Into::into)
    }

    pub fn from_manifest(manifest: ProjectManifest) -> Result<Self, DeptrailError> {
        let name = manifest.package.name;
        let version =
            Version::parse(&manifest.package.version).map_err(|e| DeptrailError::Manifest {
                message: format!(
                    "Invalid version '{}' for project '{name}': {e}",
                    manifest.package.version
                ),
            })?;

        let dependencies = convert_dependencies(&name, &manifest.dependencies)?;

        let mut frameworks = Vec::with_capacity(manifest.frameworks.len());
        for (key, section) in &manifest.frameworks {
            let framework_name =
                FrameworkName::parse(key).map_err(|_| DeptrailError::Manifest {
                    message: format!("Invalid framework '{key}' in project '{name}'"),
                })?;
            frameworks.push(TargetFrameworkInfo {
                framework_name: Some(framework_name),
                dependencies: convert_dependencies(&name, &section.dependencies)?,
            });
        }

        Ok(Self {
            name,
            version,
            loadable: manifest.package.loadable,
            project_dir: None,
            dependencies,
            frameworks,
        })
    }

    /// Framework-specific information for `framework`.
    ///
    /// Never fails: a project with no matching section yields an empty info
    /// whose `framework_name` is `None`.
    pub fn target_framework(&self, framework: &FrameworkName) -> TargetFrameworkInfo {
        self.frameworks
            .iter()
            .find(|info| info.framework_name.as_ref() == Some(framework))
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_target_frameworks(&self) -> bool {
        !self.frameworks.is_empty()
    }

    pub fn target_frameworks(&self) -> impl Iterator<Item = &FrameworkName> {
        self.frameworks
            .iter()
            .filter_map(|info| info.framework_name.as_ref())
    }
}

fn convert_dependencies(
    project: &str,
    specs: &BTreeMap<String, DependencySpec>,
) -> Result<Vec<LibraryDependency>, DeptrailError> {
    specs
        .iter()
        .map(|(name, spec)| {
            spec.to_dependency(name)
                .map_err(|message| DeptrailError::Manifest {
                    message: format!("Dependency '{name}' of project '{project}': {message}"),
                })
        })
        .collect()
}

impl DependencySpec {
    /// Convert to a dependency edge, validating the version requirement.
    pub fn to_dependency(&self, name: &str) -> Result<LibraryDependency, String> {
        let (version, framework) = match self {
            Self::Version(v) => (Some(v.as_str()), false),
            Self::Detailed(d) => (d.version.as_deref(), d.framework),
        };

        let version_range = match version.map(str::trim) {
            None | Some("") => None,
            Some(v) => Some(
                VersionReq::parse(v)
                    .map_err(|e| format!("invalid version requirement '{v}': {e}"))?,
            ),
        };

        let mut range = LibraryRange::new(name, version_range);
        range.is_framework_reference = framework;
        Ok(LibraryDependency::new(range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detailed_and_short_specs() {
        let project = Project::from_str(
            r#"
[package]
name = "App"
version = "1.0.0"

[dependencies]
Lib = ">=1.0"
Util = { version = "^2" }
"System.Xml" = { framework = true }
"#,
        )
        .unwrap();

        assert_eq!(project.dependencies.len(), 3);
        let xml = project
            .dependencies
            .iter()
            .find(|d| d.name() == "System.Xml")
            .unwrap();
        assert!(xml.range.is_framework_reference);
        assert!(xml.range.version_range.is_none());
        assert!(project.loadable);
    }

    #[test]
    fn bad_requirement_is_a_manifest_error() {
        let err = Project::from_str(
            r#"
[package]
name = "App"
version = "1.0.0"

[dependencies]
Lib = "not a version"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Manifest error"), "got: {err}");
    }
}
