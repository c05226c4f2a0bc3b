//! Library ranges, identities, and the descriptions providers hand back.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use semver::{Comparator, Op, Version, VersionReq};
use serde::{Deserialize, Serialize};

use crate::framework::FrameworkName;

/// A library requested by name and version constraint.
///
/// Equality and hashing consider only the name and the constraint, so two
/// requests for the same library under different constraints are distinct
/// keys while the framework-reference flag never splits a key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryRange {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_range: Option<VersionReq>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_framework_reference: bool,
}

impl LibraryRange {
    pub fn new(name: impl Into<String>, version_range: Option<VersionReq>) -> Self {
        Self {
            name: name.into(),
            version_range,
            is_framework_reference: false,
        }
    }

    /// A reference to an assembly supplied by the target framework itself.
    pub fn framework_reference(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version_range: None,
            is_framework_reference: true,
        }
    }

    /// A range matching exactly one version (`=x.y.z`).
    pub fn exact(name: impl Into<String>, version: &Version) -> Self {
        Self::new(name, Some(exact_req(version)))
    }
}

impl PartialEq for LibraryRange {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.version_range == other.version_range
    }
}

impl Eq for LibraryRange {}

impl Hash for LibraryRange {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.version_range.hash(state);
    }
}

impl fmt::Display for LibraryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version_range {
            Some(range) => write!(f, "{} {}", self.name, range),
            None => f.write_str(&self.name),
        }
    }
}

/// Compare library names the way resolution does: case-insensitively.
pub fn names_match(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        a.eq_ignore_ascii_case(b)
    } else {
        a.to_lowercase() == b.to_lowercase()
    }
}

/// Normalized map key for a library name.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// Build a requirement that only `version` satisfies.
pub fn exact_req(version: &Version) -> VersionReq {
    VersionReq {
        comparators: vec![Comparator {
            op: Op::Exact,
            major: version.major,
            minor: Some(version.minor),
            patch: Some(version.patch),
            pre: version.pre.clone(),
        }],
    }
}

/// A concrete library: a name and the exact version a provider resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LibraryIdentity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
}

impl LibraryIdentity {
    pub fn new(name: impl Into<String>, version: Option<Version>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

impl fmt::Display for LibraryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.name, version),
            None => f.write_str(&self.name),
        }
    }
}

/// A dependency edge declared by a library.
///
/// `library` stays empty until dependency version correction points it at
/// the identity that won resolution for this name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDependency {
    pub range: LibraryRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<LibraryIdentity>,
}

impl LibraryDependency {
    pub fn new(range: LibraryRange) -> Self {
        Self {
            range,
            library: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.range.name
    }
}

/// Where a library description came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryType {
    Project,
    #[default]
    Package,
    Unresolved,
}

impl fmt::Display for LibraryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Project => "project",
            Self::Package => "package",
            Self::Unresolved => "unresolved",
        };
        f.write_str(s)
    }
}

/// A provider's answer for a requested range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryDescription {
    /// The range that was asked for.
    pub requested: LibraryRange,
    pub identity: LibraryIdentity,
    #[serde(default)]
    pub dependencies: Vec<LibraryDependency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<FrameworkName>,
    #[serde(rename = "type")]
    pub library_type: LibraryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// `false` when the library was found but could not target the framework.
    #[serde(default = "default_resolved")]
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loadable_assemblies: Vec<String>,
}

fn default_resolved() -> bool {
    true
}

impl LibraryDescription {
    pub fn new(
        requested: LibraryRange,
        identity: LibraryIdentity,
        dependencies: Vec<LibraryDependency>,
    ) -> Self {
        Self {
            requested,
            identity,
            dependencies,
            framework: None,
            library_type: LibraryType::default(),
            path: None,
            resolved: true,
            loadable_assemblies: Vec::new(),
        }
    }
}
