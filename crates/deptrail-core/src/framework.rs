//! Target framework names such as `.NETFramework,Version=v4.5`.

use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Deserialize, Serialize};

use deptrail_util::errors::DeptrailError;

pub const NET_FRAMEWORK: &str = ".NETFramework";
pub const DNX: &str = "DNX";
pub const DNX_CORE: &str = "DNXCore";

/// A target framework: identifier, version, and optional profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FrameworkName {
    pub identifier: String,
    pub version: Version,
    pub profile: Option<String>,
}

impl FrameworkName {
    pub fn new(identifier: impl Into<String>, version: Version) -> Self {
        Self {
            identifier: identifier.into(),
            version,
            profile: None,
        }
    }

    /// Full desktop frameworks implicitly reference the base class library.
    pub fn is_desktop(&self) -> bool {
        self.identifier.eq_ignore_ascii_case(NET_FRAMEWORK)
            || self.identifier.eq_ignore_ascii_case(DNX)
    }

    /// Parse `Identifier,Version=vX.Y[.Z][,Profile=P]`.
    pub fn parse(input: &str) -> Result<Self, DeptrailError> {
        let invalid = || DeptrailError::Framework {
            input: input.to_string(),
        };

        let mut parts = input.split(',').map(str::trim);
        let identifier = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;

        let mut version = None;
        let mut profile = None;
        for part in parts {
            let (key, value) = part.split_once('=').ok_or_else(invalid)?;
            match key.trim() {
                k if k.eq_ignore_ascii_case("version") => {
                    version = Some(parse_framework_version(value.trim()).ok_or_else(invalid)?);
                }
                k if k.eq_ignore_ascii_case("profile") => {
                    let value = value.trim();
                    if !value.is_empty() {
                        profile = Some(value.to_string());
                    }
                }
                _ => return Err(invalid()),
            }
        }

        Ok(Self {
            identifier: identifier.to_string(),
            version: version.ok_or_else(invalid)?,
            profile,
        })
    }
}

fn parse_framework_version(s: &str) -> Option<Version> {
    let s = s.strip_prefix(['v', 'V']).unwrap_or(s);
    let nums: Vec<u64> = s
        .split('.')
        .map(|p| p.parse::<u64>().ok())
        .collect::<Option<_>>()?;
    match nums.as_slice() {
        [major] => Some(Version::new(*major, 0, 0)),
        [major, minor] => Some(Version::new(*major, *minor, 0)),
        [major, minor, patch] => Some(Version::new(*major, *minor, *patch)),
        _ => None,
    }
}

impl fmt::Display for FrameworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = &self.version;
        write!(f, "{},Version=v{}.{}", self.identifier, v.major, v.minor)?;
        if v.patch != 0 {
            write!(f, ".{}", v.patch)?;
        }
        if let Some(ref profile) = self.profile {
            write!(f, ",Profile={profile}")?;
        }
        Ok(())
    }
}

impl FromStr for FrameworkName {
    type Err = DeptrailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FrameworkName {
    type Error = DeptrailError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<FrameworkName> for String {
    fn from(f: FrameworkName) -> Self {
        f.to_string()
    }
}
