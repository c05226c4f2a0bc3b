use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use deptrail_util::errors::DeptrailError;

/// Framework used when neither the command line nor the config names one.
pub const DEFAULT_FRAMEWORK: &str = "DNXCore,Version=v5.0";

/// Global user configuration loaded from `~/.deptrail/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub resolve: ResolveConfig,
}

/// Resolution settings from `[resolve]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Directories searched for `<name>/project.toml`, in priority order.
    #[serde(default, rename = "search-paths")]
    pub search_paths: Vec<PathBuf>,
    #[serde(default, rename = "default-framework")]
    pub default_framework: Option<String>,
}

impl GlobalConfig {
    /// Load the global configuration from `~/.deptrail/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        let path = Self::default_path();
        if path.is_file() {
            Self::load_from(&path)
        } else {
            tracing::debug!(path = %path.display(), "no global config, using defaults");
            Ok(Self::default())
        }
    }

    /// Load the configuration from an explicit file.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        let content = deptrail_util::fs::read_to_string(path).map_err(|e| DeptrailError::Config {
            message: format!("Failed to read {e}"),
        })?;
        toml::from_str(&content).map_err(|e| {
            DeptrailError::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// The configured default framework, falling back to [`DEFAULT_FRAMEWORK`].
    pub fn default_framework(&self) -> &str {
        self.resolve
            .default_framework
            .as_deref()
            .unwrap_or(DEFAULT_FRAMEWORK)
    }
}

/// Returns the path to the deptrail data directory (`~/.deptrail/`).
pub fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".deptrail")
}
