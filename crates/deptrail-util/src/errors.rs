use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all deptrail operations.
#[derive(Debug, Error, Diagnostic)]
pub enum DeptrailError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed project manifest (e.g. project.toml).
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check your project.toml for syntax errors"))]
    Manifest { message: String },

    /// Invalid or unreadable global configuration.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check ~/.deptrail/config.toml"))]
    Config { message: String },

    /// A framework name could not be parsed.
    #[error("Invalid framework name '{input}'")]
    #[diagnostic(help("Use the form Identifier,Version=v4.5[,Profile=Client]"))]
    Framework { input: String },

    /// Dependency resolution failed for a reason other than a cycle.
    #[error("Dependency resolution failed: {message}")]
    Resolution { message: String },

    /// A dependency names one of its own ancestors.
    #[error("Circular dependency detected {chain}.")]
    #[diagnostic(
        code(deptrail::circular_dependency),
        help("Remove one of the dependencies along this chain")
    )]
    CircularDependency { chain: String },

    /// A dependency provider failed while describing a library.
    #[error("Provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type DeptrailResult<T> = miette::Result<T>;
