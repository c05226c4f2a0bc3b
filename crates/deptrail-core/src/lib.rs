//! Core data types for deptrail.
//!
//! This crate defines the values the resolver walks over: library ranges and
//! identities, library descriptions produced by providers, target framework
//! names, `project.toml` manifests, and global configuration.
//!
//! Resolution logic lives in `deptrail-resolver`.

/// File name of a project manifest inside its project directory.
pub const PROJECT_FILE: &str = "project.toml";

pub mod config;
pub mod framework;
pub mod library;
pub mod project;
