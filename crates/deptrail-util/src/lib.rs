//! Shared utilities for deptrail.
//!
//! This crate provides cross-cutting concerns used by the other deptrail
//! crates: the unified error type and filesystem helpers.

pub mod errors;
pub mod fs;
