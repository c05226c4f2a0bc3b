//! Dependency walk engine: breadth-first nearest-wins graph construction,
//! cycle detection, provider negotiation, and dependency version correction.

pub mod cache;
pub mod graph;
pub mod project_provider;
pub mod provider;
pub mod report;
pub mod tree;
pub mod walker;
