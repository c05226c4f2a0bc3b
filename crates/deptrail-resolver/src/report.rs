//! Diagnostics gathered during a walk: which edges lost to a nearer claim,
//! and which ranges no provider could resolve.

use std::fmt;

use deptrail_core::library::LibraryRange;

/// Everything the walker dropped, and why.
#[derive(Debug, Default, Clone)]
pub struct WalkReport {
    pub eclipsed: Vec<EclipsedEdge>,
    pub unresolved: Vec<UnresolvedRange>,
}

/// A dependency edge that was not expanded because a nearer node owns the name.
#[derive(Debug, Clone)]
pub struct EclipsedEdge {
    /// Path from the root through the dropped dependency.
    pub chain: String,
    pub requested: LibraryRange,
    /// The range of the node that claimed the name first.
    pub claimed_by: LibraryRange,
    /// Path from the root to the claiming node.
    pub claimed_at: String,
}

/// A range no provider could describe.
#[derive(Debug, Clone)]
pub struct UnresolvedRange {
    pub chain: String,
    pub range: LibraryRange,
}

impl WalkReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.eclipsed.is_empty() && self.unresolved.is_empty()
    }
}

impl fmt::Display for WalkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "No eclipsed or unresolved dependencies.");
        }
        if !self.eclipsed.is_empty() {
            writeln!(f, "Eclipsed dependencies ({}):", self.eclipsed.len())?;
            for e in &self.eclipsed {
                writeln!(f, "  {e}")?;
            }
        }
        if !self.unresolved.is_empty() {
            writeln!(f, "Unresolved dependencies ({}):", self.unresolved.len())?;
            for u in &self.unresolved {
                writeln!(f, "  {u}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for EclipsedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) eclipsed by {} at {}",
            self.chain, self.requested, self.claimed_by, self.claimed_at
        )
    }
}

impl fmt::Display for UnresolvedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.chain, self.range)
    }
}
