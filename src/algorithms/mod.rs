//! Implementation of search algorithms.
//!
//! These algorithms can do path-finding on generic search problems.

use derive_more::Display;
use serde::Serialize;

pub mod best_first;
pub mod depth_first;

/// Counters kept by every search while it runs.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq, Serialize)]
#[display(
    "expanded={expanded} generated={generated} replaced={replaced} max_frontier={max_frontier}"
)]
pub struct SearchStats {
    /// Nodes taken off the frontier and expanded.
    pub expanded: usize,
    /// Search nodes created, including the root.
    pub generated: usize,
    /// Frontier nodes that got a cheaper path.
    pub replaced: usize,
    /// Largest frontier (or stack) size seen.
    pub max_frontier: usize,
}
