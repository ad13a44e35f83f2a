//! Route search over road networks.
//!
//! A generic search core (`space`, `problem`, `search`, `frontier`,
//! `algorithms`) plus the road-network domain built on top of it
//! (`problems`, `runner`, `snapshot`, `network_builder`).
use shadow_rs::shadow;

shadow!(build);

// Internals
// ---------
pub mod frontier;
pub mod heap_primitives;

// Costs, search space and problems
// --------------------------------
pub mod cost;
pub mod float_cost;
pub mod problem;
pub mod search;
pub mod space;

// Geography and problems
// ----------------------
pub mod geo;
pub mod problems;

// Algorithms
// ----------
pub mod algorithms;
pub mod instrumented;
pub mod runner;

// Graph sources
// -------------
pub mod network_builder;
pub mod snapshot;

pub mod logging;
