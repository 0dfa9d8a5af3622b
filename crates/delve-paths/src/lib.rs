//! Path searches for dungeon grids.
//!
//! This crate provides the graph searches used by the level and exploration
//! layers of *delve*:
//!
//! - **Wave search** with a pluggable target test ([`PathRange::wave_path`]),
//!   used both for "walk to this cell" and for "nearest unexplored frontier"
//! - **Connected Components** labelling ([`PathRange::cc_map_all`], [`PathRange::cc_map`])
//!
//! All algorithms operate through [`PathRange`], which owns and reuses internal
//! caches so that repeated queries incur no allocations after warm-up.

mod cc;
mod distance;
mod neighbors;
mod pathrange;
mod traits;
mod wave;

pub use distance::{chebyshev, manhattan};
pub use neighbors::Neighbors;
pub use pathrange::PathRange;
pub use traits::Pather;
