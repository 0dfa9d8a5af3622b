//! **delve-core**: geometry and grid types shared by the *delve* crates.
//!
//! This crate provides the foundational types used across the workspace:
//! integer points, half-open ranges, room rectangles, Bresenham lines and an
//! owned, bounds-checked 2D grid.

pub mod geom;
pub mod grid;

pub use geom::{Line, Point, Range, RangeIter, Rect};
pub use grid::Grid;
