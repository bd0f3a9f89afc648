//! Spatial partitioning data structures
//!
//! Provides the uniform-grid spatial hash used for broad-phase collision
//! detection, and the density heuristic that tunes its cell size.

pub mod density;
pub mod grid;

pub use density::{DensityBand, DensityProfile, DensityTuner};
pub use grid::{CellKey, GridIndex, FORWARD_NEIGHBOR_OFFSETS};
