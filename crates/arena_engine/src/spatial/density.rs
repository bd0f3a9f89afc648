//! Density-adaptive cell sizing
//!
//! Denser entity fields get finer grid cells, keeping per-cell occupancy
//! roughly bounded. The count-to-size mapping is a data table so balance
//! changes never touch code, and sampling is throttled so the grid is not
//! rebuilt over transient count jitter.

use serde::{Deserialize, Serialize};

/// One band of the density table, applying at `min_count` live entities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityBand {
    /// Smallest live-entity count this band applies to
    pub min_count: u32,
    /// Grid cell size chosen while in this band
    pub cell_size: f64,
}

/// Step function mapping live-entity count to grid cell size
///
/// Bands are ordered by descending `min_count`; the first band whose
/// threshold the count reaches wins, and `base_cell_size` applies below
/// every band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityProfile {
    /// Bands in descending `min_count` order
    pub bands: Vec<DensityBand>,
    /// Cell size used when no band matches
    pub base_cell_size: f64,
}

impl Default for DensityProfile {
    fn default() -> Self {
        Self {
            bands: vec![
                DensityBand { min_count: 200, cell_size: 100.0 },
                DensityBand { min_count: 100, cell_size: 120.0 },
                DensityBand { min_count: 50, cell_size: 140.0 },
            ],
            base_cell_size: 160.0,
        }
    }
}

impl DensityProfile {
    /// Optimal cell size for the given live-entity count
    pub fn cell_size_for(&self, live_count: u32) -> f64 {
        self.bands
            .iter()
            .find(|band| live_count >= band.min_count)
            .map_or(self.base_cell_size, |band| band.cell_size)
    }
}

/// Throttled sampler feeding the grid's cell size from the density profile
///
/// Re-evaluates the profile every `sample_interval_ticks`, or immediately
/// when the live count moved by at least `resample_delta` since the last
/// sample. A cell-size change always forces a grid rebuild downstream.
#[derive(Debug)]
pub struct DensityTuner {
    profile: DensityProfile,
    sample_interval_ticks: u32,
    resample_delta: u32,
    ticks_since_sample: u32,
    last_sampled_count: u32,
    current_cell_size: f64,
}

impl DensityTuner {
    /// Create a tuner; the first `sample` call always evaluates the profile
    pub fn new(profile: DensityProfile, sample_interval_ticks: u32, resample_delta: u32) -> Self {
        let current_cell_size = profile.base_cell_size;
        Self {
            profile,
            sample_interval_ticks: sample_interval_ticks.max(1),
            resample_delta: resample_delta.max(1),
            ticks_since_sample: u32::MAX,
            last_sampled_count: 0,
            current_cell_size,
        }
    }

    /// Cell size chosen by the most recent sample
    pub fn current_cell_size(&self) -> f64 {
        self.current_cell_size
    }

    /// Advance one tick and re-evaluate the profile when due
    ///
    /// Returns `Some(size)` only when a re-evaluation ran and produced a
    /// size different from the current one.
    pub fn sample(&mut self, live_count: u32) -> Option<f64> {
        self.ticks_since_sample = self.ticks_since_sample.saturating_add(1);

        let count_jumped = live_count.abs_diff(self.last_sampled_count) >= self.resample_delta;
        if self.ticks_since_sample < self.sample_interval_ticks && !count_jumped {
            return None;
        }

        self.ticks_since_sample = 0;
        self.last_sampled_count = live_count;

        let cell_size = self.profile.cell_size_for(live_count);
        if (cell_size - self.current_cell_size).abs() < f64::EPSILON {
            return None;
        }
        self.current_cell_size = cell_size;
        Some(cell_size)
    }
}
