//! Configuration for the collision engine's tunables
//!
//! The density table and the pair-compatibility rules are the only
//! balance knobs; both are data here rather than branches in code.

use serde::{Deserialize, Serialize};

use crate::physics::collision_filter::PairRule;
use crate::spatial::density::DensityProfile;

/// Tunable surface of the collision subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Live-entity count to grid cell size table
    pub density: DensityProfile,
    /// Ticks between density re-evaluations
    pub sample_interval_ticks: u32,
    /// Live-count delta that forces an early re-evaluation
    pub resample_delta: u32,
    /// Unordered kind pairs allowed to collide
    pub pair_rules: Vec<PairRule>,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            density: DensityProfile::default(),
            sample_interval_ticks: 30,
            resample_delta: 50,
            pair_rules: PairRule::CANONICAL.to_vec(),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The config parsed but fails a consistency rule
    #[error("Invalid config: {0}")]
    Validation(String),
}

impl CollisionConfig {
    /// Load and validate configuration from a `.toml` or `.ron` file
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        let config: Self = if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a `.toml` or `.ron` file
    pub fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Check the consistency rules the tables must satisfy
    ///
    /// Density bands must be sorted by strictly descending count threshold,
    /// all cell sizes must be finite and positive, and sizes must be
    /// monotonic non-increasing as the count grows.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_interval_ticks == 0 {
            return Err(ConfigError::Validation(
                "sample_interval_ticks must be at least 1".into(),
            ));
        }

        let profile = &self.density;
        if !profile.base_cell_size.is_finite() || profile.base_cell_size <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "base cell size {} is not a positive number",
                profile.base_cell_size
            )));
        }

        for window in profile.bands.windows(2) {
            if window[0].min_count <= window[1].min_count {
                return Err(ConfigError::Validation(format!(
                    "density bands out of order: {} does not descend past {}",
                    window[0].min_count, window[1].min_count
                )));
            }
            if window[0].cell_size > window[1].cell_size {
                return Err(ConfigError::Validation(format!(
                    "cell size must not increase with density: {} at {} entities vs {} at {}",
                    window[0].cell_size,
                    window[0].min_count,
                    window[1].cell_size,
                    window[1].min_count
                )));
            }
        }

        for band in &profile.bands {
            if !band.cell_size.is_finite() || band.cell_size <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "cell size {} at {} entities is not a positive number",
                    band.cell_size, band.min_count
                )));
            }
        }

        if let Some(last) = profile.bands.last() {
            if last.cell_size > profile.base_cell_size {
                return Err(ConfigError::Validation(format!(
                    "base cell size {} is finer than the sparsest band ({})",
                    profile.base_cell_size, last.cell_size
                )));
            }
        }

        Ok(())
    }
}
