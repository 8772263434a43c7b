//! Grid configuration, validation, and error types.
//!
//! [`GridConfig`] is the constructor input for a [`GridEngine`](crate::GridEngine).
//! [`validate()`](GridConfig::validate) runs before any grid state exists, so
//! a bad side length or cell size fails fast instead of producing a grid
//! that silently misbehaves.

use std::error::Error;
use std::fmt;

use tessel_core::{CodecError, CoordinateCodec};
use tessel_index::BuildOptions;
use tessel_space::Topology;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`GridConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `grid_row_max` cannot back a coordinate codec.
    Codec(CodecError),
    /// `cell_size` is NaN, infinite, zero, or negative.
    InvalidCellSize {
        /// The invalid value.
        value: f32,
    },
    /// `sample_tolerance` is NaN, infinite, or negative.
    InvalidTolerance {
        /// The invalid value.
        value: f32,
    },
    /// `max_flood_samples` is `Some(0)`.
    ZeroFloodSamples,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "grid_row_max: {e}"),
            Self::InvalidCellSize { value } => {
                write!(f, "cell_size must be finite and positive, got {value}")
            }
            Self::InvalidTolerance { value } => {
                write!(f, "sample_tolerance must be finite and non-negative, got {value}")
            }
            Self::ZeroFloodSamples => write!(f, "max_flood_samples must be at least 1"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for ConfigError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

// ── GridConfig ─────────────────────────────────────────────────────

/// Complete configuration for constructing a grid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// World length of one grid edge. Default: 0.25.
    pub cell_size: f32,
    /// Side length of the addressable grid in cells; must be a power of
    /// two in `[2, 65536]`. Default: 1024.
    pub grid_row_max: u32,
    /// Cell shape and adjacency. Default: hex.
    pub topology: Topology,
    /// Snap distance handed to the surface sampler. `None` = one cell.
    pub sample_tolerance: Option<f32>,
    /// Upper bound on sampler calls during a validity build. `None` =
    /// bounded only by the grid capacity.
    pub max_flood_samples: Option<usize>,
    /// Largest ring a vacancy search examines unless the query overrides
    /// it. Default: 32.
    pub max_vacancy_magnitude: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 0.25,
            grid_row_max: 1024,
            topology: Topology::Hex,
            sample_tolerance: None,
            max_flood_samples: None,
            max_vacancy_magnitude: 32,
        }
    }
}

impl GridConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Side length must give a bijective codec.
        CoordinateCodec::new(self.grid_row_max)?;
        // 2. Cell size must be usable as a divisor.
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize {
                value: self.cell_size,
            });
        }
        // 3. Tolerance, if present, is a distance.
        if let Some(tol) = self.sample_tolerance {
            if !tol.is_finite() || tol < 0.0 {
                return Err(ConfigError::InvalidTolerance { value: tol });
            }
        }
        // 4. A zero sample budget could never accept the origin.
        if self.max_flood_samples == Some(0) {
            return Err(ConfigError::ZeroFloodSamples);
        }
        Ok(())
    }

    /// The codec for `grid_row_max`.
    pub fn codec(&self) -> Result<CoordinateCodec, ConfigError> {
        Ok(CoordinateCodec::new(self.grid_row_max)?)
    }

    /// Flood-fill options derived from this configuration.
    pub fn build_options(&self) -> BuildOptions {
        let mut options = BuildOptions::new(self.cell_size);
        if let Some(tol) = self.sample_tolerance {
            options = options.tolerance(tol);
        }
        if let Some(limit) = self.max_flood_samples {
            options = options.max_samples(limit);
        }
        options
    }
}
