// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// A [`CanvasConfig`](crate::CanvasConfig) value that cannot be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Scale limits must be finite, positive and ordered.
    #[error("invalid scale limits [{min}, {max}]: expected 0 < min <= max")]
    ScaleLimits {
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },

    /// Level-of-detail thresholds must be positive and ordered.
    #[error("invalid LOD thresholds {schematic} and {detailed}: expected 0 < schematic <= detailed")]
    LodThresholds {
        /// Configured schematic threshold.
        schematic: f64,
        /// Configured detailed threshold.
        detailed: f64,
    },

    /// The wheel zoom step must be finite and greater than one.
    #[error("invalid wheel zoom step {0}: expected a finite factor > 1")]
    ZoomStep(f64),

    /// Grid spacing must be finite and positive.
    #[error("invalid grid size {0}: expected a finite value > 0")]
    GridSize(f64),

    /// Magnet distances must be finite and non-negative.
    #[error("invalid magnet distance {0}: expected a finite value >= 0")]
    MagnetDistance(f64),

    /// Minimum pointer travel must be finite and non-negative.
    #[error("invalid minimum movement {0}: expected a finite value >= 0")]
    MinMovement(f64),

    /// Chunks need room for at least one member.
    #[error("chunk size must be at least 1")]
    ChunkSize,
}
