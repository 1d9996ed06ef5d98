// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-provided tuning constants.
//!
//! Every struct deserializes with `#[serde(default)]`, so a host config only
//! needs the keys it overrides:
//!
//! ```
//! use trellis_canvas::CanvasConfig;
//!
//! let config: CanvasConfig =
//!     serde_json::from_str(r#"{ "drag": { "grid_size": 20.0 } }"#).unwrap();
//! assert_eq!(config.drag.grid_size, Some(20.0));
//! assert_eq!(config.batch.chunk_size, 100);
//! assert!(config.validate().is_ok());
//! ```

use core::time::Duration;

use serde::{Deserialize, Serialize};
use trellis_batch::{BatchItem, BatchRenderer, DEFAULT_CHUNK_SIZE};
use trellis_drag::{Axes, BorderMagnet, DEFAULT_MIN_MOVEMENT, GridSnap, ModifierChain, PointMagnet};
use trellis_index::DEFAULT_FLUSH_WINDOW;
use trellis_view::{Camera, ClampMode, DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE, LodThresholds};

use crate::error::ConfigError;

/// Complete canvas configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Camera limits and level-of-detail tiers.
    pub camera: CameraConfig,
    /// Drag modifiers.
    pub drag: DragConfig,
    /// Hit index flushing.
    pub index: IndexConfig,
    /// Path batching.
    pub batch: BatchConfig,
}

impl CanvasConfig {
    /// Checks every value for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()?;
        self.drag.validate()?;
        self.batch.validate()
    }
}

/// How the camera treats world bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClampSetting {
    /// Free movement.
    None,
    /// Some part of the bounds stays visible.
    KeepSomeVisible,
    /// The view stays inside the bounds.
    #[default]
    Contain,
}

impl From<ClampSetting> for ClampMode {
    fn from(value: ClampSetting) -> Self {
        match value {
            ClampSetting::None => Self::None,
            ClampSetting::KeepSomeVisible => Self::KeepSomeVisible,
            ClampSetting::Contain => Self::Contain,
        }
    }
}

/// Camera configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Smallest allowed scale.
    pub min_scale: f64,
    /// Largest allowed scale.
    pub max_scale: f64,
    /// Scale at which the schematic tier starts.
    pub schematic_threshold: f64,
    /// Scale at which the detailed tier starts.
    pub detailed_threshold: f64,
    /// World bounds handling.
    pub clamp: ClampSetting,
    /// Zoom factor applied per wheel notch.
    pub wheel_zoom_step: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let lod = LodThresholds::default();
        Self {
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            schematic_threshold: lod.schematic,
            detailed_threshold: lod.detailed,
            clamp: ClampSetting::default(),
            wheel_zoom_step: 1.1,
        }
    }
}

impl CameraConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_scale, self.max_scale);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ConfigError::ScaleLimits { min, max });
        }
        let (schematic, detailed) = (self.schematic_threshold, self.detailed_threshold);
        if !(schematic.is_finite() && detailed.is_finite() && schematic > 0.0 && schematic <= detailed)
        {
            return Err(ConfigError::LodThresholds {
                schematic,
                detailed,
            });
        }
        if !(self.wheel_zoom_step.is_finite() && self.wheel_zoom_step > 1.0) {
            return Err(ConfigError::ZoomStep(self.wheel_zoom_step));
        }
        Ok(())
    }

    /// Level-of-detail thresholds.
    #[must_use]
    pub fn lod(&self) -> LodThresholds {
        LodThresholds {
            schematic: self.schematic_threshold,
            detailed: self.detailed_threshold,
        }
    }

    /// Applies the limits, tiers and clamp mode to `camera`.
    pub fn apply(&self, camera: &mut Camera) {
        camera.set_scale_limits(self.min_scale, self.max_scale);
        camera.set_lod_thresholds(self.lod());
        camera.set_clamp_mode(self.clamp.into());
    }
}

/// When grid snapping applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridStage {
    /// Only the dropped position snaps.
    #[default]
    Drop,
    /// Every intermediate position snaps too.
    Always,
}

/// Drag modifier configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Grid spacing in world units; `None` disables grid snapping.
    pub grid_size: Option<f64>,
    /// When the grid applies.
    pub grid_stage: GridStage,
    /// Point magnet radius in pixels; `None` disables it.
    pub point_magnet_distance: Option<f64>,
    /// Enables alignment with the edges of other blocks.
    pub border_magnet: bool,
    /// Border magnet distance in pixels; `None` aligns with any edge in view.
    pub border_magnet_distance: Option<f64>,
    /// Pointer travel in pixels before magnets engage.
    pub min_movement: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            grid_size: None,
            grid_stage: GridStage::default(),
            point_magnet_distance: None,
            border_magnet: false,
            border_magnet_distance: Some(8.0),
            min_movement: DEFAULT_MIN_MOVEMENT,
        }
    }
}

impl DragConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(grid) = self.grid_size
            && !(grid.is_finite() && grid > 0.0)
        {
            return Err(ConfigError::GridSize(grid));
        }
        for distance in [self.point_magnet_distance, self.border_magnet_distance]
            .into_iter()
            .flatten()
        {
            if !(distance.is_finite() && distance >= 0.0) {
                return Err(ConfigError::MagnetDistance(distance));
            }
        }
        if !(self.min_movement.is_finite() && self.min_movement >= 0.0) {
            return Err(ConfigError::MinMovement(self.min_movement));
        }
        Ok(())
    }

    /// Builds the modifier chain described by this config.
    #[must_use]
    pub fn modifiers(&self) -> ModifierChain {
        let mut chain = ModifierChain::new();
        if let Some(distance) = self.point_magnet_distance {
            let mut magnet = PointMagnet::new(distance);
            magnet.min_movement = self.min_movement;
            chain.push(magnet);
        }
        if self.border_magnet {
            let mut magnet = BorderMagnet::new(self.border_magnet_distance, Axes::Both);
            magnet.min_movement = self.min_movement;
            chain.push(magnet);
        }
        if let Some(grid) = self.grid_size {
            chain.push(match self.grid_stage {
                GridStage::Drop => GridSnap::on_drop(grid),
                GridStage::Always => GridSnap::always(grid),
            });
        }
        chain
    }
}

/// Hit index configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Debounce window for buffered inserts, in milliseconds.
    pub flush_window_ms: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            flush_window_ms: u64::try_from(DEFAULT_FLUSH_WINDOW.as_millis()).unwrap_or(50),
        }
    }
}

impl IndexConfig {
    /// The flush window as a duration.
    #[must_use]
    pub fn flush_window(&self) -> Duration {
        Duration::from_millis(self.flush_window_ms)
    }
}

/// Path batching configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum members per combined path.
    pub chunk_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl BatchConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ChunkSize);
        }
        Ok(())
    }

    /// Creates a batch renderer with the configured chunk size.
    #[must_use]
    pub fn renderer<K, I>(&self) -> BatchRenderer<K, I>
    where
        K: Clone + Eq + core::hash::Hash + core::fmt::Debug,
        I: BatchItem,
    {
        BatchRenderer::with_chunk_size(self.chunk_size.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_match_the_crates() {
        let config = CanvasConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.camera.min_scale, 0.01);
        assert_eq!(config.camera.max_scale, 4.0);
        assert_eq!(config.camera.lod(), LodThresholds::default());
        assert_eq!(config.index.flush_window(), Duration::from_millis(50));
        assert!(config.drag.modifiers().is_empty());
    }

    #[test]
    fn invalid_values_are_reported() {
        let mut config = CanvasConfig::default();
        config.camera.min_scale = 5.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ScaleLimits { min: 5.0, max: 4.0 })
        );

        let mut config = CanvasConfig::default();
        config.camera.detailed_threshold = 0.1;
        assert!(matches!(config.validate(), Err(ConfigError::LodThresholds { .. })));

        let mut config = CanvasConfig::default();
        config.drag.grid_size = Some(0.0);
        assert_eq!(config.validate(), Err(ConfigError::GridSize(0.0)));

        let mut config = CanvasConfig::default();
        config.drag.point_magnet_distance = Some(f64::NAN);
        assert!(matches!(config.validate(), Err(ConfigError::MagnetDistance(_))));

        let mut config = CanvasConfig::default();
        config.batch.chunk_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::ChunkSize));
    }

    #[test]
    fn modifiers_follow_priority() {
        let drag = DragConfig {
            grid_size: Some(10.0),
            point_magnet_distance: Some(12.0),
            border_magnet: true,
            ..DragConfig::default()
        };
        let names: Vec<_> = drag.modifiers().names().collect();
        assert_eq!(names, [PointMagnet::NAME, BorderMagnet::NAME, GridSnap::NAME]);
    }
}
