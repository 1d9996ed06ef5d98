// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Clamp behavior for panning and zooming relative to optional world bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ClampMode {
    /// Do not apply any clamping; the camera may move and zoom freely.
    None,
    /// Clamp so that the visible rect never moves completely outside the bounds.
    KeepSomeVisible,
    /// Keep the visible rect inside the bounds.
    ///
    /// The scale is raised when the viewport would otherwise show area outside
    /// the bounds. If even the maximum scale cannot achieve that, the camera
    /// stays at the maximum scale with the bounds centered.
    #[default]
    Contain,
}

/// What to hold fixed when viewport insets change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Maintain {
    /// The world point at the center of the usable rect stays at its center.
    Center,
}

/// Discrete level-of-detail tier derived from the camera scale.
///
/// Variants are ordered from least to most detail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScaleLevel {
    /// Far out: blocks are drawn as bare shapes.
    Minimalistic,
    /// Mid range: structure is visible but text and ports are skipped.
    Schematic,
    /// Close up: everything is drawn.
    Detailed,
}

/// Scale thresholds separating the [`ScaleLevel`] tiers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodThresholds {
    /// Scales at or above this are at least [`ScaleLevel::Schematic`].
    pub schematic: f64,
    /// Scales at or above this are [`ScaleLevel::Detailed`].
    pub detailed: f64,
}

impl LodThresholds {
    /// Classifies `scale`.
    #[must_use]
    pub fn level(&self, scale: f64) -> ScaleLevel {
        if scale >= self.detailed {
            ScaleLevel::Detailed
        } else if scale >= self.schematic {
            ScaleLevel::Schematic
        } else {
            ScaleLevel::Minimalistic
        }
    }
}

impl Default for LodThresholds {
    fn default() -> Self {
        Self {
            schematic: 0.225,
            detailed: 0.7,
        }
    }
}
