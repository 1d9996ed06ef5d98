// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The immediate-mode drawing seam.

use alloc::vec::Vec;

use kurbo::{BezPath, Stroke};
use peniko::Brush;

/// Paint applied to a combined path.
///
/// Members of one group share a style key, so the style of the first
/// visible member stands for the whole chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathStyle {
    /// Fill brush, if the path is filled.
    pub fill: Option<Brush>,
    /// Stroke parameters and brush, if the path is stroked.
    pub stroke: Option<(Stroke, Brush)>,
}

impl PathStyle {
    /// A fill-only style.
    #[must_use]
    pub fn fill(brush: impl Into<Brush>) -> Self {
        Self {
            fill: Some(brush.into()),
            stroke: None,
        }
    }

    /// A stroke-only style.
    #[must_use]
    pub fn stroke(stroke: Stroke, brush: impl Into<Brush>) -> Self {
        Self {
            fill: None,
            stroke: Some((stroke, brush.into())),
        }
    }

    /// Adds a stroke to this style.
    #[must_use]
    pub fn with_stroke(mut self, stroke: Stroke, brush: impl Into<Brush>) -> Self {
        self.stroke = Some((stroke, brush.into()));
        self
    }

    /// Returns `true` if drawing with this style produces nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fill.is_none() && self.stroke.is_none()
    }
}

/// A 2D drawing surface such as a canvas context or a scene encoder.
///
/// The renderer sets a style once per group and then issues fill and stroke
/// calls that use the current style.
pub trait DrawSurface {
    /// Makes `style` current for the following path operations.
    fn set_style(&mut self, style: &PathStyle);

    /// Fills `path` with the current fill brush.
    fn fill_path(&mut self, path: &BezPath);

    /// Strokes `path` with the current stroke and brush.
    fn stroke_path(&mut self, path: &BezPath);
}

/// One call made against a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// [`DrawSurface::set_style`].
    SetStyle(PathStyle),
    /// [`DrawSurface::fill_path`].
    FillPath(BezPath),
    /// [`DrawSurface::stroke_path`].
    StrokePath(BezPath),
}

/// A surface that records every call, for tests and frame debugging.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    /// Recorded calls in issue order.
    pub ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    /// Creates an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fill and stroke calls.
    #[must_use]
    pub fn draw_calls(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| !matches!(op, SurfaceOp::SetStyle(_)))
            .count()
    }

    /// Number of style changes.
    #[must_use]
    pub fn style_changes(&self) -> usize {
        self.ops.len() - self.draw_calls()
    }

    /// Drops the recording.
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl DrawSurface for RecordingSurface {
    fn set_style(&mut self, style: &PathStyle) {
        self.ops.push(SurfaceOp::SetStyle(style.clone()));
    }

    fn fill_path(&mut self, path: &BezPath) {
        self.ops.push(SurfaceOp::FillPath(path.clone()));
    }

    fn stroke_path(&mut self, path: &BezPath) {
        self.ops.push(SurfaceOp::StrokePath(path.clone()));
    }
}
