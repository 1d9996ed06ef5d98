// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke distance refinement for links.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, ParamCurveNearest, Point};

use crate::types::Aabb2D;

/// A polyline centerline with a half-width, as drawn for a link.
///
/// A point hits when its distance to the nearest segment is within the
/// half-width plus a caller tolerance. Joins and caps are not modeled.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokedPolyline {
    /// Centerline vertices in world coordinates.
    pub points: Vec<Point>,
    /// Half of the stroke width.
    pub half_width: f64,
}

impl StrokedPolyline {
    /// Creates a polyline stroke.
    #[must_use]
    pub fn new(points: Vec<Point>, half_width: f64) -> Self {
        Self { points, half_width }
    }

    /// Distance from `pt` to the centerline, `None` for an empty polyline.
    #[must_use]
    pub fn distance(&self, pt: Point) -> Option<f64> {
        match self.points.as_slice() {
            [] => None,
            [only] => Some(only.distance(pt)),
            pts => pts
                .windows(2)
                .map(|w| Line::new(w[0], w[1]).nearest(pt, 0.).distance_sq)
                .reduce(f64::min)
                .map(|d2| d2.sqrt()),
        }
    }

    /// Returns `true` if `pt` is within the stroke plus `tolerance`.
    #[must_use]
    pub fn hit(&self, pt: Point, tolerance: f64) -> bool {
        self.distance(pt)
            .is_some_and(|d| d <= self.half_width + tolerance)
    }

    /// Bounding box of the stroked shape, for registering with the index.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb2D> {
        self.points
            .iter()
            .map(|p| Aabb2D::from_point(*p))
            .reduce(|a, b| a.union(&b))
            .map(|b| b.inflate(self.half_width))
    }
}
