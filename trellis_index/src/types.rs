// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounding boxes.

use kurbo::{Point, Rect};

/// Axis-aligned bounding box in world coordinates.
///
/// Boxes are closed: points on the boundary are contained and boxes that
/// share an edge intersect.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2D {
    /// Minimum x.
    pub min_x: f64,
    /// Minimum y.
    pub min_y: f64,
    /// Maximum x.
    pub max_x: f64,
    /// Maximum y.
    pub max_y: f64,
}

impl Aabb2D {
    /// Creates a box from its extents.
    #[must_use]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Degenerate box around a single point.
    #[must_use]
    pub const fn from_point(pt: Point) -> Self {
        Self::new(pt.x, pt.y, pt.x, pt.y)
    }

    /// Returns true if all four extents are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }

    /// Returns true if the point lies inside or on the boundary.
    #[must_use]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Returns true if the two boxes overlap or touch.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Grows the box by `d` on every side.
    #[must_use]
    pub fn inflate(&self, d: f64) -> Self {
        Self::new(self.min_x - d, self.min_y - d, self.max_x + d, self.max_y + d)
    }

    /// Box center.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    /// Returns true if `inner` reaches or crosses any edge of `self`.
    #[must_use]
    pub fn touched_by(&self, inner: &Self) -> bool {
        inner.min_x <= self.min_x
            || inner.min_y <= self.min_y
            || inner.max_x >= self.max_x
            || inner.max_y >= self.max_y
    }

    /// Converts to a kurbo [`Rect`].
    #[must_use]
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

impl From<Rect> for Aabb2D {
    fn from(r: Rect) -> Self {
        let r = r.abs();
        Self::new(r.x0, r.y0, r.x1, r.y1)
    }
}

impl From<Aabb2D> for Rect {
    fn from(a: Aabb2D) -> Self {
        a.to_rect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_containment_and_intersection() {
        let a = Aabb2D::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains_point(10.0, 0.0));
        assert!(!a.contains_point(10.1, 0.0));
        assert!(a.intersects(&Aabb2D::new(10.0, 10.0, 20.0, 20.0)));
        assert!(!a.intersects(&Aabb2D::new(10.5, 0.0, 20.0, 20.0)));
    }

    #[test]
    fn from_rect_normalizes() {
        let a = Aabb2D::from(Rect::new(10.0, 5.0, 0.0, -5.0));
        assert_eq!(a, Aabb2D::new(0.0, -5.0, 10.0, 5.0));
    }

    #[test]
    fn non_finite_is_detected() {
        assert!(Aabb2D::new(0.0, 0.0, 1.0, 1.0).is_finite());
        assert!(!Aabb2D::new(f64::NAN, 0.0, 1.0, 1.0).is_finite());
        assert!(!Aabb2D::new(0.0, 0.0, f64::INFINITY, 1.0).is_finite());
    }
}
